pub mod task;
pub mod user;

pub use task::{CreateTaskRequest, Task, TaskFields, UpdateStatusRequest, UpdateTaskRequest};
pub use user::{CreateUserRequest, UpdateUserRequest, User};
