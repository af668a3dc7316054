#![doc = "The `tasked` library crate."]
#![doc = ""]
#![doc = "A small task-management API: users, tasks owned by users, and JWT"]
#![doc = "sessions. The binary (`main.rs`) wires a Postgres pool into [`state::AppState`]"]
#![doc = "and serves it; tests use the in-memory store instead."]

pub mod auth;
pub mod config;
pub mod error;
pub mod models;
pub mod repository;
pub mod routes;
pub mod services;
pub mod state;
pub mod validation;

pub use crate::error::AppError;
pub use crate::state::AppState;
