use std::sync::Arc;

use actix_web::web;

use crate::auth::TokenManager;
use crate::repository::{InMemoryStore, TaskRepository, UserRepository};
use crate::routes;
use crate::services::{TaskService, UserService};

/// Shared handles every worker clones into its `App`.
#[derive(Clone)]
pub struct AppState {
    pub users: web::Data<UserService>,
    pub tasks: web::Data<TaskService>,
    pub tokens: web::Data<TokenManager>,
}

impl AppState {
    pub fn new(
        user_repo: Arc<dyn UserRepository>,
        task_repo: Arc<dyn TaskRepository>,
        tokens: TokenManager,
    ) -> Self {
        Self {
            users: web::Data::new(UserService::new(user_repo)),
            tasks: web::Data::new(TaskService::new(task_repo)),
            tokens: web::Data::new(tokens),
        }
    }

    /// Both repositories backed by one in-memory store.
    pub fn in_memory(tokens: TokenManager) -> Self {
        let store = Arc::new(InMemoryStore::new());
        Self::new(store.clone(), store, tokens)
    }

    /// Registers the shared data and all routes.
    pub fn configure(&self, cfg: &mut web::ServiceConfig) {
        cfg.app_data(self.users.clone())
            .app_data(self.tasks.clone())
            .app_data(self.tokens.clone())
            .configure(routes::config);
    }
}
