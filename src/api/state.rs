use std::sync::Arc;

use tokio::sync::RwLock;

use crate::controller::AppController;

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    pub controller: Arc<RwLock<AppController>>,
}

impl AppState {
    pub fn new(controller: AppController) -> Self {
        Self {
            controller: Arc::new(RwLock::new(controller)),
        }
    }
}
