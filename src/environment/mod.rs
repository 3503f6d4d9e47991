pub mod model;
pub mod repository;
pub mod toasts;
pub mod types;

pub use model::Model;
pub use repository::Repository;
pub use toasts::{Toast, Toasts};

use std::sync::Arc;

use async_trait::async_trait;
use types::Identity;

/// The external sign-in provider (an OAuth popup in the real app).
#[async_trait]
pub trait Authenticator: Send + Sync {
    async fn sign_in(&self) -> Result<Identity, String>;
}

#[derive(Clone)]
pub struct Environment {
    pub model: Model,
    pub repository: Repository,
    pub toasts: Toasts,
    pub authenticator: Arc<dyn Authenticator>,
}

impl std::fmt::Debug for Environment {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Environment").finish()
    }
}

impl Environment {
    pub fn new(
        model: Model,
        repository: Repository,
        authenticator: Arc<dyn Authenticator>,
    ) -> Self {
        Self {
            model,
            repository,
            toasts: Toasts::default(),
            authenticator,
        }
    }
}
