//! Shared service state.

use std::sync::Arc;

use crate::registry::ModelRegistry;

/// State shared by all request handlers.
///
/// Cheap to clone; the registry is immutable after startup.
#[derive(Clone)]
pub struct ServiceState {
    registry: Arc<ModelRegistry>,
}

impl ServiceState {
    /// Creates service state around a model registry.
    pub fn new(registry: ModelRegistry) -> Self {
        Self {
            registry: Arc::new(registry),
        }
    }

    /// Returns the model registry.
    pub fn registry(&self) -> &ModelRegistry {
        &self.registry
    }
}
