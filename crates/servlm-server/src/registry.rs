//! Model registry.
//!
//! Maps model identifiers to inference providers. The registry is built
//! once at startup and never mutated afterwards, so request handlers can
//! share it without locking.

use std::collections::HashMap;

use servlm_core::{BoxedProvider, Error, Result};

/// Registry of available inference providers, keyed by model identifier.
pub struct ModelRegistry {
    providers: HashMap<String, BoxedProvider>,
    default_model: String,
}

impl ModelRegistry {
    /// Creates a registry with the given provider as the default model.
    pub fn new(default_provider: BoxedProvider) -> Self {
        let default_model = default_provider.model_id().to_owned();
        let mut providers = HashMap::new();
        providers.insert(default_model.clone(), default_provider);

        Self {
            providers,
            default_model,
        }
    }

    /// Registers an additional provider under its model identifier.
    pub fn with_provider(mut self, provider: BoxedProvider) -> Self {
        self.providers
            .insert(provider.model_id().to_owned(), provider);
        self
    }

    /// Returns the default model identifier.
    pub fn default_model(&self) -> &str {
        &self.default_model
    }

    /// Returns the supported model identifiers, sorted.
    pub fn supported_models(&self) -> Vec<&str> {
        let mut models: Vec<&str> = self.providers.keys().map(String::as_str).collect();
        models.sort_unstable();
        models
    }

    /// Resolves a model selector to a provider.
    ///
    /// `None` selects the default model.
    ///
    /// # Errors
    ///
    /// Returns a validation error naming the supported set when the
    /// selector is unknown.
    pub fn resolve(&self, selector: Option<&str>) -> Result<&BoxedProvider> {
        let model = selector.unwrap_or(&self.default_model);
        self.providers.get(model).ok_or_else(|| {
            Error::validation().with_message(format!(
                "unsupported model provided {model:?}, should be one of {}",
                self.supported_models().join(", ")
            ))
        })
    }

    /// Iterates over all registered providers.
    pub fn providers(&self) -> impl Iterator<Item = &BoxedProvider> {
        self.providers.values()
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use servlm_core::mock::{MockConfig, MockProvider};

    use super::*;

    fn mock(model_id: &str) -> BoxedProvider {
        Arc::new(MockProvider::new(MockConfig {
            model_id: model_id.into(),
            ..Default::default()
        }))
    }

    #[test]
    fn resolves_default_and_named_models() {
        let registry = ModelRegistry::new(mock("florence-2-base")).with_provider(mock("florence-2-large"));

        assert_eq!(registry.default_model(), "florence-2-base");
        assert_eq!(
            registry.resolve(None).unwrap().model_id(),
            "florence-2-base"
        );
        assert_eq!(
            registry.resolve(Some("florence-2-large")).unwrap().model_id(),
            "florence-2-large"
        );
    }

    #[test]
    fn unknown_model_is_a_client_error() {
        let registry = ModelRegistry::new(mock("florence-2-base"));
        let error = registry.resolve(Some("clip")).err().unwrap();
        assert!(error.is_client_error());
        assert!(error.to_string().contains("florence-2-base"));
    }
}
