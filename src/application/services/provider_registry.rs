//! # Provider Registry
//!
//! Explicit list of the providers an engine dispatches to.
//!
//! Built once at startup and handed to the engine, so tests can swap in
//! stub providers.

use crate::application::error::{ApplicationError, ApplicationResult};
use crate::domain::value_objects::ProviderId;
use crate::infrastructure::providers::traits::QuoteProvider;
use std::collections::HashSet;
use std::sync::Arc;

/// Ordered set of registered providers with unique ids.
#[derive(Debug, Clone, Default)]
pub struct ProviderRegistry {
    providers: Vec<Arc<dyn QuoteProvider>>,
}

impl ProviderRegistry {
    /// Creates an empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a provider, returning the registry for chaining.
    ///
    /// # Errors
    ///
    /// Returns `ApplicationError::Configuration` if the id is already registered,
    /// ignoring case.
    pub fn with_provider(mut self, provider: Arc<dyn QuoteProvider>) -> ApplicationResult<Self> {
        self.register(provider)?;
        Ok(self)
    }

    /// Adds a provider.
    ///
    /// # Errors
    ///
    /// Returns `ApplicationError::Configuration` if the id is already registered,
    /// ignoring case.
    pub fn register(&mut self, provider: Arc<dyn QuoteProvider>) -> ApplicationResult<()> {
        if self.get(provider.provider_id()).is_some() {
            return Err(ApplicationError::configuration(format!(
                "provider `{}` is registered twice",
                provider.provider_id()
            )));
        }
        self.providers.push(provider);
        Ok(())
    }

    /// Returns the number of providers.
    #[must_use]
    pub fn len(&self) -> usize {
        self.providers.len()
    }

    /// Returns true if no provider is registered.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.providers.is_empty()
    }

    /// Returns the registered ids in registration order.
    pub fn ids(&self) -> impl Iterator<Item = &ProviderId> {
        self.providers.iter().map(|p| p.provider_id())
    }

    /// Looks up a provider by id.
    #[must_use]
    pub fn get(&self, id: &ProviderId) -> Option<Arc<dyn QuoteProvider>> {
        self.providers
            .iter()
            .find(|p| p.provider_id() == id)
            .cloned()
    }

    /// Returns every provider not in `excluded`, in registration order.
    #[must_use]
    pub fn select(&self, excluded: &HashSet<ProviderId>) -> Vec<Arc<dyn QuoteProvider>> {
        self.providers
            .iter()
            .filter(|p| !excluded.contains(p.provider_id()))
            .cloned()
            .collect()
    }
}
