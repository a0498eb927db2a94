//! Provider Registry
//!
//! Holds every configured provider and resolves caller-supplied identifiers
//! to an adapter plus its config. Credential presence is checked when a
//! provider is registered and again by [`ProviderRegistry::validate_all`],
//! which the dispatcher builder runs before serving any traffic.

use std::collections::HashMap;

use secrecy::ExposeSecret;

use crate::adapters::{ProviderAdapter, adapter_for};
use crate::config::ProviderConfig;
use crate::error::DispatchError;
use crate::utils::redact;

/// A resolved provider: its configuration and the adapter for its format.
pub struct ResolvedProvider<'a> {
    /// The provider's registered configuration.
    pub config: &'a ProviderConfig,
    /// Adapter implementing the provider's wire format.
    pub adapter: &'static dyn ProviderAdapter,
}

impl std::fmt::Debug for ResolvedProvider<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ResolvedProvider")
            .field("config", &self.config)
            .field("adapter", &"<dyn ProviderAdapter>")
            .finish()
    }
}

/// Registry of configured providers, immutable once the dispatcher owns it.
#[derive(Default)]
pub struct ProviderRegistry {
    providers: HashMap<String, ProviderConfig>,
}

impl ProviderRegistry {
    /// Create an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a provider.
    ///
    /// Fails when the identifier is blank or already taken, or when the
    /// config has an empty credential.
    pub fn register(&mut self, config: ProviderConfig) -> Result<(), DispatchError> {
        if config.id.trim().is_empty() {
            return Err(DispatchError::InvalidInput(
                "provider identifier is empty".to_string(),
            ));
        }
        if self.providers.contains_key(&config.id) {
            return Err(DispatchError::InvalidInput(format!(
                "provider already registered: {}",
                config.id
            )));
        }
        if !config.has_credential() {
            return Err(DispatchError::InvalidInput(format!(
                "empty credential for provider: {}",
                config.id
            )));
        }
        self.providers.insert(config.id.clone(), config);
        Ok(())
    }

    /// Resolve a provider identifier to its config and adapter.
    pub fn resolve(&self, id: &str) -> Result<ResolvedProvider<'_>, DispatchError> {
        let config = self
            .providers
            .get(id)
            .ok_or_else(|| DispatchError::UnknownProvider(id.to_string()))?;
        Ok(ResolvedProvider {
            config,
            adapter: adapter_for(config.wire_format),
        })
    }

    /// Verify every registered provider has a credential.
    ///
    /// Fails with the first offending provider id. Run once at startup;
    /// the registry refuses to serve through a dispatcher otherwise.
    pub fn validate_all(&self) -> Result<(), DispatchError> {
        for (id, config) in &self.providers {
            if !config.has_credential() {
                return Err(DispatchError::MissingCredential(id.clone()));
            }
        }
        Ok(())
    }

    /// Registered provider identifiers, sorted for stable output.
    pub fn provider_ids(&self) -> Vec<&str> {
        let mut ids: Vec<&str> = self.providers.keys().map(String::as_str).collect();
        ids.sort_unstable();
        ids
    }

    /// Number of registered providers.
    pub fn len(&self) -> usize {
        self.providers.len()
    }

    /// Whether the registry has no providers.
    pub fn is_empty(&self) -> bool {
        self.providers.is_empty()
    }

    /// Strip every registered credential out of `text` before it is logged.
    pub(crate) fn redact(&self, text: &str) -> String {
        redact::redact(
            text,
            self.providers
                .values()
                .map(|config| config.credential().expose_secret()),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn register_and_resolve_round_trip() {
        let mut registry = ProviderRegistry::new();
        registry.register(ProviderConfig::openai("k")).unwrap();

        let resolved = registry.resolve("openai").unwrap();
        assert_eq!(resolved.config.id, "openai");
    }

    #[test]
    fn duplicate_registration_is_rejected() {
        let mut registry = ProviderRegistry::new();
        registry.register(ProviderConfig::openai("k")).unwrap();
        let err = registry.register(ProviderConfig::openai("k2")).unwrap_err();
        assert!(matches!(err, DispatchError::InvalidInput(_)));
    }

    #[test]
    fn empty_credential_is_rejected_at_registration() {
        let mut registry = ProviderRegistry::new();
        let err = registry.register(ProviderConfig::openai("")).unwrap_err();
        assert!(matches!(err, DispatchError::InvalidInput(_)));
    }

    #[test]
    fn unknown_provider_resolution_fails() {
        let registry = ProviderRegistry::new();
        assert_eq!(
            registry.resolve("mistral").unwrap_err(),
            DispatchError::UnknownProvider("mistral".to_string())
        );
    }

    #[test]
    fn validate_all_passes_for_populated_registry() {
        let mut registry = ProviderRegistry::new();
        registry.register(ProviderConfig::openai("a")).unwrap();
        registry.register(ProviderConfig::anthropic("b")).unwrap();
        registry.register(ProviderConfig::gemini("c")).unwrap();
        assert!(registry.validate_all().is_ok());
        assert_eq!(registry.provider_ids(), ["anthropic", "gemini", "openai"]);
    }

    #[test]
    fn redact_strips_registered_credentials() {
        let mut registry = ProviderRegistry::new();
        registry
            .register(ProviderConfig::openai("sk-secret-1"))
            .unwrap();
        let cleaned = registry.redact("error for key sk-secret-1 at upstream");
        assert!(!cleaned.contains("sk-secret-1"));
        assert!(cleaned.contains("[redacted]"));
    }
}
