//! Component lifecycle
//!
//! The host starts the component with a [`ComponentConfig`], discovers its
//! operations by name, and stops it on shutdown. `stop` only drops the
//! component's own handles; registries already handed out keep their backend
//! alive until the host releases them, so in-flight calls run to completion.

use std::sync::Arc;

use norvos_backend::{create_backend, KeyValueBackend};

use crate::config::ComponentConfig;
use crate::error::{CoreError, CoreResult};
use crate::keymap::{KeyMapper, KeyRoot};
use crate::registry::OperationRegistry;

/// The DNS record component.
#[derive(Debug, Default)]
pub struct DnsComponent {
    registry: Option<OperationRegistry>,
}

impl DnsComponent {
    /// Name the host discovers the component by.
    pub const NAME: &'static str = "dns";
    pub const VERSION: &'static str = "1.0";

    /// A stopped component.
    pub fn new() -> Self {
        Self::default()
    }

    /// Open the configured backend and register the operations.
    ///
    /// # Errors
    /// - [`CoreError::AlreadyStarted`] when called twice without `stop`
    /// - [`CoreError::Config`] when the backend cannot be constructed
    pub fn start(&mut self, config: &ComponentConfig) -> CoreResult<()> {
        if self.registry.is_some() {
            return Err(CoreError::AlreadyStarted);
        }
        let backend =
            create_backend(&config.backend).map_err(|e| CoreError::Config(e.to_string()))?;
        self.install(backend, &config.key_root);
        Ok(())
    }

    /// Release the backend handle. Stopping a stopped component is a no-op.
    pub fn stop(&mut self) {
        if self.registry.take().is_some() {
            log::info!("{} component stopped", Self::NAME);
        }
    }

    pub fn is_started(&self) -> bool {
        self.registry.is_some()
    }

    /// Operations exposed to the host.
    ///
    /// # Errors
    /// [`CoreError::NotStarted`] before `start` or after `stop`.
    pub fn discover(&self) -> CoreResult<OperationRegistry> {
        self.registry.clone().ok_or(CoreError::NotStarted)
    }

    fn install(&mut self, backend: Arc<dyn KeyValueBackend>, key_root: &KeyRoot) {
        let mapper = KeyMapper::new(key_root);
        log::info!(
            "{} component v{} started: backend={}, root={}",
            Self::NAME,
            Self::VERSION,
            backend.id(),
            mapper.root()
        );
        self.registry = Some(OperationRegistry::new(backend, mapper));
    }
}

/// Builds a started [`DnsComponent`] around an already constructed backend.
///
/// # Required
/// - `backend`
///
/// # Optional
/// - `key_root`: defaults to [`KeyRoot::CoreDns`]
pub struct ComponentBuilder {
    backend: Option<Arc<dyn KeyValueBackend>>,
    key_root: Option<KeyRoot>,
}

impl ComponentBuilder {
    #[must_use]
    pub fn new() -> Self {
        Self {
            backend: None,
            key_root: None,
        }
    }

    #[must_use]
    pub fn backend(mut self, backend: Arc<dyn KeyValueBackend>) -> Self {
        self.backend = Some(backend);
        self
    }

    #[must_use]
    pub fn key_root(mut self, key_root: KeyRoot) -> Self {
        self.key_root = Some(key_root);
        self
    }

    /// Build the component in the started state.
    ///
    /// # Errors
    /// Returns `CoreError::Config` if no backend was supplied.
    pub fn build(self) -> CoreResult<DnsComponent> {
        let backend = self
            .backend
            .ok_or_else(|| CoreError::Config("backend is required".to_string()))?;
        let key_root = self.key_root.unwrap_or_default();

        let mut component = DnsComponent::new();
        component.install(backend, &key_root);
        Ok(component)
    }
}

impl Default for ComponentBuilder {
    fn default() -> Self {
        Self::new()
    }
}
