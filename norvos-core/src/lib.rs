//! norvos DNS record component
//!
//! Stores DNS records in a hierarchical key-value backend using the SkyDNS /
//! CoreDNS `etcd` plugin layout and exposes four operations to the host:
//! - `create`: write a record only if none exists for the name
//! - `read`: quorum read of the record for a name
//! - `update`: replace an existing record
//! - `delete`: remove the record for a name, never its descendants
//!
//! Every operation makes one backend call bounded by a 5 second deadline and
//! reports failures through the [`ErrorKind`] taxonomy.
//!
//! ```rust,no_run
//! use norvos_core::{ComponentConfig, DnsComponent, RequestContext};
//!
//! # async fn run() -> Result<(), norvos_core::CoreError> {
//! let mut component = DnsComponent::new();
//! component.start(&ComponentConfig::from_json(r#"{"backend":{"type":"etcd"}}"#)?)?;
//!
//! let registry = component.discover()?;
//! if let Some(create) = registry.get("create") {
//!     let input = br#"{"name":"www.example.com","host":"10.0.0.1"}"#;
//!     let result = create.execute(Some(&RequestContext::background()), input).await?;
//!     println!("stored at {}", result.key);
//! }
//! component.stop();
//! # Ok(())
//! # }
//! ```

pub mod component;
pub mod config;
pub mod context;
pub mod error;
pub mod handler;
pub mod keymap;
pub mod record;
pub mod registry;
pub mod translate;

#[cfg(test)]
mod test_utils;

// Re-export common types
pub use component::{ComponentBuilder, DnsComponent};
pub use config::ComponentConfig;
pub use context::{RequestContext, OPERATION_TIMEOUT};
pub use error::{CoreError, CoreResult, ErrorKind};
pub use handler::{Operation, OperationKind, OperationResult, RecordHandler};
pub use keymap::{reverse_name, KeyMapper, KeyRoot};
pub use record::{RecordPayload, DEFAULT_TTL};
pub use registry::OperationRegistry;

// Re-export backend library types hosts commonly need
pub use norvos_backend::{BackendConfig, KeyValueBackend, StoreAction, StoreResponse};
