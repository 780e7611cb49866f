//! # norvos-backend
//!
//! Hierarchical key-value backend abstraction for storing DNS records in the
//! layout SkyDNS and the CoreDNS `etcd` plugin read from: one record per key,
//! keys built from reversed domain labels under a root such as `/coredns/`.
//!
//! ## Supported Backends
//!
//! | Backend | Feature Flag | Notes |
//! |---------|-------------|-------|
//! | [etcd](https://etcd.io/) v2 keys API | `etcd` | Quorum reads, `prevExist` conditional writes, basic auth |
//! | In-memory | `memory` | Process-local, records calls, injectable latency/faults |
//!
//! ## Feature Flags
//!
//! - **`all-backends`** *(default)*: Enable all backends listed above.
//! - **`native-tls`** *(default)*: Use the platform's native TLS implementation.
//! - **`rustls`**: Use rustls.
//!
//! ## Usage
//!
//! ```rust,no_run
//! use norvos_backend::{create_backend, BackendConfig, GetOptions, PutOptions};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let backend = create_backend(&BackendConfig::Etcd {
//!         endpoint: "http://127.0.0.1:2379".to_string(),
//!         username: None,
//!         password: None,
//!         connect_timeout_secs: 10,
//!     })?;
//!
//!     let key = "/coredns/com/example/www";
//!     backend.create(key, r#"{"host":"10.0.0.1","ttl":300}"#, &PutOptions::default()).await?;
//!
//!     let read = backend.get(key, &GetOptions::default()).await?;
//!     println!("{} = {:?} (rev {})", read.key, read.value, read.revision);
//!     Ok(())
//! }
//! ```
//!
//! ## Error Handling
//!
//! All operations return [`Result<T, BackendError>`](BackendError). Store-native
//! error codes are mapped per backend onto structured variants:
//!
//! - [`BackendError::KeyExists`]: create-if-absent found the key
//! - [`BackendError::KeyNotFound`]: the key is absent
//! - [`BackendError::Timeout`]: the caller's deadline passed
//! - [`BackendError::NetworkError`]: the store could not be reached
//!
//! Nothing is retried; every failure is reported once to the caller.

#[cfg(not(any(feature = "etcd", feature = "memory")))]
compile_error!("norvos-backend needs at least one backend feature: `etcd` or `memory`");

mod backends;
mod error;
mod factory;
#[cfg(feature = "etcd")]
mod http_client;
mod traits;
mod types;

// Re-export error types
pub use error::{BackendError, Result};

// Re-export factory
pub use factory::create_backend;

// Re-export core trait only (internal traits are not exported)
pub use traits::KeyValueBackend;

// Re-export types
pub use types::{
    BackendConfig, BackendType, DEFAULT_CONNECT_TIMEOUT_SECS, DEFAULT_ETCD_ENDPOINT,
    DeleteOptions, GetOptions, PutOptions, StoreAction, StoreResponse, remaining,
};

// Re-export concrete backends (behind feature flags)
#[cfg(feature = "etcd")]
pub use backends::EtcdBackend;

#[cfg(feature = "memory")]
pub use backends::{BackendCall, MemoryBackend};
