//! Key-value backend implementations

#[cfg(feature = "etcd")]
mod etcd;
#[cfg(feature = "memory")]
mod memory;

#[cfg(feature = "etcd")]
pub use etcd::EtcdBackend;
#[cfg(feature = "memory")]
pub use memory::{BackendCall, MemoryBackend};
