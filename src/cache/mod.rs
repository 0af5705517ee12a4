//! Response caching for provider requests.
//!
//! This module is provider-agnostic:
//! - Entries are addressed by a hashed `QueryKey` (operation + parameters)
//! - Entries remember their scope so a whole operation can be dropped at once
//! - Storage is swappable: in-memory for normal runs, no-op when disabled

mod layer;
mod storage;
mod traits;

pub use layer::CacheLayer;
pub use storage::{CacheStorage, MemoryStorage, NoopStorage};
pub use traits::{CacheResult, CacheSource, QueryKey};
