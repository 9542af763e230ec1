//! Adapters for externally owned participant resources.
mod error;
mod memory;
mod traits;

pub use error::{RepositoryError, Result};
pub use memory::InMemoryResourceRepository;
pub use traits::{ResourceRepository, StoredResources};
