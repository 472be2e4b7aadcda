#![allow(clippy::pedantic)]
#![allow(clippy::nursery)]
#![deny(clippy::unwrap_used)]
#![allow(clippy::missing_errors_doc)]
#![allow(clippy::must_use_candidate)]
#![allow(clippy::uninlined_format_args)]

pub mod client;
pub mod engine;
pub mod error;
mod queue;
pub mod registry;
pub mod wire;

pub use crate::client::AuthorityClient;
pub use crate::engine::{EngineOptions, SyncEngine};
pub use crate::error::SyncError;
pub use crate::registry::GroupRegistry;
