#![allow(clippy::pedantic)]
#![allow(clippy::nursery)]
#![deny(clippy::unwrap_used)]
#![allow(clippy::missing_errors_doc)]
#![allow(clippy::similar_names)]

pub mod crypto;
pub mod jwk;
pub mod wrap;

pub use crate::crypto::*;
pub use crate::jwk::*;
pub use crate::wrap::*;
