//! Error types

mod kit;
mod provider;

pub use kit::*;
pub use provider::*;
