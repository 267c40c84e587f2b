//! Intermediate Representation (IR) for mockgen
//!
//! This module provides the resolved type graph and the interface/method
//! model built from it.

pub mod interface;
pub mod types;

pub use interface::*;
pub use types::*;
