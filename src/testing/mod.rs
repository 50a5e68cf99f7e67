//! Testing utilities and mock implementations
//!
//! Mock rules for exercising the intent router's ordering and fall-through
//! behaviour in isolation.

pub mod mocks;

pub use mocks::*;
