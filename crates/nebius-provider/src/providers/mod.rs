//! Vendor implementations.

pub mod nebius;
pub mod openai_compat;
