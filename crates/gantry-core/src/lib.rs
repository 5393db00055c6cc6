//! Gantry Core - Core library for the gantry release pipeline
//!
//! This crate provides the foundational types, error handling, configuration,
//! and CI context for the gantry pipeline steps.

pub mod config;
pub mod context;
pub mod error;
pub mod types;

pub use context::CiContext;
pub use error::{GantryError, Result};
pub use types::BumpLevel;
