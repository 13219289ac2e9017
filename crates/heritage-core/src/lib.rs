//! Heritage Core - Domain models, errors, and configuration
//!
//! This crate holds the types every other heritage crate speaks: located
//! historical sites, boundary regions, the canonical geometry model, the
//! shared error type, and the layered configuration.

pub mod config;
pub mod error;
pub mod models;

pub use error::{HeritageError, Result};
