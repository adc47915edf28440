//! Roofline Core - Domain models, ports, and configuration
//!
//! This crate holds the data model shared by the acquisition pipeline and the
//! interactive editor, the error type, layered configuration, and the port
//! traits that detector and imagery adapters implement.

pub mod config;
pub mod error;
pub mod models;
pub mod ports;

pub use error::{Result, RooflineError};
