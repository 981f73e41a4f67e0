//! # Utility Modules
//!
//! Supporting utilities shared across the crate.
//!
//! ## Components
//! - **Logging**: Structured logging configuration for host applications

pub mod logging;
