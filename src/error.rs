//! # Error Types
//!
//! Error handling for header decoding and the native codec bridge.
//!
//! This module defines all error variants that can occur while parsing
//! captured message headers and while loading the foreign codec image.
//!
//! ## Error Categories
//! - **Format Errors**: Truncated header bytes
//! - **Bridge Errors**: Allocator contract violations
//! - **Loader Errors**: Image load, build lookup, and entry-point resolution failures
//! - **Configuration Errors**: Offset-table file problems
//!
//! All errors implement `std::error::Error` for interoperability.
//!
//! Codec *invocation* never surfaces here: operations called while no image
//! is loaded degrade to neutral values (`0`, `false`, no-op) rather than
//! returning an error, so nothing from the native call path crosses into
//! caller code as a panic or exception.

use std::io;
use thiserror::Error;

// CodecError is the primary error type for all header and loader operations
#[derive(Error, Debug)]
pub enum CodecError {
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    #[error("truncated message header: got {0} bytes, need {1}")]
    TruncatedHeader(usize, usize),

    #[error("alignment {0} is not a power of two")]
    InvalidAlignment(usize),

    #[error("heap allocation of {0} bytes failed")]
    AllocationFailure(usize),

    #[error("failed to load codec image: {0}")]
    LoadFailure(String),

    #[error("unrecognized image build: {0}-byte image has no offset-table entry")]
    UnknownBuild(u64),

    #[error("failed to resolve codec entry points: {0}")]
    ResolveFailure(String),

    #[error("configuration error: {0}")]
    ConfigError(String),
}

/// Type alias for Results using CodecError
pub type Result<T> = std::result::Result<T, CodecError>;
