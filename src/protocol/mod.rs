//! # Wire Protocol Components
//!
//! Fixed-layout decoding of captured server messages.
//!
//! This module owns the wire-facing types: the 32-byte message header every
//! server message begins with, and the best-effort enumeration of known
//! message-type codes.
//!
//! ## Wire Format
//! ```text
//! [Length(4)] [ActorID(4)] [LoginUserID(4)] [Unk1(4)] [Unk2(2)] [Type(2)] [Unk3(4)] [Seconds(4)] [Unk4(4)]
//! ```
//!
//! All fields are little-endian. Reserved fields are carried verbatim and
//! never interpreted.

pub mod header;

pub use header::{MessageHeader, MessageType};
