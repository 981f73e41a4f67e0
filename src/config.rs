//! # Offset-Table Configuration
//!
//! Versioned entry-point offset tables for the foreign codec image.
//!
//! The compression routines this crate bridges to are not exported symbols;
//! they are located by fixed byte offsets from the image base, and those
//! offsets change with every client build. This module keys a set of offsets
//! to a build fingerprint so the loader can fail closed instead of patching
//! and calling into the wrong addresses.
//!
//! ## Build Fingerprint
//! The fingerprint is the on-disk length of the image file in bytes. It is
//! cheap to compute, stable for a given build, and can be verified offline
//! against a known client install.
//!
//! ## Configuration Sources
//! - Built-in table via `OffsetTable::builtin()` (the currently supported build)
//! - TOML files via `OffsetTable::from_file()` for newer builds:
//!
//! ```toml
//! [[builds]]
//! image_len = 46792704
//! malloc_slot = 0x1f21cf8
//! free_slot = 0x1f21d00
//! state_size = 0x153d470
//! shared_size = 0x153edf0
//! shared_set_window = 0x153ecc0
//! train = 0x153d920
//! encode = 0x153ce20
//! decode = 0x153cdd0
//! ```

use crate::error::{CodecError, Result};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::Path;

/// Size of the wire message header in bytes
pub const HEADER_SIZE: usize = 32;

/// On-disk length of the client build the built-in offsets were extracted from
pub const SUPPORTED_IMAGE_LEN: u64 = 46_792_704;

/// Offsets into the loaded codec image, in bytes from the image base.
///
/// `malloc_slot` and `free_slot` are writable pointer slots the image reads
/// its allocator callbacks from; the remaining five are code addresses.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize)]
pub struct CodecOffsets {
    /// Pointer slot the image reads its `malloc(size, align)` callback from
    pub malloc_slot: usize,

    /// Pointer slot the image reads its `free(ptr)` callback from
    pub free_slot: usize,

    /// Per-session state size query, `fn() -> i32`
    pub state_size: usize,

    /// Shared-dictionary size query, `fn(window_bits) -> i32`
    pub shared_size: usize,

    /// Shared-dictionary window setup, `fn(shared, window_bits, window, window_len)`
    pub shared_set_window: usize,

    /// Training pass over sample packets
    pub train: usize,

    /// Packet encoder, returns nonzero on success
    pub encode: usize,

    /// Packet decoder, returns nonzero on success
    pub decode: usize,
}

/// A single build entry as it appears in a TOML offset file
#[derive(Debug, Clone, Deserialize, Serialize)]
struct BuildEntry {
    image_len: u64,
    #[serde(flatten)]
    offsets: CodecOffsets,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
struct OffsetFile {
    #[serde(default)]
    builds: Vec<BuildEntry>,
}

/// Maps build fingerprints (image file length) to their codec offsets
#[derive(Debug, Clone, Default)]
pub struct OffsetTable {
    builds: HashMap<u64, CodecOffsets>,
}

impl OffsetTable {
    /// Table containing only the currently supported client build
    pub fn builtin() -> Self {
        let mut builds = HashMap::new();
        builds.insert(
            SUPPORTED_IMAGE_LEN,
            CodecOffsets {
                malloc_slot: 0x1f2_1cf8,
                free_slot: 0x1f2_1d00,
                state_size: 0x153_d470,
                shared_size: 0x153_edf0,
                shared_set_window: 0x153_ecc0,
                train: 0x153_d920,
                encode: 0x153_ce20,
                decode: 0x153_cdd0,
            },
        );
        Self { builds }
    }

    /// Load an offset table from a TOML file
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let contents = std::fs::read_to_string(path)
            .map_err(|e| CodecError::ConfigError(format!("Failed to read offset file: {e}")))?;
        Self::from_toml(&contents)
    }

    /// Load an offset table from a TOML string
    pub fn from_toml(content: &str) -> Result<Self> {
        let file: OffsetFile = toml::from_str(content)
            .map_err(|e| CodecError::ConfigError(format!("Failed to parse offset TOML: {e}")))?;

        let mut builds = HashMap::new();
        for entry in file.builds {
            builds.insert(entry.image_len, entry.offsets);
        }
        Ok(Self { builds })
    }

    /// Register or replace the offsets for one build fingerprint
    pub fn insert(&mut self, image_len: u64, offsets: CodecOffsets) {
        self.builds.insert(image_len, offsets);
    }

    /// Look up the offsets for a build fingerprint, failing closed on unknown builds
    pub fn lookup(&self, image_len: u64) -> Result<CodecOffsets> {
        self.builds
            .get(&image_len)
            .copied()
            .ok_or(CodecError::UnknownBuild(image_len))
    }

    /// Number of builds the table knows about
    pub fn len(&self) -> usize {
        self.builds.len()
    }

    /// Whether the table is empty
    pub fn is_empty(&self) -> bool {
        self.builds.is_empty()
    }
}
