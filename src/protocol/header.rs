//! # Message Header
//!
//! The fixed 32-byte header that prefixes every captured server message.
//!
//! Parsing is pure and in-place: the header is read field by field from the
//! front of a byte slice with no validation beyond length. Message-type codes
//! drift between client builds, so the raw `u16` is always preserved and
//! symbol lookup is best-effort — an unrecognized code is a valid header,
//! not an error.

use crate::config::HEADER_SIZE;
use crate::error::{CodecError, Result};
use bytes::{Buf, BufMut};

/// Known server message-type codes.
///
/// These constants are build-specific and move between client revisions;
/// several names were adopted from community reverse-engineering projects.
/// Use [`MessageType::from_code`] for lookup — it returns `None` for codes
/// that have not been labeled yet.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u16)]
pub enum MessageType {
    StatusEffectList = 0x263,
    BossStatusEffectList = 0x312,
    Ability1 = 0x2aa,
    Ability8 = 0x0b3,
    Ability16 = 0x0e6,
    Ability24 = 0x10a,
    Ability32 = 0x1c8,
    ActorCast = 0x1ec,
    AddStatusEffect = 0x10b,
    ActorControl142 = 0x12f,
    ActorControl143 = 0x201,
    ActorControl144 = 0x1be,
    UpdateHpMpTp = 0x075,
    PlayerSpawn = 0x0dc,
    NpcSpawn = 0x219,
    NpcSpawn2 = 0x314,
    ActorMove = 0x1a2,
    ActorSetPos = 0x296,
    ActorGauge = 0x337,
}

impl MessageType {
    /// Best-effort lookup of a wire code. Unknown codes return `None`.
    pub fn from_code(code: u16) -> Option<Self> {
        match code {
            0x263 => Some(Self::StatusEffectList),
            0x312 => Some(Self::BossStatusEffectList),
            0x2aa => Some(Self::Ability1),
            0x0b3 => Some(Self::Ability8),
            0x0e6 => Some(Self::Ability16),
            0x10a => Some(Self::Ability24),
            0x1c8 => Some(Self::Ability32),
            0x1ec => Some(Self::ActorCast),
            0x10b => Some(Self::AddStatusEffect),
            0x12f => Some(Self::ActorControl142),
            0x201 => Some(Self::ActorControl143),
            0x1be => Some(Self::ActorControl144),
            0x075 => Some(Self::UpdateHpMpTp),
            0x0dc => Some(Self::PlayerSpawn),
            0x219 => Some(Self::NpcSpawn),
            0x314 => Some(Self::NpcSpawn2),
            0x1a2 => Some(Self::ActorMove),
            0x296 => Some(Self::ActorSetPos),
            0x337 => Some(Self::ActorGauge),
            _ => None,
        }
    }

    /// The wire code for this message type
    pub fn code(self) -> u16 {
        self as u16
    }
}

/// Fixed 32-byte server message header, little-endian.
///
/// Field offsets are fixed per protocol build. The `unknown_*` fields are
/// reserved/opaque: no semantic meaning is inferred and any bit pattern is
/// accepted, including for `message_type`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MessageHeader {
    /// Total message length including this header
    pub message_length: u32,
    /// Actor the message concerns
    pub actor_id: u32,
    /// Logged-in character the capture belongs to
    pub login_user_id: u32,
    pub unknown1: u32,
    pub unknown2: u16,
    /// Raw message-type code; see [`MessageHeader::known_type`]
    pub message_type: u16,
    pub unknown3: u32,
    /// Server epoch timestamp, seconds
    pub seconds: u32,
    pub unknown4: u32,
}

impl MessageHeader {
    /// Wire size of the header in bytes
    pub const SIZE: usize = HEADER_SIZE;

    /// Parse a header from the front of `bytes`.
    ///
    /// Requires at least 32 bytes; anything shorter fails with
    /// [`CodecError::TruncatedHeader`]. No value validation is performed —
    /// any bit pattern in any field is a valid header.
    pub fn parse(bytes: &[u8]) -> Result<Self> {
        if bytes.len() < Self::SIZE {
            return Err(CodecError::TruncatedHeader(bytes.len(), Self::SIZE));
        }

        let mut buf = &bytes[..Self::SIZE];
        Ok(Self {
            message_length: buf.get_u32_le(),
            actor_id: buf.get_u32_le(),
            login_user_id: buf.get_u32_le(),
            unknown1: buf.get_u32_le(),
            unknown2: buf.get_u16_le(),
            message_type: buf.get_u16_le(),
            unknown3: buf.get_u32_le(),
            seconds: buf.get_u32_le(),
            unknown4: buf.get_u32_le(),
        })
    }

    /// Serialize back to the exact wire representation
    pub fn to_bytes(&self) -> [u8; Self::SIZE] {
        let mut out = [0u8; Self::SIZE];
        let mut buf = &mut out[..];
        buf.put_u32_le(self.message_length);
        buf.put_u32_le(self.actor_id);
        buf.put_u32_le(self.login_user_id);
        buf.put_u32_le(self.unknown1);
        buf.put_u16_le(self.unknown2);
        buf.put_u16_le(self.message_type);
        buf.put_u32_le(self.unknown3);
        buf.put_u32_le(self.seconds);
        buf.put_u32_le(self.unknown4);
        out
    }

    /// The known message type, if this build's code table has a label for it
    pub fn known_type(&self) -> Option<MessageType> {
        MessageType::from_code(self.message_type)
    }

    /// The payload region of a message whose header parsed from `bytes`,
    /// bounded by `message_length`. Returns `None` when the declared length
    /// is shorter than the header or longer than the captured bytes.
    pub fn payload<'a>(&self, bytes: &'a [u8]) -> Option<&'a [u8]> {
        let end = self.message_length as usize;
        if end < Self::SIZE || end > bytes.len() {
            return None;
        }
        Some(&bytes[Self::SIZE..end])
    }
}
