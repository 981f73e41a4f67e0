#![allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]
//! Edge-case coverage for the 32-byte message header: boundary lengths,
//! opaque fields, and exact re-serialization.

use capture_codec::error::CodecError;
use capture_codec::{MessageHeader, MessageType};

// ============================================================================
// PARSE / SERIALIZE PROPERTIES
// ============================================================================

#[test]
fn test_parse_serialize_identity_for_arbitrary_patterns() {
    // deterministic pseudo-random byte patterns, no value is invalid
    let mut seed = 0x2545_f491u32;
    for _ in 0..64 {
        let mut bytes = [0u8; 32];
        for b in bytes.iter_mut() {
            seed = seed.wrapping_mul(1_664_525).wrapping_add(1_013_904_223);
            *b = (seed >> 24) as u8;
        }
        let header = MessageHeader::parse(&bytes).expect("any 32-byte pattern parses");
        assert_eq!(header.to_bytes(), bytes);
    }
}

#[test]
fn test_all_truncated_lengths_fail() {
    let bytes = [0x5Au8; 32];
    for len in 0..32 {
        let result = MessageHeader::parse(&bytes[..len]);
        assert!(
            matches!(result, Err(CodecError::TruncatedHeader(got, 32)) if got == len),
            "length {len} must be rejected"
        );
    }
}

#[test]
fn test_exact_boundary_length_parses() {
    let bytes = [0u8; 32];
    assert!(MessageHeader::parse(&bytes).is_ok());
}

#[test]
fn test_documented_actor_gauge_scenario() {
    let bytes = [
        20, 0, 0, 0, 1, 0, 0, 0, 2, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0x37, 0x03, 0, 0, 0, 0, 100, 0, 0,
        0, 0, 0, 0, 0,
    ];
    let header = MessageHeader::parse(&bytes).unwrap();
    assert_eq!(header.message_length, 20);
    assert_eq!(header.actor_id, 1);
    assert_eq!(header.login_user_id, 2);
    assert_eq!(header.message_type, 0x0337);
    assert_eq!(header.known_type(), Some(MessageType::ActorGauge));
    assert_eq!(header.seconds, 100);
    assert_eq!(
        (header.unknown1, header.unknown2, header.unknown3, header.unknown4),
        (0, 0, 0, 0)
    );
}

// ============================================================================
// MESSAGE TYPE LOOKUP
// ============================================================================

#[test]
fn test_unknown_codes_are_opaque_not_errors() {
    for code in [0u16, 0x0001, 0x7777, 0xFFFF] {
        assert_eq!(MessageType::from_code(code), None);

        let mut bytes = [0u8; 32];
        bytes[18..20].copy_from_slice(&code.to_le_bytes());
        let header = MessageHeader::parse(&bytes).unwrap();
        assert_eq!(header.message_type, code);
        assert_eq!(header.known_type(), None);
    }
}

#[test]
fn test_every_known_code_resolves_to_itself() {
    let all = [
        MessageType::StatusEffectList,
        MessageType::BossStatusEffectList,
        MessageType::Ability1,
        MessageType::Ability8,
        MessageType::Ability16,
        MessageType::Ability24,
        MessageType::Ability32,
        MessageType::ActorCast,
        MessageType::AddStatusEffect,
        MessageType::ActorControl142,
        MessageType::ActorControl143,
        MessageType::ActorControl144,
        MessageType::UpdateHpMpTp,
        MessageType::PlayerSpawn,
        MessageType::NpcSpawn,
        MessageType::NpcSpawn2,
        MessageType::ActorMove,
        MessageType::ActorSetPos,
        MessageType::ActorGauge,
    ];
    for ty in all {
        assert_eq!(MessageType::from_code(ty.code()), Some(ty));
    }
}
