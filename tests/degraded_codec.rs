#![allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]
//! Loader lifecycle and degraded-mode behavior: every codec operation must be
//! callable at any point in the load/unload lifecycle without panicking.

use capture_codec::{CodecError, CodecOffsets, NativeCodec, OffsetTable};
use std::sync::Arc;

fn bogus_offsets() -> CodecOffsets {
    CodecOffsets {
        malloc_slot: 0x10,
        free_slot: 0x18,
        state_size: 0x20,
        shared_size: 0x28,
        shared_set_window: 0x30,
        train: 0x38,
        encode: 0x40,
        decode: 0x48,
    }
}

// ============================================================================
// DEGRADED MODE
// ============================================================================

#[test]
fn test_neutral_results_before_any_load() {
    let codec = NativeCodec::new();

    assert_eq!(codec.state_size(), 0);
    for bits in 0..24 {
        assert_eq!(codec.shared_size(bits), 0);
    }

    let mut state = vec![0u8; 16];
    let mut shared = vec![0u8; 16];
    let mut out = vec![0u8; 256];
    codec.set_window(&mut shared, 19, b"window data");
    codec.train(&mut state, &mut shared, &[b"sample one", b"sample two"]);
    assert!(!codec.encode(&mut state, &mut shared, b"payload", &mut out));
    assert!(!codec.decode(&mut state, &mut shared, b"payload", &mut out));
}

#[test]
fn test_empty_buffers_are_safe_in_degraded_mode() {
    let codec = NativeCodec::new();
    let mut empty: Vec<u8> = Vec::new();
    codec.set_window(&mut empty.clone(), 0, &[]);
    codec.train(&mut empty.clone(), &mut empty.clone(), &[]);
    assert!(!codec.encode(&mut empty.clone(), &mut empty.clone(), &[], &mut empty));
}

// ============================================================================
// LOAD / UNLOAD LIFECYCLE
// ============================================================================

#[test]
fn test_load_nonexistent_path_then_unload() {
    let codec = NativeCodec::new();
    assert!(matches!(
        codec.load("/path/to/nothing.exe"),
        Err(CodecError::LoadFailure(_))
    ));
    assert!(!codec.is_ready());

    codec.unload();
    codec.unload();
    assert!(!codec.is_ready());
}

#[test]
fn test_unknown_build_fails_closed() {
    let file = tempfile::NamedTempFile::new().unwrap();
    std::fs::write(file.path(), vec![0u8; 777]).unwrap();

    let codec = NativeCodec::new();
    assert!(matches!(
        codec.load(file.path()),
        Err(CodecError::UnknownBuild(777))
    ));
    assert!(!codec.is_ready());
}

#[test]
fn test_offsets_from_toml_drive_the_loader() {
    let table = OffsetTable::from_toml(
        r#"
        [[builds]]
        image_len = 555
        malloc_slot = 0x10
        free_slot = 0x18
        state_size = 0x20
        shared_size = 0x28
        shared_set_window = 0x30
        train = 0x38
        encode = 0x40
        decode = 0x48
    "#,
    )
    .unwrap();

    let file = tempfile::NamedTempFile::new().unwrap();
    std::fs::write(file.path(), vec![0u8; 555]).unwrap();

    // fingerprint is recognized, so failure moves past build lookup to the
    // image mapping itself
    let codec = NativeCodec::with_offsets(table);
    assert!(matches!(
        codec.load(file.path()),
        Err(CodecError::LoadFailure(_))
    ));
    assert!(!codec.is_ready());
}

#[test]
fn test_failed_load_does_not_block_retry_with_other_table() {
    let file = tempfile::NamedTempFile::new().unwrap();
    std::fs::write(file.path(), vec![0u8; 888]).unwrap();

    let mut table = OffsetTable::default();
    table.insert(888, bogus_offsets());

    let codec = NativeCodec::with_offsets(table);
    assert!(codec.load("/nope").is_err());
    // second attempt takes the normal path, no stuck partial state
    assert!(matches!(
        codec.load(file.path()),
        Err(CodecError::LoadFailure(_))
    ));
    assert!(!codec.is_ready());
}

// ============================================================================
// CONCURRENCY
// ============================================================================

#[test]
fn test_concurrent_invocation_and_lifecycle_churn() {
    let codec = Arc::new(NativeCodec::new());
    let mut handles = Vec::new();

    for worker in 0..4 {
        let codec = Arc::clone(&codec);
        handles.push(std::thread::spawn(move || {
            let mut state = vec![0u8; 32];
            let mut shared = vec![0u8; 32];
            let mut out = vec![0u8; 128];
            for i in 0..200 {
                match (worker + i) % 4 {
                    0 => {
                        let _ = codec.load("/no/such/image");
                    }
                    1 => codec.unload(),
                    2 => {
                        assert_eq!(codec.state_size(), 0);
                        assert_eq!(codec.shared_size(17), 0);
                    }
                    _ => {
                        assert!(!codec.decode(&mut state, &mut shared, b"zz", &mut out));
                    }
                }
            }
        }));
    }

    for handle in handles {
        handle.join().expect("worker panicked");
    }
    assert!(!codec.is_ready());
}
