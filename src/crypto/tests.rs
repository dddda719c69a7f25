//! Unit tests for key derivation and counter-mode decryption.

use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use base64::Engine;

use crate::crypto::aes_ctr::{advance_counter, decrypt_chunk, DecryptError};
use crate::crypto::key::{KeyError, KeyMaterial};

// ── Helpers ──────────────────────────────────────────────────────────

/// Token whose decoded bytes are the sequence 0, 1, ..., 31.
fn sequence_token() -> String {
    let decoded: Vec<u8> = (0u8..32).collect();
    URL_SAFE_NO_PAD.encode(decoded)
}

fn test_key() -> KeyMaterial {
    KeyMaterial {
        key: [0x01; 16],
        iv: [0x00; 8],
        meta_mac: [0x00; 8],
    }
}

// ── Key derivation ───────────────────────────────────────────────────

#[test]
fn test_from_base64_valid() {
    let token = URL_SAFE_NO_PAD.encode([0u8; 32]);
    let key = KeyMaterial::from_base64(&token).expect("derivation failed");
    assert_eq!(key.key, [0u8; 16]);
    assert_eq!(key.iv, [0u8; 8]);
    assert_eq!(key.meta_mac, [0u8; 8]);
}

#[test]
fn test_from_base64_xor_fold() {
    let key = KeyMaterial::from_base64(&sequence_token()).unwrap();

    // key[i] = decoded[i] ^ decoded[i + 16]; for the 0..32 sequence every
    // fold yields 0x10 since i + 16 only flips bit 4.
    for i in 0..16u8 {
        assert_eq!(key.key[i as usize], i ^ (i + 16));
    }
    assert_eq!(hex::encode(key.key), "10".repeat(16));
    // iv and meta_mac are copied verbatim from the second half
    assert_eq!(hex::encode(key.iv), "1011121314151617");
    assert_eq!(hex::encode(key.meta_mac), "18191a1b1c1d1e1f");
}

#[test]
fn test_key_material_debug_redacts_key() {
    let key = KeyMaterial {
        key: [0xAA; 16],
        iv: [0x00; 8],
        meta_mac: [0x00; 8],
    };
    let rendered = format!("{:?}", key);
    assert!(rendered.contains("<redacted>"), "got {rendered}");
    assert!(!rendered.contains("170"), "cipher key leaked: {rendered}");
}

#[test]
fn test_from_base64_deterministic() {
    let token = sequence_token();
    let a = KeyMaterial::from_base64(&token).unwrap();
    let b = KeyMaterial::from_base64(&token).unwrap();
    assert_eq!(a, b);
}

#[test]
fn test_from_base64_short_token() {
    let token = URL_SAFE_NO_PAD.encode([0u8; 16]);
    match KeyMaterial::from_base64(&token) {
        Err(KeyError::Length { got }) => assert_eq!(got, 16),
        other => panic!("expected length error, got {:?}", other.err()),
    }
}

#[test]
fn test_from_base64_invalid_encoding() {
    match KeyMaterial::from_base64("!!!notbase64$$$") {
        Err(KeyError::Format) => {}
        other => panic!("expected format error, got {:?}", other.err()),
    }
}

// ── Counter arithmetic ───────────────────────────────────────────────

#[test]
fn test_advance_counter_by_one() {
    let mut iv = [0, 0, 0, 0, 0, 0, 0, 1];
    advance_counter(&mut iv, 1);
    assert_eq!(iv, [0, 0, 0, 0, 0, 0, 0, 2]);
}

#[test]
fn test_advance_counter_carry() {
    let mut iv = [0, 0, 0, 0, 0, 0, 0, 1];
    advance_counter(&mut iv, 256);
    assert_eq!(iv, [0, 0, 0, 0, 0, 0, 1, 1]);
}

#[test]
fn test_advance_counter_carry_across_iv_half() {
    // A saturated low half carries into the IV half of the block.
    let mut block = [0u8; 16];
    block[8..].fill(0xff);
    advance_counter(&mut block, 1);

    let mut expected = [0u8; 16];
    expected[7] = 1;
    assert_eq!(block, expected);
}

// ── Decryption ───────────────────────────────────────────────────────

#[test]
fn test_decrypt_chunk_roundtrip_at_zero() {
    let key = test_key();
    let plaintext = b"test-encrypted-content";

    let ciphertext = decrypt_chunk(plaintext, &key, 0).unwrap();
    assert_ne!(&ciphertext[..], &plaintext[..]);
    assert_eq!(ciphertext.len(), plaintext.len());

    let decrypted = decrypt_chunk(&ciphertext, &key, 0).unwrap();
    assert_eq!(&decrypted[..], &plaintext[..]);
}

#[test]
fn test_decrypt_chunk_roundtrip_at_offset() {
    let key = KeyMaterial::from_base64(&sequence_token()).unwrap();
    let plaintext = vec![0xAB; 100];

    let ciphertext = decrypt_chunk(&plaintext, &key, 4096).unwrap();
    let decrypted = decrypt_chunk(&ciphertext, &key, 4096).unwrap();
    assert_eq!(decrypted, plaintext);
}

#[test]
fn test_decrypt_chunk_keystream_is_positional() {
    // Decrypting the tail of a stream at its own offset must agree with
    // decrypting the whole stream at once.
    let key = KeyMaterial::from_base64(&sequence_token()).unwrap();
    let plaintext: Vec<u8> = (0..64).map(|i| i as u8).collect();

    let ciphertext = decrypt_chunk(&plaintext, &key, 0).unwrap();
    let tail = decrypt_chunk(&ciphertext[32..], &key, 32).unwrap();
    assert_eq!(&tail[..], &plaintext[32..]);
}

#[test]
fn test_decrypt_chunk_empty_input() {
    match decrypt_chunk(&[], &test_key(), 0) {
        Err(DecryptError::EmptyInput) => {}
        other => panic!("expected empty-input error, got {:?}", other.err()),
    }
}

#[test]
fn test_decrypt_chunk_misaligned_offset() {
    match decrypt_chunk(b"data", &test_key(), 7) {
        Err(DecryptError::MisalignedOffset { offset }) => assert_eq!(offset, 7),
        other => panic!("expected misaligned-offset error, got {:?}", other.err()),
    }
}

#[test]
fn test_decrypt_chunk_preserves_length() {
    let key = test_key();
    for len in [1usize, 15, 16, 17, 1000] {
        let out = decrypt_chunk(&vec![0u8; len], &key, 0).unwrap();
        assert_eq!(out.len(), len);
    }
}
