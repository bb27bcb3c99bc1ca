//! Persistence of parsed rule programs as opaque ASCII strings.
//!
//! A serialized [`Engine`] is a base64 armor over a small binary envelope:
//! a 32-byte fixed header followed by a bincode-encoded payload. Positions
//! are part of the payload, so deserialization restores the AST exactly as
//! the parser produced it and the result feeds straight into the evaluator.
//!
//! ## Wire format (before armoring)
//!
//! ```text
//! Offset  Size  Field
//! 0       4     Magic bytes: b"EDCT"
//! 4       2     Format version (u16, little-endian)
//! 6       2     Engine version (u16, little-endian)
//! 8       4     Flags (u32, reserved)
//! 12      4     Payload length in bytes (u32, little-endian)
//! 16      16    BLAKE3 hash of the payload (truncated to 16 bytes)
//! 32..    var   Bincode-encoded payload
//! ```
//!
//! The format version must match exactly; the engine version is
//! informational only.

use base64::Engine as _;
use base64::engine::general_purpose::STANDARD;
use thiserror::Error;

use crate::types::Engine;

const MAGIC: &[u8; 4] = b"EDCT";
const FORMAT_VERSION: u16 = 1;
const ENGINE_VERSION: u16 = 1;
const HEADER_SIZE: usize = 32;

/// Errors that can occur when serializing an [`Engine`] to a string.
#[derive(Debug, Error)]
pub enum SerializeError {
    #[error("failed to encode rule program: {0}")]
    Encode(#[from] bincode::error::EncodeError),
}

/// Errors that can occur when deserializing an [`Engine`] from a string.
#[derive(Debug, Error)]
pub enum DeserializeError {
    #[error("not a serialized rule program: {0}")]
    Armor(#[from] base64::DecodeError),

    #[error("not a serialized rule program: invalid magic bytes")]
    BadMagic,

    #[error("incompatible format version: blob is v{blob}, engine supports v{supported}")]
    IncompatibleVersion { blob: u16, supported: u16 },

    #[error("integrity check failed: BLAKE3 checksum mismatch")]
    ChecksumMismatch,

    #[error("payload length mismatch: expected {expected} bytes, got {actual}")]
    LengthMismatch { expected: u32, actual: usize },

    #[error("failed to decode payload: {0}")]
    Decode(#[from] bincode::error::DecodeError),
}

// ---------------------------------------------------------------------------
// Header I/O
// ---------------------------------------------------------------------------

fn write_header(buf: &mut Vec<u8>, payload: &[u8]) {
    let hash = blake3::hash(payload);

    buf.extend_from_slice(MAGIC);
    buf.extend_from_slice(&FORMAT_VERSION.to_le_bytes());
    buf.extend_from_slice(&ENGINE_VERSION.to_le_bytes());
    buf.extend_from_slice(&0u32.to_le_bytes()); // flags (reserved)
    #[allow(clippy::cast_possible_truncation)] // payload will never exceed 4 GiB
    let payload_len = payload.len() as u32;
    buf.extend_from_slice(&payload_len.to_le_bytes());
    buf.extend_from_slice(&hash.as_bytes()[..16]);
}

#[allow(clippy::cast_possible_truncation)] // HEADER_SIZE is 32, always fits in u32
fn read_header(bytes: &[u8]) -> Result<(u16, u32, [u8; 16]), DeserializeError> {
    if bytes.len() < HEADER_SIZE {
        return Err(DeserializeError::LengthMismatch {
            expected: HEADER_SIZE as u32,
            actual: bytes.len(),
        });
    }

    if &bytes[0..4] != MAGIC {
        return Err(DeserializeError::BadMagic);
    }

    let format_version = u16::from_le_bytes([bytes[4], bytes[5]]);
    // bytes[6..8] is engine_version (informational, not used for checks)
    // bytes[8..12] is flags (reserved)
    let payload_len = u32::from_le_bytes([bytes[12], bytes[13], bytes[14], bytes[15]]);

    let mut hash = [0u8; 16];
    hash.copy_from_slice(&bytes[16..32]);

    Ok((format_version, payload_len, hash))
}

// ---------------------------------------------------------------------------
// Public encode/decode
// ---------------------------------------------------------------------------

/// Serialize a parsed rule program to an ASCII-safe string.
///
/// # Errors
///
/// Returns [`SerializeError`] if payload encoding fails.
pub fn serialize(engine: &Engine) -> Result<String, SerializeError> {
    let payload = bincode::serde::encode_to_vec(engine, bincode::config::standard())?;

    let mut buf = Vec::with_capacity(HEADER_SIZE + payload.len());
    write_header(&mut buf, &payload);
    buf.extend_from_slice(&payload);
    Ok(STANDARD.encode(buf))
}

/// Deserialize a rule program previously produced by [`serialize`].
///
/// # Errors
///
/// Returns [`DeserializeError`] on armor, format, integrity or payload
/// failure.
pub fn deserialize(encoded: &str) -> Result<Engine, DeserializeError> {
    let bytes = STANDARD.decode(encoded)?;
    let (format_version, payload_len, stored_hash) = read_header(&bytes)?;

    if format_version != FORMAT_VERSION {
        return Err(DeserializeError::IncompatibleVersion {
            blob: format_version,
            supported: FORMAT_VERSION,
        });
    }

    let payload_start = HEADER_SIZE;
    let payload_end = payload_start + payload_len as usize;
    if bytes.len() < payload_end {
        return Err(DeserializeError::LengthMismatch {
            expected: payload_len,
            actual: bytes.len() - HEADER_SIZE,
        });
    }
    let payload = &bytes[payload_start..payload_end];

    // Integrity check before touching the payload decoder.
    let computed_hash = blake3::hash(payload);
    if computed_hash.as_bytes()[..16] != stored_hash {
        return Err(DeserializeError::ChecksumMismatch);
    }

    let (engine, _): (Engine, usize) =
        bincode::serde::decode_from_slice(payload, bincode::config::standard())?;
    Ok(engine)
}
