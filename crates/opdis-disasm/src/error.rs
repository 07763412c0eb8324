//! Trie-construction and decoding error types.

use thiserror::Error;

use opdis_ref::hex::hexdump;

/// Error type for building the opcode trie.
#[derive(Error, Debug)]
pub enum BuildError {
    /// An entry with a register-in-opcode operand whose final opcode
    /// byte already has its low three bits set cannot be expanded.
    #[error("register-in-opcode form {bytes} has nonzero low bits in its final opcode byte")]
    RegisterBitsOccupied { bytes: String },
}

impl BuildError {
    /// Creates a new RegisterBitsOccupied error.
    pub fn register_bits_occupied(bytes: &[u8]) -> Self {
        Self::RegisterBitsOccupied {
            bytes: hexdump(bytes),
        }
    }
}

/// Error type for instruction decoding.
#[derive(Error, Debug)]
pub enum DecodeError {
    /// No reference entry matches the bytes at the given offset.
    #[error("unknown encoding at offset {offset}: {bytes}")]
    UnknownOpcode { offset: usize, bytes: String },

    /// More than one entry survived every selection filter.
    #[error("ambiguous encoding at offset {offset}: {candidates} candidates")]
    Ambiguous { offset: usize, candidates: usize },

    /// The input buffer exceeds the architectural 15-byte limit.
    #[error("buffer of {len} bytes exceeds the {max}-byte instruction limit")]
    BufferOverflow { len: usize, max: usize },

    /// The instruction continues past the end of the buffer.
    #[error("truncated instruction at offset {offset}: need {needed} bytes, have {available}")]
    Truncated {
        offset: usize,
        needed: usize,
        available: usize,
    },

    /// An operand shape the resolver cannot size.
    #[error("unsupported operand at offset {offset}: {reason}")]
    Unsupported { offset: usize, reason: String },
}

impl DecodeError {
    /// Creates a new UnknownOpcode error.
    pub fn unknown_opcode(offset: usize, bytes: &[u8]) -> Self {
        Self::UnknownOpcode {
            offset,
            bytes: hexdump(bytes),
        }
    }

    /// Creates a new Truncated error.
    pub fn truncated(offset: usize, needed: usize, available: usize) -> Self {
        Self::Truncated {
            offset,
            needed,
            available,
        }
    }

    /// Creates a new Unsupported error.
    pub fn unsupported(offset: usize, reason: impl Into<String>) -> Self {
        Self::Unsupported {
            offset,
            reason: reason.into(),
        }
    }
}
