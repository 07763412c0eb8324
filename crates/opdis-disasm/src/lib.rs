//! # opdis-disasm
//!
//! Reference-driven x86/x86-64 instruction decoder.
//!
//! The decoder core is a 256-ary byte trie keyed by opcode sequences
//! (mandatory prefix, primary and secondary opcode bytes), an
//! entry-selection policy over the loaded reference catalog, and a
//! length/operand resolver that walks a byte stream and yields one
//! structured [`Instruction`] per encoding.
//!
//! # Example
//!
//! ```ignore
//! use opdis_disasm::{build_trie, Decoder};
//! use opdis_ref::{load_reference_str, Mode};
//!
//! let reference = load_reference_str(&xml)?;
//! let trie = build_trie(&reference)?;
//! let decoder = Decoder::new(&reference, &trie, Mode::E);
//! for instruction in decoder.decode(&[0x55, 0x48, 0x89, 0xe5, 0xc3]) {
//!     let instruction = instruction?;
//!     println!("{:?}", instruction.mnemonic(&reference));
//! }
//! ```

pub mod builder;
pub mod cursor;
pub mod decoder;
pub mod error;
pub mod trie;

pub use builder::build_trie;
pub use cursor::ByteCursor;
pub use decoder::{Decode, Decoder, Immediate, Instruction, Prefix, MAX_INSTRUCTION_LEN};
pub use error::{BuildError, DecodeError};
pub use trie::ByteTrie;
