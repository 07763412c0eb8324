//! # opdis-ref
//!
//! Typed model of the x86 opcode reference and its XML loader.
//!
//! The reference document describes every opcode encoding as an
//! `entry` carrying mnemonic syntaxes, operand grammars and
//! decode-relevant metadata (processor range, operating-mode
//! validity, flag effects, bit-field encodings). This crate loads
//! such a document into an immutable, arena-backed [`Reference`]
//! catalog that decoders share for the lifetime of the process.
//!
//! # Example
//!
//! ```ignore
//! use opdis_ref::load_reference_str;
//!
//! let xml = std::fs::read_to_string("x86reference.xml")?;
//! let reference = load_reference_str(&xml)?;
//! for (_, entry) in reference.entries() {
//!     println!("{:02x?}", entry.bytes);
//! }
//! ```

pub mod catalog;
pub mod entry;
pub mod error;
pub mod flags;
pub mod hex;
pub mod loader;
pub mod operand;

pub use catalog::{EntryId, OperandId, Reference, SyntaxId};
pub use entry::{
    Attr, BitField, Documentation, Entry, EntryGroup, InstructionExtension, Mode, ModConstraint,
    Note, ProcessorCode, Ring, Syntax,
};
pub use error::ReferenceError;
pub use flags::{EnumBits, EnumSet, Flag, FlagSet, FpuFlag};
pub use loader::{load_reference, load_reference_str};
pub use operand::{AddressingMethod, Operand, OperandGroup, OperandType, RegisterNumber};
