//! Opcode entries, mnemonic syntaxes and their classification
//! vocabulary.

use crate::catalog::{EntryId, OperandId, SyntaxId};
use crate::error::ReferenceError;
use crate::flags::{EnumBits, EnumSet, Flag, FlagSet, FpuFlag};

/// Semantic classification tag for an entry.
///
/// Tags come in tiers: 0 marks a broad category, 1 a subcategory and
/// 2 a leaf refinement.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum EntryGroup {
    Prefix,
    Segreg,
    Branch,
    Cond,
    X87Fpu,
    Control,
    Obsol,
    Gen,
    Datamov,
    Stack,
    Conver,
    Arith,
    Binary,
    Decimal,
    Logical,
    Shftrot,
    Bit,
    Break,
    String,
    Inout,
    Flgctrl,
    System,
    Trans,
    Compar,
    Ldconst,
    Conv,
    Sm,
    Shift,
    Unpack,
    Simdfp,
    Shunpck,
    Simdint,
    Mxcsrsm,
    Cachect,
    Fetch,
    Order,
    Pcksclr,
    Pcksp,
    Sync,
    Strtxt,
}

impl EntryGroup {
    /// Parses a reference spelling, normalising case.
    pub fn from_code(s: &str) -> Result<Self, ReferenceError> {
        Ok(match s.trim().to_ascii_uppercase().as_str() {
            "PREFIX" => Self::Prefix,
            "SEGREG" => Self::Segreg,
            "BRANCH" => Self::Branch,
            "COND" => Self::Cond,
            "X87FPU" => Self::X87Fpu,
            "CONTROL" => Self::Control,
            "OBSOL" => Self::Obsol,
            "GEN" => Self::Gen,
            "DATAMOV" => Self::Datamov,
            "STACK" => Self::Stack,
            "CONVER" => Self::Conver,
            "ARITH" => Self::Arith,
            "BINARY" => Self::Binary,
            "DECIMAL" => Self::Decimal,
            "LOGICAL" => Self::Logical,
            "SHFTROT" => Self::Shftrot,
            "BIT" => Self::Bit,
            "BREAK" => Self::Break,
            "STRING" => Self::String,
            "INOUT" => Self::Inout,
            "FLGCTRL" => Self::Flgctrl,
            "SYSTEM" => Self::System,
            "TRANS" => Self::Trans,
            "COMPAR" => Self::Compar,
            "LDCONST" => Self::Ldconst,
            "CONV" => Self::Conv,
            "SM" => Self::Sm,
            "SHIFT" => Self::Shift,
            "UNPACK" => Self::Unpack,
            "SIMDFP" => Self::Simdfp,
            "SHUNPCK" => Self::Shunpck,
            "SIMDINT" => Self::Simdint,
            "MXCSRSM" => Self::Mxcsrsm,
            "CACHECT" => Self::Cachect,
            "FETCH" => Self::Fetch,
            "ORDER" => Self::Order,
            "PCKSCLR" => Self::Pcksclr,
            "PCKSP" => Self::Pcksp,
            "SYNC" => Self::Sync,
            "STRTXT" => Self::Strtxt,
            _ => return Err(ReferenceError::unknown_enum("entry group", s)),
        })
    }

    /// Classification tier: 0 = broad category, 1 = subcategory,
    /// 2 = leaf.
    pub fn tier(self) -> u8 {
        match self {
            Self::Prefix
            | Self::Obsol
            | Self::Gen
            | Self::System
            | Self::Sm
            | Self::Shift
            | Self::Unpack
            | Self::Simdfp
            | Self::Simdint
            | Self::Mxcsrsm
            | Self::Cachect
            | Self::Fetch
            | Self::Order
            | Self::Pcksclr
            | Self::Pcksp
            | Self::Sync
            | Self::Strtxt => 0,
            Self::Segreg
            | Self::Branch
            | Self::X87Fpu
            | Self::Datamov
            | Self::Stack
            | Self::Conver
            | Self::Arith
            | Self::Logical
            | Self::Shftrot
            | Self::Bit
            | Self::Break
            | Self::String
            | Self::Inout
            | Self::Flgctrl
            | Self::Trans
            | Self::Compar
            | Self::Ldconst
            | Self::Conv
            | Self::Shunpck => 1,
            Self::Cond | Self::Control | Self::Binary | Self::Decimal => 2,
        }
    }
}

impl EnumBits for EntryGroup {
    const ALL: &'static [Self] = &[
        Self::Prefix,
        Self::Segreg,
        Self::Branch,
        Self::Cond,
        Self::X87Fpu,
        Self::Control,
        Self::Obsol,
        Self::Gen,
        Self::Datamov,
        Self::Stack,
        Self::Conver,
        Self::Arith,
        Self::Binary,
        Self::Decimal,
        Self::Logical,
        Self::Shftrot,
        Self::Bit,
        Self::Break,
        Self::String,
        Self::Inout,
        Self::Flgctrl,
        Self::System,
        Self::Trans,
        Self::Compar,
        Self::Ldconst,
        Self::Conv,
        Self::Sm,
        Self::Shift,
        Self::Unpack,
        Self::Simdfp,
        Self::Shunpck,
        Self::Simdint,
        Self::Mxcsrsm,
        Self::Cachect,
        Self::Fetch,
        Self::Order,
        Self::Pcksclr,
        Self::Pcksp,
        Self::Sync,
        Self::Strtxt,
    ];

    fn ordinal(self) -> u32 {
        self as u32
    }
}

/// Processor on which an entry is first or last supported.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum ProcessorCode {
    P8086,
    P80186,
    P80286,
    P80386,
    P80486,
    P1,
    P1Mmx,
    PPro,
    PII,
    PIII,
    P4,
    Core1,
    Core2,
    CoreI7,
    Itanium,
}

impl ProcessorCode {
    /// Numeric code used by the reference (Itanium is the outlier 99).
    pub fn value(self) -> u32 {
        match self {
            Self::P8086 => 0,
            Self::P80186 => 1,
            Self::P80286 => 2,
            Self::P80386 => 3,
            Self::P80486 => 4,
            Self::P1 => 5,
            Self::P1Mmx => 6,
            Self::PPro => 7,
            Self::PII => 8,
            Self::PIII => 9,
            Self::P4 => 10,
            Self::Core1 => 11,
            Self::Core2 => 12,
            Self::CoreI7 => 13,
            Self::Itanium => 99,
        }
    }

    /// Maps a numeric code back to its processor.
    pub fn from_value(value: u32) -> Result<Self, ReferenceError> {
        Ok(match value {
            0 => Self::P8086,
            1 => Self::P80186,
            2 => Self::P80286,
            3 => Self::P80386,
            4 => Self::P80486,
            5 => Self::P1,
            6 => Self::P1Mmx,
            7 => Self::PPro,
            8 => Self::PII,
            9 => Self::PIII,
            10 => Self::P4,
            11 => Self::Core1,
            12 => Self::Core2,
            13 => Self::CoreI7,
            99 => Self::Itanium,
            _ => return Err(ReferenceError::unknown_enum("processor code", value.to_string())),
        })
    }

    /// Parses the decimal spelling used by the reference.
    pub fn from_code(s: &str) -> Result<Self, ReferenceError> {
        let value: u32 = s
            .trim()
            .parse()
            .map_err(|_| ReferenceError::unknown_enum("processor code", s))?;
        Self::from_value(value)
    }
}

/// Instruction-set extension an entry belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[allow(clippy::upper_case_acronyms)]
pub enum InstructionExtension {
    MMX,
    SSE1,
    SSE2,
    SSE3,
    SSSE3,
    SSE41,
    SSE42,
    VMX,
    SMX,
}

impl InstructionExtension {
    /// Parses a reference spelling, normalising case.
    pub fn from_code(s: &str) -> Result<Self, ReferenceError> {
        Ok(match s.trim().to_ascii_uppercase().as_str() {
            "MMX" => Self::MMX,
            "SSE1" => Self::SSE1,
            "SSE2" => Self::SSE2,
            "SSE3" => Self::SSE3,
            "SSSE3" => Self::SSSE3,
            "SSE41" => Self::SSE41,
            "SSE42" => Self::SSE42,
            "VMX" => Self::VMX,
            "SMX" => Self::SMX,
            _ => return Err(ReferenceError::unknown_enum("instruction extension", s)),
        })
    }
}

/// Constraint on the ModR/M mod field. Absence means unconstrained.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum ModConstraint {
    /// ModR/M must encode the register form (mod = 11).
    NoMem,
    /// ModR/M must encode a memory form (mod != 11).
    Mem,
}

impl ModConstraint {
    /// Parses the exact reference spelling (`nomem`/`mem`).
    pub fn from_code(s: &str) -> Result<Self, ReferenceError> {
        Ok(match s {
            "nomem" => Self::NoMem,
            "mem" => Self::Mem,
            _ => return Err(ReferenceError::unknown_enum("mod constraint", s)),
        })
    }
}

/// Behavioural attribute tag.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Attr {
    /// The opcode is invalid.
    Invd,
    /// Behaviour is always undefined (e.g. SALC).
    Undef,
    /// Prefix with no meaning (no operation).
    Null,
    /// Treated as an integer NOP.
    Nop,
    /// Optimised for the accumulator (e.g. 04, 05).
    Acc,
    /// Serialising (CPUID, IRET, RSM, WRMSR, INVD, ...).
    Serial,
    /// Serialising under further conditions (only MOV Cq).
    SerialCond,
    /// Delays interrupt recognition for one instruction (only POP SS).
    DelaysInt,
    /// Same, under further conditions (only STI).
    DelaysIntCond,
}

impl Attr {
    /// Parses a reference spelling, normalising case.
    pub fn from_code(s: &str) -> Result<Self, ReferenceError> {
        Ok(match s.trim().to_ascii_uppercase().as_str() {
            "INVD" => Self::Invd,
            "UNDEF" => Self::Undef,
            "NULL" => Self::Null,
            "NOP" => Self::Nop,
            "ACC" => Self::Acc,
            "SERIAL" => Self::Serial,
            "SERIAL_COND" => Self::SerialCond,
            "DELAYSINT" => Self::DelaysInt,
            "DELAYSINT_COND" => Self::DelaysIntCond,
            _ => return Err(ReferenceError::unknown_enum("attr", s)),
        })
    }
}

/// Privilege level an entry requires.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Ring {
    R0,
    R1,
    R2,
    R3,
    /// Depends on I/O privilege (IOPL-sensitive).
    F,
}

impl Ring {
    /// Parses a reference spelling (`0`-`3` or `f`).
    pub fn from_code(s: &str) -> Result<Self, ReferenceError> {
        Ok(match s {
            "0" => Self::R0,
            "1" => Self::R1,
            "2" => Self::R2,
            "3" => Self::R3,
            "f" => Self::F,
            _ => return Err(ReferenceError::unknown_enum("ring", s)),
        })
    }
}

/// Operating modes in which an entry is a valid encoding.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Mode {
    /// Valid in real, protected and 64-bit mode.
    #[default]
    R,
    /// Valid only in protected and 64-bit mode.
    P,
    /// Valid only in 64-bit mode.
    E,
    /// Valid only in SMM (only RSM).
    S,
}

impl Mode {
    /// Parses a reference spelling, normalising case. Absence of the
    /// attribute maps to the default.
    pub fn from_code(s: &str) -> Result<Self, ReferenceError> {
        Ok(match s.trim().to_ascii_uppercase().as_str() {
            "R" => Self::R,
            "P" => Self::P,
            "E" => Self::E,
            "S" => Self::S,
            _ => return Err(ReferenceError::unknown_enum("mode", s)),
        })
    }

    /// True when an entry marked with this mode is a valid encoding
    /// under the given operating mode. Entries carry the most
    /// permissive mode they are valid in; SMM entries stand alone.
    pub fn is_valid_in(self, operating: Mode) -> bool {
        match operating {
            Mode::R => self == Mode::R,
            Mode::P => matches!(self, Mode::R | Mode::P),
            Mode::E => matches!(self, Mode::R | Mode::P | Mode::E),
            Mode::S => self == Mode::S,
        }
    }

    /// Human-readable validity description.
    pub fn note(self) -> &'static str {
        match self {
            Self::R => "valid in real, protected and 64-bit mode",
            Self::P => "valid only in protected and 64-bit mode",
            Self::E => "valid only in 64-bit mode",
            Self::S => "valid only in SMM",
        }
    }
}

/// How thoroughly an entry is documented.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Documentation {
    /// Fully documented.
    #[default]
    D,
    /// Only marginally documented.
    M,
    /// Undocumented.
    U,
}

impl Documentation {
    /// Parses a reference spelling, normalising case.
    pub fn from_code(s: &str) -> Result<Self, ReferenceError> {
        Ok(match s.trim().to_ascii_uppercase().as_str() {
            "D" => Self::D,
            "M" => Self::M,
            "U" => Self::U,
            _ => return Err(ReferenceError::unknown_enum("documentation", s)),
        })
    }
}

/// Low-order opcode bit fields that vary across an entry's encodings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum BitField {
    /// Bit w (bit index 0, operand size).
    OperandSize,
    /// Bit s (bit index 1, sign-extend).
    SignExtend,
    /// Bit d (bit index 1, direction).
    Direction,
    /// Field tttn (4 bits, bit index 0, condition).
    Condition,
    /// Field MF (2 bits, bit index 1, x87 memory format).
    MemoryFormat,
}

impl EnumBits for BitField {
    const ALL: &'static [Self] = &[
        Self::OperandSize,
        Self::SignExtend,
        Self::Direction,
        Self::Condition,
        Self::MemoryFormat,
    ];

    fn ordinal(self) -> u32 {
        self as u32
    }
}

/// Brief and detailed documentation text attached to an entry.
#[derive(Debug, Clone, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Note {
    pub brief: Option<String>,
    pub detailed: Option<String>,
}

/// A mnemonic and its operand vector for one entry.
#[derive(Debug, Clone)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Syntax {
    /// Mnemonic text.
    pub mnemonic: String,
    /// ModR/M mod constraint specific to this form.
    pub mod_constraint: Option<ModConstraint>,
    /// Source operands, in document order.
    pub src_operands: Vec<OperandId>,
    /// Destination operands, in document order.
    pub dst_operands: Vec<OperandId>,
    /// Owning entry.
    pub entry: EntryId,
}

/// One opcode encoding of the reference.
#[derive(Debug, Clone)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Entry {
    /// Mandatory prefix byte, when the encoding requires one.
    pub prefix_byte: Option<u8>,
    /// Primary opcode byte sequence. Never empty; two-byte forms
    /// start with 0x0F.
    pub bytes: Vec<u8>,
    /// Secondary opcode byte, when present.
    pub secondary_byte: Option<u8>,
    /// Semantic classification tags.
    pub groups: EnumSet<EntryGroup>,
    /// First supporting processor.
    pub processor_start: Option<ProcessorCode>,
    /// Last supporting processor.
    pub processor_end: Option<ProcessorCode>,
    /// Instruction-set extension, if any.
    pub instruction_extension: Option<InstructionExtension>,
    /// Bytes of an aliased encoding.
    pub alias_bytes: Option<Vec<u8>>,
    /// Bytes of a partially aliased encoding. The schema carries no
    /// separate source for this, so it mirrors `alias_bytes`.
    pub partial_alias_bytes: Option<Vec<u8>>,
    /// Mnemonic forms, in document order.
    pub syntaxes: Vec<SyntaxId>,
    /// The encoding accepts a LOCK prefix.
    pub valid_with_lock_prefix: bool,
    /// The encoding is undocumented.
    pub undocumented: bool,
    /// The entry is a specific sub-case of a broader encoding.
    pub particular: bool,
    /// ModR/M must encode the register form.
    pub modrm_register: bool,
    /// Subopcode carried in ModR/M.reg (the /0../7 notation).
    pub opcode_extension: Option<u8>,
    /// Pushes the x87 register stack.
    pub fpush: bool,
    /// Pops the x87 register stack zero, one or two times.
    pub fpop: u8,
    /// Low-order opcode bits that vary across encodings.
    pub bit_fields: EnumSet<BitField>,
    /// Entry-level ModR/M mod constraint.
    pub mod_constraint: Option<ModConstraint>,
    /// Behavioural attribute.
    pub attr: Option<Attr>,
    /// Required privilege level.
    pub ring: Option<Ring>,
    /// Operating-mode validity.
    pub mode: Mode,
    /// Documentation status.
    pub documentation: Documentation,
    /// FLAGS/EFLAGS interaction.
    pub flags: FlagSet<Flag>,
    /// The defined/undefined subsets carry a conditional qualifier.
    pub conditionally_modifies_flags: bool,
    /// x87 condition-code interaction.
    pub fpu_flags: FlagSet<FpuFlag>,
    /// Attached documentation text.
    pub note: Option<Note>,
}

impl Entry {
    /// Number of bytes in the full encoded opcode, including the
    /// mandatory prefix and secondary byte when present.
    pub fn opcode_len(&self) -> usize {
        self.bytes.len()
            + usize::from(self.prefix_byte.is_some())
            + usize::from(self.secondary_byte.is_some())
    }

    /// The full encoded opcode: `prefix? | bytes | secondary?`.
    pub fn encoding(&self) -> Vec<u8> {
        let mut out = Vec::with_capacity(self.opcode_len());
        if let Some(prefix) = self.prefix_byte {
            out.push(prefix);
        }
        out.extend_from_slice(&self.bytes);
        if let Some(secondary) = self.secondary_byte {
            out.push(secondary);
        }
        out
    }

    /// True for prefix entries (LOCK, REP, segment overrides,
    /// operand/address size, REX).
    pub fn is_prefix(&self) -> bool {
        self.groups.contains(EntryGroup::Prefix)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn group_tiers() {
        assert_eq!(EntryGroup::Gen.tier(), 0);
        assert_eq!(EntryGroup::Arith.tier(), 1);
        assert_eq!(EntryGroup::Binary.tier(), 2);
        assert_eq!(EntryGroup::from_code("datamov").unwrap(), EntryGroup::Datamov);
    }

    #[test]
    fn processor_codes_round_trip() {
        for code in [
            ProcessorCode::P8086,
            ProcessorCode::PPro,
            ProcessorCode::CoreI7,
            ProcessorCode::Itanium,
        ] {
            assert_eq!(ProcessorCode::from_value(code.value()).unwrap(), code);
        }
        assert!(ProcessorCode::from_value(14).is_err());
        assert_eq!(ProcessorCode::from_code("01").unwrap(), ProcessorCode::P80186);
    }

    #[test]
    fn mode_and_documentation_default() {
        assert_eq!(Mode::default(), Mode::R);
        assert_eq!(Documentation::default(), Documentation::D);
        assert_eq!(Mode::from_code("e").unwrap(), Mode::E);
    }

    #[test]
    fn mode_validity_nests() {
        assert!(Mode::R.is_valid_in(Mode::R));
        assert!(Mode::R.is_valid_in(Mode::E));
        assert!(Mode::P.is_valid_in(Mode::E));
        assert!(!Mode::P.is_valid_in(Mode::R));
        assert!(!Mode::E.is_valid_in(Mode::P));
        assert!(Mode::S.is_valid_in(Mode::S));
        assert!(!Mode::S.is_valid_in(Mode::E));
        assert!(!Mode::R.is_valid_in(Mode::S));
    }

    #[test]
    fn mod_constraint_is_exact_lowercase() {
        assert_eq!(ModConstraint::from_code("nomem").unwrap(), ModConstraint::NoMem);
        assert!(ModConstraint::from_code("NOMEM").is_err());
    }

    #[test]
    fn attr_spellings() {
        assert_eq!(Attr::from_code("serial_cond").unwrap(), Attr::SerialCond);
        assert_eq!(Attr::from_code("delaysint").unwrap(), Attr::DelaysInt);
        assert!(Attr::from_code("bogus").is_err());
    }
}
