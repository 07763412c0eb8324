//! Operand slots and their closed vocabularies.
//!
//! The addressing-method and operand-type codes are the Intel SDM
//! Volume 2 appendix vocabulary as carried by the reference document;
//! the glossary text for each code is surfaced through `note()`.

use crate::catalog::SyntaxId;
use crate::error::ReferenceError;

/// Single-letter (or composed) code classifying how an operand is
/// encoded.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum AddressingMethod {
    A,
    BA,
    BB,
    BD,
    C,
    D,
    E,
    ES,
    EST,
    F,
    G,
    H,
    I,
    J,
    M,
    N,
    O,
    P,
    Q,
    R,
    S,
    SC,
    T,
    U,
    V,
    W,
    X,
    Y,
    Z,
    S2,
    S30,
    S33,
}

impl AddressingMethod {
    /// Parses a reference spelling, normalising case.
    pub fn from_code(s: &str) -> Result<Self, ReferenceError> {
        Ok(match s.trim().to_ascii_uppercase().as_str() {
            "A" => Self::A,
            "BA" => Self::BA,
            "BB" => Self::BB,
            "BD" => Self::BD,
            "C" => Self::C,
            "D" => Self::D,
            "E" => Self::E,
            "ES" => Self::ES,
            "EST" => Self::EST,
            "F" => Self::F,
            "G" => Self::G,
            "H" => Self::H,
            "I" => Self::I,
            "J" => Self::J,
            "M" => Self::M,
            "N" => Self::N,
            "O" => Self::O,
            "P" => Self::P,
            "Q" => Self::Q,
            "R" => Self::R,
            "S" => Self::S,
            "SC" => Self::SC,
            "T" => Self::T,
            "U" => Self::U,
            "V" => Self::V,
            "W" => Self::W,
            "X" => Self::X,
            "Y" => Self::Y,
            "Z" => Self::Z,
            "S2" => Self::S2,
            "S30" => Self::S30,
            "S33" => Self::S33,
            _ => return Err(ReferenceError::unknown_enum("addressing method", s)),
        })
    }

    /// The reference spelling of this code.
    pub fn code(self) -> &'static str {
        match self {
            Self::A => "A",
            Self::BA => "BA",
            Self::BB => "BB",
            Self::BD => "BD",
            Self::C => "C",
            Self::D => "D",
            Self::E => "E",
            Self::ES => "ES",
            Self::EST => "EST",
            Self::F => "F",
            Self::G => "G",
            Self::H => "H",
            Self::I => "I",
            Self::J => "J",
            Self::M => "M",
            Self::N => "N",
            Self::O => "O",
            Self::P => "P",
            Self::Q => "Q",
            Self::R => "R",
            Self::S => "S",
            Self::SC => "SC",
            Self::T => "T",
            Self::U => "U",
            Self::V => "V",
            Self::W => "W",
            Self::X => "X",
            Self::Y => "Y",
            Self::Z => "Z",
            Self::S2 => "S2",
            Self::S30 => "S30",
            Self::S33 => "S33",
        }
    }

    /// True for methods whose register selection is embedded in the
    /// opcode byte itself rather than in any operand byte.
    pub fn is_inline(self) -> bool {
        matches!(self, Self::Z | Self::S2 | Self::S30 | Self::S33)
    }

    /// Intel SDM glossary text for this code.
    pub fn note(self) -> &'static str {
        match self {
            Self::A => {
                "Direct address. No ModR/M byte; the operand address is encoded in the \
                 instruction with no base register, index register or scaling factor \
                 (for example, far JMP (EA))."
            }
            Self::BA => "Memory addressed by DS:EAX, or by rAX in 64-bit mode (only 0F01C8 MONITOR).",
            Self::BB => "Memory addressed by DS:eBX+AL, or by rBX+AL in 64-bit mode (only XLAT).",
            Self::BD => {
                "Memory addressed by DS:eDI or by RDI (only 0FF7 MASKMOVQ and 660FF7 \
                 MASKMOVDQU)."
            }
            Self::C => "The reg field of the ModR/M byte selects a control register (only MOV (0F20, 0F22)).",
            Self::D => "The reg field of the ModR/M byte selects a debug register (only MOV (0F21, 0F23)).",
            Self::E => {
                "A ModR/M byte follows the opcode and specifies the operand: either a \
                 general-purpose register or a memory address computed from a segment \
                 register plus base register, index register, scaling factor or \
                 displacement."
            }
            Self::ES => {
                "Implies E. A ModR/M byte follows the opcode and specifies the operand: \
                 either an x87 FPU stack register or a memory address."
            }
            Self::EST => "Implies E. A ModR/M byte follows the opcode and specifies the x87 FPU stack register.",
            Self::F => "rFLAGS register.",
            Self::G => "The reg field of the ModR/M byte selects a general register.",
            Self::H => {
                "The r/m field of the ModR/M byte always selects a general register, \
                 regardless of the mod field (for example, MOV (0F20))."
            }
            Self::I => "Immediate data encoded in subsequent bytes of the instruction.",
            Self::J => {
                "The instruction contains a relative offset to be added to the \
                 instruction pointer (for example, JMP (E9), LOOP)."
            }
            Self::M => {
                "The ModR/M byte may refer only to memory: mod != 11 (BOUND, LEA, CALLF, \
                 JMPF, LES, LDS, LSS, LFS, LGS, CMPXCHG8B, CMPXCHG16B, F20FF0 LDDQU)."
            }
            Self::N => "The R/M field of the ModR/M byte selects a packed-quadword MMX register.",
            Self::O => {
                "No ModR/M byte; the operand offset is coded as a word, doubleword or \
                 quadword (depending on address size) in the instruction (only MOV (A0-A3))."
            }
            Self::P => "The reg field of the ModR/M byte selects a packed-quadword MMX register.",
            Self::Q => {
                "A ModR/M byte follows the opcode and specifies the operand: either an \
                 MMX register or a memory address."
            }
            Self::R => "The mod field of the ModR/M byte may refer only to a general register (only MOV (0F20-0F24, 0F26)).",
            Self::S => "The reg field of the ModR/M byte selects a segment register (only MOV (8C, 8E)).",
            Self::SC => {
                "Stack operand, used by instructions that push or pop the stack (POP, \
                 RET, IRET, LEAVE, PUSH, CALL, INT). No operand type accompanies this \
                 method; the size depends on the other operands."
            }
            Self::T => "The reg field of the ModR/M byte selects a test register (only MOV (0F24, 0F26)).",
            Self::U => "The R/M field of the ModR/M byte selects a 128-bit XMM register.",
            Self::V => "The reg field of the ModR/M byte selects a 128-bit XMM register.",
            Self::W => {
                "A ModR/M byte follows the opcode and specifies the operand: either a \
                 128-bit XMM register or a memory address."
            }
            Self::X => "Memory addressed by DS:eSI or by RSI (only MOVS, CMPS, OUTS and LODS).",
            Self::Y => {
                "Memory addressed by ES:eDI or by RDI (only MOVS, CMPS, INS, STOS and \
                 SCAS). The implicit ES segment cannot be overridden by a segment prefix."
            }
            Self::Z => {
                "No ModR/M byte; the three least-significant bits of the opcode byte \
                 select a general-purpose register."
            }
            Self::S2 => {
                "The two bits at bit index three of the opcode byte select one of the \
                 original four segment registers (for example, PUSH ES)."
            }
            Self::S30 => "The three least-significant bits of the opcode byte select segment register SS, FS or GS.",
            Self::S33 => {
                "The three bits at bit index three of the opcode byte select segment \
                 register FS or GS (for example, PUSH FS)."
            }
        }
    }
}

/// Size/shape code for an operand.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[allow(clippy::upper_case_acronyms)]
pub enum OperandType {
    A,
    B,
    BCD,
    BS,
    BSQ,
    BSS,
    C,
    D,
    DI,
    DQ,
    DQP,
    DR,
    DS,
    E,
    ER,
    P,
    PI,
    PD,
    PS,
    PSQ,
    PT,
    PTP,
    Q,
    QI,
    QP,
    S,
    SD,
    SI,
    SR,
    SS,
    ST,
    STX,
    T,
    V,
    VDS,
    VQ,
    VQP,
    VS,
    W,
    WI,
    VA,
    DQA,
    WA,
    WO,
    WS,
    DA,
    DO,
    QA,
    QS,
}

impl OperandType {
    /// Parses a reference spelling, normalising case.
    pub fn from_code(s: &str) -> Result<Self, ReferenceError> {
        Ok(match s.trim().to_ascii_uppercase().as_str() {
            "A" => Self::A,
            "B" => Self::B,
            "BCD" => Self::BCD,
            "BS" => Self::BS,
            "BSQ" => Self::BSQ,
            "BSS" => Self::BSS,
            "C" => Self::C,
            "D" => Self::D,
            "DI" => Self::DI,
            "DQ" => Self::DQ,
            "DQP" => Self::DQP,
            "DR" => Self::DR,
            "DS" => Self::DS,
            "E" => Self::E,
            "ER" => Self::ER,
            "P" => Self::P,
            "PI" => Self::PI,
            "PD" => Self::PD,
            "PS" => Self::PS,
            "PSQ" => Self::PSQ,
            "PT" => Self::PT,
            "PTP" => Self::PTP,
            "Q" => Self::Q,
            "QI" => Self::QI,
            "QP" => Self::QP,
            "S" => Self::S,
            "SD" => Self::SD,
            "SI" => Self::SI,
            "SR" => Self::SR,
            "SS" => Self::SS,
            "ST" => Self::ST,
            "STX" => Self::STX,
            "T" => Self::T,
            "V" => Self::V,
            "VDS" => Self::VDS,
            "VQ" => Self::VQ,
            "VQP" => Self::VQP,
            "VS" => Self::VS,
            "W" => Self::W,
            "WI" => Self::WI,
            "VA" => Self::VA,
            "DQA" => Self::DQA,
            "WA" => Self::WA,
            "WO" => Self::WO,
            "WS" => Self::WS,
            "DA" => Self::DA,
            "DO" => Self::DO,
            "QA" => Self::QA,
            "QS" => Self::QS,
            _ => return Err(ReferenceError::unknown_enum("operand type", s)),
        })
    }

    /// Intel SDM glossary text for this code.
    pub fn note(self) -> &'static str {
        match self {
            Self::A => "Two one-word or two doubleword operands in memory, depending on operand size (only BOUND).",
            Self::B => "Byte, regardless of operand size.",
            Self::BCD => "Packed BCD. Only x87 FPU instructions (for example, FBLD).",
            Self::BS => "Byte, sign-extended to the size of the destination operand.",
            Self::BSQ => "Byte, sign-extended to 64 bits.",
            Self::BSS => "Byte, sign-extended to the size of the stack pointer (for example, PUSH (6A)).",
            Self::C => "Byte or word, depending on operand size.",
            Self::D => "Doubleword, regardless of operand size.",
            Self::DI => "Doubleword integer. Only x87 FPU instructions (for example, FIADD).",
            Self::DQ => "Double-quadword, regardless of operand size (for example, CMPXCHG16B).",
            Self::DQP => "Doubleword, or quadword promoted by REX.W in 64-bit mode (for example, MOVSXD).",
            Self::DR => "Double-real. Only x87 FPU instructions (for example, FADD).",
            Self::DS => "Doubleword, sign-extended to 64 bits (for example, CALL (E8)).",
            Self::E => "x87 FPU environment (for example, FSTENV).",
            Self::ER => "Extended-real. Only x87 FPU instructions (for example, FLD).",
            Self::P => "32-bit or 48-bit pointer, depending on operand size (for example, CALLF (9A)).",
            Self::PI => "Quadword MMX data.",
            Self::PD => "128-bit packed double-precision floating-point data.",
            Self::PS => "128-bit packed single-precision floating-point data.",
            Self::PSQ => "64-bit packed single-precision floating-point data.",
            Self::PT => "80-bit far pointer.",
            Self::PTP => {
                "32-bit or 48-bit pointer, depending on operand size, or 80-bit far \
                 pointer promoted by REX.W in 64-bit mode (for example, CALLF (FF /3))."
            }
            Self::Q => "Quadword, regardless of operand size (for example, CALL (FF /2)).",
            Self::QI => "Quadword integer. Only x87 FPU instructions (for example, FILD).",
            Self::QP => "Quadword, promoted by REX.W (for example, IRETQ).",
            Self::S => "6-byte pseudo-descriptor, or 10-byte pseudo-descriptor in 64-bit mode (for example, SGDT).",
            Self::SD => "Scalar element of 128-bit packed double-precision floating data.",
            Self::SI => "Doubleword integer register (for example, eax).",
            Self::SR => "Single-real. Only x87 FPU instructions (for example, FADD).",
            Self::SS => "Scalar element of 128-bit packed single-precision floating data.",
            Self::ST => "x87 FPU state (for example, FSAVE).",
            Self::STX => "x87 FPU and SIMD state (FXSAVE and FXRSTOR).",
            Self::T => "10-byte far pointer.",
            Self::V => "Word or doubleword, depending on operand size (for example, INC (40), PUSH (50)).",
            Self::VDS => {
                "Word or doubleword, depending on operand size, or doubleword \
                 sign-extended to 64 bits for 64-bit operand size."
            }
            Self::VQ => "Quadword (default) or word if the operand-size prefix is used (for example, PUSH (50)).",
            Self::VQP => {
                "Word or doubleword, depending on operand size, or quadword promoted by \
                 REX.W in 64-bit mode."
            }
            Self::VS => "Word or doubleword sign-extended to the size of the stack pointer (for example, PUSH (68)).",
            Self::W => "Word, regardless of operand size (for example, ENTER).",
            Self::WI => "Word integer. Only x87 FPU instructions (for example, FIADD).",
            Self::VA => "Word or doubleword, according to address size (only REP and LOOP families).",
            Self::DQA => "Doubleword or quadword, according to address size (only REP and LOOP families).",
            Self::WA => "Word, according to address size (only JCXZ).",
            Self::WO => "Word, according to current operand size (for example, MOVSW).",
            Self::WS => "Word, according to current stack size (only PUSHF and POPF in 64-bit mode).",
            Self::DA => "Doubleword, according to address size (only JECXZ).",
            Self::DO => "Doubleword, according to current operand size (for example, MOVSD).",
            Self::QA => "Quadword, according to address size (only JRCXZ).",
            Self::QS => "Quadword, according to current stack size (only PUSHFQ and POPFQ).",
        }
    }
}

/// A fixed register referenced by an operand, identified the way the
/// reference spells it. The large values are MSR indices.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum RegisterNumber {
    R0,
    R1,
    R2,
    R3,
    R4,
    R5,
    R6,
    R7,
    R8,
    R9,
    R10,
    R11,
    R12,
    R13,
    R14,
    R15,
    R8B,
    R174,
    R175,
    R176,
    RC0000081,
    RC0000082,
    RC0000084,
    RC0000102,
    RC0000103,
}

impl RegisterNumber {
    /// Parses a reference spelling.
    pub fn from_code(s: &str) -> Result<Self, ReferenceError> {
        Ok(match s.trim().to_ascii_uppercase().as_str() {
            "0" => Self::R0,
            "1" => Self::R1,
            "2" => Self::R2,
            "3" => Self::R3,
            "4" => Self::R4,
            "5" => Self::R5,
            "6" => Self::R6,
            "7" => Self::R7,
            "8" => Self::R8,
            "9" => Self::R9,
            "10" => Self::R10,
            "11" => Self::R11,
            "12" => Self::R12,
            "13" => Self::R13,
            "14" => Self::R14,
            "15" => Self::R15,
            "8B" => Self::R8B,
            "174" => Self::R174,
            "175" => Self::R175,
            "176" => Self::R176,
            "C0000081" => Self::RC0000081,
            "C0000082" => Self::RC0000082,
            "C0000084" => Self::RC0000084,
            "C0000102" => Self::RC0000102,
            "C0000103" => Self::RC0000103,
            _ => return Err(ReferenceError::unknown_enum("register number", s)),
        })
    }
}

/// Register file an operand draws from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[allow(clippy::upper_case_acronyms)]
pub enum OperandGroup {
    GEN,
    MMX,
    XMM,
    SEG,
    X87FPU,
    CTRL,
    SYSTABP,
    MSR,
    DEBUG,
    XCR,
}

impl OperandGroup {
    /// Parses a reference spelling, normalising case.
    pub fn from_code(s: &str) -> Result<Self, ReferenceError> {
        Ok(match s.trim().to_ascii_uppercase().as_str() {
            "GEN" => Self::GEN,
            "MMX" => Self::MMX,
            "XMM" => Self::XMM,
            "SEG" => Self::SEG,
            "X87FPU" => Self::X87FPU,
            "CTRL" => Self::CTRL,
            "SYSTABP" => Self::SYSTABP,
            "MSR" => Self::MSR,
            "DEBUG" => Self::DEBUG,
            "XCR" => Self::XCR,
            _ => return Err(ReferenceError::unknown_enum("operand group", s)),
        })
    }
}

/// One operand slot of a syntax.
#[derive(Debug, Clone)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Operand {
    /// Literal operand text, e.g. an explicit register name.
    pub text: Option<String>,
    /// Fixed register index, when the operand names one.
    pub register_number: Option<RegisterNumber>,
    /// Register file of the operand.
    pub group: Option<OperandGroup>,
    /// Size/shape code.
    pub ty: Option<OperandType>,
    /// Addressing method.
    pub address: Option<AddressingMethod>,
    /// The instruction does not depend on this operand's prior value.
    pub no_depend: bool,
    /// Conventionally omitted from rendered disassembly.
    pub no_displayed: bool,
    /// Owning syntax.
    pub syntax: SyntaxId,
}
