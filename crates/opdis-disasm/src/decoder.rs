//! Reference-driven instruction decoder.
//!
//! The decoder walks the opcode trie over a byte stream, consumes
//! prefix entries until a primary entry is selected, then resolves
//! ModR/M, SIB, displacement and immediate bytes from the selected
//! entry's canonical syntax. Decoders are cheap per-stream values;
//! the catalog and trie they borrow are immutable and shared.

use opdis_ref::{AddressingMethod, EntryId, Mode, OperandType, Reference};

use crate::cursor::ByteCursor;
use crate::error::DecodeError;
use crate::trie::ByteTrie;

/// Architectural maximum encoded instruction length in bytes.
pub const MAX_INSTRUCTION_LEN: usize = 15;

/// A sized little-endian value read from the instruction stream,
/// sign-extended to 64 bits.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Immediate {
    /// Encoded length in bytes.
    pub length: u8,
    /// Sign-extended value.
    pub value: i64,
}

/// A prefix consumed ahead of the primary opcode.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Prefix {
    /// The prefix entry.
    pub entry: EntryId,
    /// The raw prefix byte.
    pub byte: u8,
}

/// One decoded instruction.
#[derive(Debug, Clone)]
pub struct Instruction {
    /// Prefix entries, in stream order.
    pub prefixes: Vec<Prefix>,
    /// REX prefix (0x40-0x4F), captured separately in 64-bit mode.
    pub rex_prefix: Option<Prefix>,
    /// The selected primary entry.
    pub entry: EntryId,
    /// Raw ModR/M byte, when the operand vector implies one.
    pub modrm: Option<u8>,
    /// Raw SIB byte, when ModR/M selects an indexed memory form.
    pub sib: Option<u8>,
    /// Memory displacement, when present.
    pub displacement: Option<Immediate>,
    /// First immediate operand value, when present.
    pub immediate: Option<Immediate>,
    /// Total encoded length, prefixes included. Never exceeds
    /// [`MAX_INSTRUCTION_LEN`].
    pub length: usize,
}

impl Instruction {
    /// Mnemonic of the entry's canonical syntax.
    pub fn mnemonic<'r>(&self, reference: &'r Reference) -> Option<&'r str> {
        reference
            .canonical_syntax(self.entry)
            .map(|s| s.mnemonic.as_str())
    }
}

/// Operand-size context accumulated from the consumed prefixes.
struct SizeContext {
    operand_size: bool,
    address_size: bool,
    rex_w: bool,
    mode: Mode,
}

impl SizeContext {
    /// True when the effective operand size is 16 bits.
    fn op16(&self) -> bool {
        match self.mode {
            Mode::R | Mode::S => !self.operand_size,
            _ => self.operand_size,
        }
    }

    /// Width in bytes of a direct memory offset (moffs) operand.
    fn moffs_width(&self) -> usize {
        match self.mode {
            Mode::E => {
                if self.address_size {
                    4
                } else {
                    8
                }
            }
            Mode::R | Mode::S => {
                if self.address_size {
                    4
                } else {
                    2
                }
            }
            Mode::P => {
                if self.address_size {
                    2
                } else {
                    4
                }
            }
        }
    }
}

/// Decoder over a fixed catalog, trie and operating mode.
#[derive(Clone, Copy)]
pub struct Decoder<'a> {
    reference: &'a Reference,
    trie: &'a ByteTrie<EntryId>,
    mode: Mode,
}

impl<'a> Decoder<'a> {
    /// Creates a decoder for the given catalog and operating mode.
    pub fn new(reference: &'a Reference, trie: &'a ByteTrie<EntryId>, mode: Mode) -> Self {
        Self {
            reference,
            trie,
            mode,
        }
    }

    /// The operating mode this decoder selects entries for.
    pub fn mode(&self) -> Mode {
        self.mode
    }

    /// Decodes a single instruction from a buffer of at most
    /// [`MAX_INSTRUCTION_LEN`] bytes.
    pub fn decode_one(&self, buf: &[u8]) -> Result<Instruction, DecodeError> {
        if buf.len() > MAX_INSTRUCTION_LEN {
            return Err(DecodeError::BufferOverflow {
                len: buf.len(),
                max: MAX_INSTRUCTION_LEN,
            });
        }
        self.decode_window(buf, 0)
    }

    /// Iterates instructions over a byte stream of any length. Each
    /// instruction decodes from a window of at most
    /// [`MAX_INSTRUCTION_LEN`] bytes, so the architectural limit
    /// binds every emitted instruction. The iterator yields a single
    /// error and then stops; resynchronisation is the caller's
    /// choice.
    pub fn decode<'b>(&self, buf: &'b [u8]) -> Decode<'a, 'b> {
        Decode {
            decoder: *self,
            cursor: ByteCursor::new(buf),
            failed: false,
        }
    }

    /// Decodes one instruction from a window whose start lies at
    /// `base` in the overall stream.
    fn decode_window(&self, window: &[u8], base: usize) -> Result<Instruction, DecodeError> {
        let mut cursor = ByteCursor::new(window);
        let mut prefixes = Vec::new();
        let mut rex_prefix = None;

        loop {
            if cursor.is_empty() {
                return Err(DecodeError::truncated(
                    base + cursor.position(),
                    cursor.position() + 1,
                    window.len(),
                ));
            }

            let rest = cursor.remaining();
            let entry_id = self.select_entry(rest, base + cursor.position())?;
            let entry = self.reference.entry(entry_id);

            if entry.is_prefix() {
                let byte = rest[0];
                let prefix = Prefix {
                    entry: entry_id,
                    byte,
                };
                if self.mode == Mode::E && (0x40..=0x4F).contains(&byte) {
                    rex_prefix = Some(prefix);
                } else {
                    prefixes.push(prefix);
                }
                cursor.advance(entry.opcode_len());
                continue;
            }

            return self.resolve_operands(entry_id, cursor, prefixes, rex_prefix, base);
        }
    }

    /// Selects a single entry for the bytes at hand.
    ///
    /// Filters, in order: validity in the operating mode, exact-mode
    /// preference (a 64-bit-only form beats a generally valid one in
    /// 64-bit mode), deepest trie match (a longer key means a
    /// mandatory prefix or secondary byte was consumed), ModR/M
    /// discrimination (opcode extension in reg, mod-field
    /// constraints), and a preference for specific sub-case entries.
    fn select_entry(&self, rest: &[u8], offset: usize) -> Result<EntryId, DecodeError> {
        // A walk can surface the same entry more than once; candidates
        // are distinct entries, each kept at its deepest match.
        let mut pool: Vec<(usize, EntryId)> = Vec::new();
        for found in self.trie.matches(rest) {
            let (depth, id) = (found.depth, *found.value);
            match pool.iter_mut().find(|(_, seen)| *seen == id) {
                Some(slot) => slot.0 = slot.0.max(depth),
                None => pool.push((depth, id)),
            }
        }

        if pool.is_empty() {
            return Err(DecodeError::unknown_opcode(
                offset,
                &rest[..rest.len().min(4)],
            ));
        }
        if pool.len() == 1 {
            return Ok(pool[0].1);
        }

        let valid: Vec<_> = pool
            .iter()
            .copied()
            .filter(|&(_, id)| self.reference.entry(id).mode.is_valid_in(self.mode))
            .collect();
        if !valid.is_empty() {
            pool = valid;
        }
        let exact: Vec<_> = pool
            .iter()
            .copied()
            .filter(|&(_, id)| self.reference.entry(id).mode == self.mode)
            .collect();
        if !exact.is_empty() {
            pool = exact;
        }
        if pool.len() == 1 {
            return Ok(pool[0].1);
        }

        let deepest = pool.iter().map(|&(depth, _)| depth).max().unwrap_or(0);
        pool.retain(|&(depth, _)| depth == deepest);
        if pool.len() == 1 {
            return Ok(pool[0].1);
        }

        let modrm = rest.get(deepest).copied();
        pool.retain(|&(_, id)| self.entry_admits_modrm(id, modrm));
        if pool.len() > 1 && pool.iter().any(|&(_, id)| self.reference.entry(id).particular) {
            pool.retain(|&(_, id)| self.reference.entry(id).particular);
        }

        match pool.len() {
            0 => Err(DecodeError::unknown_opcode(
                offset,
                &rest[..rest.len().min(4)],
            )),
            1 => Ok(pool[0].1),
            candidates => Err(DecodeError::Ambiguous { offset, candidates }),
        }
    }

    /// Checks an entry's ModR/M-borne constraints against the byte
    /// that would be its ModR/M. Entries without such constraints
    /// always pass.
    fn entry_admits_modrm(&self, id: EntryId, modrm: Option<u8>) -> bool {
        use opdis_ref::ModConstraint;

        let entry = self.reference.entry(id);
        let constrained = entry.opcode_extension.is_some()
            || entry.mod_constraint.is_some()
            || entry.modrm_register;
        if !constrained {
            return true;
        }
        let Some(byte) = modrm else {
            return false;
        };

        if let Some(extension) = entry.opcode_extension {
            if (byte >> 3) & 0x07 != extension {
                return false;
            }
        }
        let register_form = byte >> 6 == 0b11;
        match entry.mod_constraint {
            Some(ModConstraint::NoMem) if !register_form => return false,
            Some(ModConstraint::Mem) if register_form => return false,
            _ => {}
        }
        if entry.modrm_register && !register_form {
            return false;
        }
        true
    }

    /// Reads ModR/M, SIB, displacement and immediates for the
    /// selected entry and emits the instruction.
    fn resolve_operands(
        &self,
        entry_id: EntryId,
        mut cursor: ByteCursor<'_>,
        prefixes: Vec<Prefix>,
        rex_prefix: Option<Prefix>,
        base: usize,
    ) -> Result<Instruction, DecodeError> {
        let entry = self.reference.entry(entry_id);
        cursor.advance(entry.opcode_len());

        let ctx = SizeContext {
            operand_size: prefixes.iter().any(|p| p.byte == 0x66),
            address_size: prefixes.iter().any(|p| p.byte == 0x67),
            rex_w: rex_prefix.map_or(false, |p| p.byte & 0x08 != 0),
            mode: self.mode,
        };

        let mut modrm = None;
        let mut sib = None;
        let mut displacement = None;
        let mut immediate: Option<Immediate> = None;

        if let Some(syntax) = self.reference.canonical_syntax(entry_id) {
            let needs_modrm = self
                .reference
                .syntax_operands(syntax)
                .any(|op| op.address.map_or(false, uses_modrm));
            if needs_modrm {
                let byte = next_byte(&mut cursor, base)?;
                modrm = Some(byte);
                (sib, displacement) = self.read_memory_suffix(byte, &mut cursor, &ctx, base)?;
            }

            for operand in self.reference.syntax_operands(syntax) {
                let Some(method) = operand.address else {
                    continue;
                };
                let width = match method {
                    AddressingMethod::I | AddressingMethod::J | AddressingMethod::A => {
                        Some(immediate_width(operand.ty, &ctx).map_err(|reason| {
                            DecodeError::unsupported(base + cursor.position(), reason)
                        })?)
                    }
                    AddressingMethod::O => Some(ctx.moffs_width()),
                    _ => None,
                };
                if let Some(width) = width {
                    let value = read_value(&mut cursor, width, base)?;
                    if immediate.is_none() {
                        immediate = Some(value);
                    }
                }
            }
        }

        Ok(Instruction {
            prefixes,
            rex_prefix,
            entry: entry_id,
            modrm,
            sib,
            displacement,
            immediate,
            length: cursor.position(),
        })
    }

    /// Reads the SIB byte and displacement implied by a memory-form
    /// ModR/M byte.
    fn read_memory_suffix(
        &self,
        modrm: u8,
        cursor: &mut ByteCursor<'_>,
        ctx: &SizeContext,
        base: usize,
    ) -> Result<(Option<u8>, Option<Immediate>), DecodeError> {
        let mod_field = modrm >> 6;
        let rm = modrm & 0x07;
        if mod_field == 0b11 {
            return Ok((None, None));
        }

        // Real mode without an address-size override uses the 16-bit
        // form: no SIB, disp16 where the 32-bit form has disp32.
        if matches!(ctx.mode, Mode::R | Mode::S) && !ctx.address_size {
            let disp_len = match (mod_field, rm) {
                (0b00, 0b110) => 2,
                (0b01, _) => 1,
                (0b10, _) => 2,
                _ => 0,
            };
            let displacement = if disp_len > 0 {
                Some(read_value(cursor, disp_len, base)?)
            } else {
                None
            };
            return Ok((None, displacement));
        }

        let mut sib = None;
        let mut disp_len = match mod_field {
            0b01 => 1,
            0b10 => 4,
            _ => 0,
        };
        if rm == 0b100 {
            let byte = next_byte(cursor, base)?;
            // No base register: disp32 follows the SIB byte.
            if mod_field == 0b00 && byte & 0x07 == 0b101 {
                disp_len = 4;
            }
            sib = Some(byte);
        } else if mod_field == 0b00 && rm == 0b101 {
            // disp32; RIP-relative in 64-bit mode.
            disp_len = 4;
        }

        let displacement = if disp_len > 0 {
            Some(read_value(cursor, disp_len, base)?)
        } else {
            None
        };
        Ok((sib, displacement))
    }
}

/// Streaming iterator produced by [`Decoder::decode`].
pub struct Decode<'a, 'b> {
    decoder: Decoder<'a>,
    cursor: ByteCursor<'b>,
    failed: bool,
}

impl Iterator for Decode<'_, '_> {
    type Item = Result<Instruction, DecodeError>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.failed || self.cursor.is_empty() {
            return None;
        }
        let window = self.cursor.peek_slice(MAX_INSTRUCTION_LEN);
        match self.decoder.decode_window(window, self.cursor.position()) {
            Ok(instruction) => {
                self.cursor.advance(instruction.length);
                Some(Ok(instruction))
            }
            Err(error) => {
                self.failed = true;
                Some(Err(error))
            }
        }
    }
}

/// True for addressing methods encoded through a ModR/M byte.
fn uses_modrm(method: AddressingMethod) -> bool {
    use AddressingMethod::*;
    matches!(
        method,
        C | D | E | ES | EST | G | H | M | N | P | Q | R | S | T | U | V | W
    )
}

/// Width in bytes of an immediate with the given operand type.
fn immediate_width(ty: Option<OperandType>, ctx: &SizeContext) -> Result<usize, String> {
    use OperandType::*;

    let Some(ty) = ty else {
        return Err("immediate operand without a type".to_string());
    };
    Ok(match ty {
        B | BS | BSS | BSQ => 1,
        W | WI | WO | WA | WS => 2,
        C => {
            if ctx.op16() {
                1
            } else {
                2
            }
        }
        D | DI | DS | DA | DO | SI => 4,
        Q | QI | QP | QA | QS => 8,
        V | VS | VDS => {
            if ctx.op16() {
                2
            } else {
                4
            }
        }
        VQ => {
            if ctx.op16() {
                2
            } else {
                8
            }
        }
        VQP => {
            if ctx.rex_w {
                8
            } else if ctx.op16() {
                2
            } else {
                4
            }
        }
        DQP => {
            if ctx.rex_w {
                8
            } else {
                4
            }
        }
        P => {
            if ctx.op16() {
                4
            } else {
                6
            }
        }
        other => return Err(format!("cannot size {other:?} immediate")),
    })
}

/// Reads one byte, or reports where the stream ran dry.
fn next_byte(cursor: &mut ByteCursor<'_>, base: usize) -> Result<u8, DecodeError> {
    let byte = cursor
        .peek(0)
        .ok_or_else(|| DecodeError::truncated(base + cursor.position(), 1, 0))?;
    cursor.advance(1);
    Ok(byte)
}

/// Reads a little-endian value of the given width, sign-extending it
/// to 64 bits.
fn read_value(
    cursor: &mut ByteCursor<'_>,
    width: usize,
    base: usize,
) -> Result<Immediate, DecodeError> {
    let bytes = cursor.peek_slice(width);
    if bytes.len() < width {
        return Err(DecodeError::truncated(
            base + cursor.position(),
            width,
            bytes.len(),
        ));
    }
    let mut value = 0i64;
    for (i, &byte) in bytes.iter().enumerate() {
        value |= (byte as i64) << (8 * i);
    }
    if width < 8 {
        let shift = 64 - 8 * width as u32;
        value = value << shift >> shift;
    }
    cursor.advance(width);
    Ok(Immediate {
        length: width as u8,
        value,
    })
}
