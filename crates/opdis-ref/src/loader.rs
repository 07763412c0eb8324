//! Loader from the x86reference XML schema into a [`Reference`]
//! catalog.
//!
//! The loader walks a read-only DOM: top-level `<one-byte>` and
//! `<two-byte>` opcode sets, `<pri_opcd value="HH">` children, and
//! `<entry>` elements beneath them. The `two-byte` subtree is parsed
//! with a leading 0x0F prepended to every entry's byte sequence. Any
//! structural or vocabulary error aborts loading.

use roxmltree::{Document, Node};

use crate::catalog::{EntryId, OperandId, Reference, SyntaxId};
use crate::entry::{
    Attr, BitField, Documentation, Entry, EntryGroup, InstructionExtension, Mode, ModConstraint,
    Note, ProcessorCode, Ring, Syntax,
};
use crate::error::ReferenceError;
use crate::flags::{EnumSet, Flag, FlagSet, FpuFlag};
use crate::hex::{parse_hex_byte, parse_separated_hex_bytes};
use crate::operand::{AddressingMethod, Operand, OperandGroup, OperandType, RegisterNumber};

/// Parses an XML string and loads it as a reference catalog.
pub fn load_reference_str(xml: &str) -> Result<Reference, ReferenceError> {
    let doc = Document::parse(xml)?;
    load_reference(&doc)
}

/// Loads a parsed reference document into a catalog.
pub fn load_reference(doc: &Document) -> Result<Reference, ReferenceError> {
    let mut loader = Loader {
        catalog: Reference::default(),
    };
    loader.parse_root(doc.root_element())?;
    Ok(loader.catalog)
}

fn child_elements<'a, 'i>(node: Node<'a, 'i>) -> impl Iterator<Item = Node<'a, 'i>> {
    node.children().filter(|n| n.is_element())
}

/// Returns the unique child element with the given tag, or an error
/// if it appears more than once.
fn one_element<'a, 'i>(
    node: Node<'a, 'i>,
    tag: &'static str,
) -> Result<Option<Node<'a, 'i>>, ReferenceError> {
    let mut found = None;
    for child in child_elements(node).filter(|n| n.has_tag_name(tag)) {
        if found.is_some() {
            return Err(ReferenceError::DuplicateElement(tag));
        }
        found = Some(child);
    }
    Ok(found)
}

/// Text content of the unique child element with the given tag.
fn one_text<'a>(node: Node<'a, '_>, tag: &'static str) -> Result<Option<&'a str>, ReferenceError> {
    Ok(one_element(node, tag)?.and_then(|n| n.text()))
}

/// Parses an integer attribute in the given radix; absence is `None`.
fn int_attr(
    node: Node<'_, '_>,
    name: &'static str,
    radix: u32,
) -> Result<Option<u8>, ReferenceError> {
    match node.attribute(name) {
        Some(s) => u8::from_str_radix(s.trim(), radix)
            .map(Some)
            .map_err(|_| ReferenceError::invalid_value(name, s)),
        None => Ok(None),
    }
}

fn yes_attr(node: Node<'_, '_>, name: &str) -> bool {
    node.attribute(name) == Some("yes")
}

struct Loader {
    catalog: Reference,
}

impl Loader {
    fn parse_root(&mut self, root: Node<'_, '_>) -> Result<(), ReferenceError> {
        for child in child_elements(root) {
            match child.tag_name().name() {
                "one-byte" => self.parse_opcode_set(child, &[])?,
                "two-byte" => self.parse_opcode_set(child, &[0x0F])?,
                _ => {}
            }
        }
        Ok(())
    }

    fn parse_opcode_set(&mut self, set: Node<'_, '_>, base: &[u8]) -> Result<(), ReferenceError> {
        for opcd in child_elements(set).filter(|n| n.has_tag_name("pri_opcd")) {
            let value = opcd
                .attribute("value")
                .ok_or(ReferenceError::MissingAttribute("value"))?;
            let mut bytes = base.to_vec();
            bytes.push(parse_hex_byte(value)?);
            for entry in child_elements(opcd).filter(|n| n.has_tag_name("entry")) {
                self.parse_entry(entry, &bytes)?;
            }
        }
        Ok(())
    }

    fn parse_entry(&mut self, ele: Node<'_, '_>, bytes: &[u8]) -> Result<(), ReferenceError> {
        let entry_id = EntryId::new(self.catalog.entry_count());

        let mut syntaxes = Vec::new();
        for child in child_elements(ele).filter(|n| n.has_tag_name("syntax")) {
            if let Some(id) = self.parse_syntax(child, entry_id)? {
                syntaxes.push(id);
            }
        }

        let mut groups = EnumSet::new();
        for tag in ["grp1", "grp2", "grp3"] {
            for child in child_elements(ele).filter(|n| n.has_tag_name(tag)) {
                groups.insert(EntryGroup::from_code(child.text().unwrap_or(""))?);
            }
        }

        let prefix_byte = match one_text(ele, "pref")? {
            Some(s) if !s.is_empty() => Some(parse_hex_byte(s)?),
            _ => None,
        };
        let secondary_byte = match one_text(ele, "sec_opcd")? {
            Some(s) if !s.is_empty() => Some(parse_hex_byte(s)?),
            _ => None,
        };

        let processor_start = one_text(ele, "proc_start")?
            .map(ProcessorCode::from_code)
            .transpose()?;
        let processor_end = one_text(ele, "proc_end")?
            .map(ProcessorCode::from_code)
            .transpose()?;
        if let (Some(start), Some(end)) = (processor_start, processor_end) {
            if start.value() > end.value() {
                return Err(ReferenceError::ProcessorRange {
                    start: start.value(),
                    end: end.value(),
                });
            }
        }

        let instruction_extension = one_text(ele, "instr_ext")?
            .map(InstructionExtension::from_code)
            .transpose()?;

        // The schema has a single alias attribute; the partial alias
        // has no source of its own.
        let alias_bytes = ele
            .attribute("alias")
            .map(|s| parse_separated_hex_bytes(s, '_'))
            .transpose()?;
        let partial_alias_bytes = alias_bytes.clone();

        let mut bit_fields = EnumSet::new();
        if int_attr(ele, "direction", 10)?.is_some() {
            bit_fields.insert(BitField::Direction);
        }
        if int_attr(ele, "sign-ext", 10)?.is_some() {
            bit_fields.insert(BitField::SignExtend);
        }
        if int_attr(ele, "op_size", 10)?.is_some() {
            bit_fields.insert(BitField::OperandSize);
        }
        if int_attr(ele, "tttn", 2)?.is_some() {
            bit_fields.insert(BitField::Condition);
        }
        if int_attr(ele, "mem_format", 2)?.is_some() {
            bit_fields.insert(BitField::MemoryFormat);
        }

        let opcode_extension = one_text(ele, "opcd_ext")?
            .map(|s| {
                u8::from_str_radix(s.trim(), 16)
                    .map_err(|_| ReferenceError::invalid_value("opcd_ext", s))
            })
            .transpose()?;

        let fpush = yes_attr(ele, "fpush");
        let fpop = match ele.attribute("fpop") {
            Some("once") => 1,
            Some("twice") => 2,
            _ => 0,
        };

        let mod_constraint = ele
            .attribute("mod")
            .map(ModConstraint::from_code)
            .transpose()?;
        let attr = ele.attribute("attr").map(Attr::from_code).transpose()?;
        let ring = ele.attribute("ring").map(Ring::from_code).transpose()?;
        let mode = ele
            .attribute("mode")
            .map(Mode::from_code)
            .transpose()?
            .unwrap_or_default();
        let documentation = ele
            .attribute("documentation")
            .map(Documentation::from_code)
            .transpose()?
            .unwrap_or_default();

        let note = one_element(ele, "note")?
            .map(|n| self.parse_note(n))
            .transpose()?;

        let (flags, conditionally_modifies_flags) = self.parse_flags(ele)?;
        let fpu_flags = self.parse_fpu_flags(ele)?;

        let pushed = self.catalog.push_entry(Entry {
            prefix_byte,
            bytes: bytes.to_vec(),
            secondary_byte,
            groups,
            processor_start,
            processor_end,
            instruction_extension,
            alias_bytes,
            partial_alias_bytes,
            syntaxes,
            valid_with_lock_prefix: yes_attr(ele, "lock"),
            undocumented: yes_attr(ele, "is_undoc"),
            particular: yes_attr(ele, "is_particular"),
            modrm_register: yes_attr(ele, "r"),
            opcode_extension,
            fpush,
            fpop,
            bit_fields,
            mod_constraint,
            attr,
            ring,
            mode,
            documentation,
            flags,
            conditionally_modifies_flags,
            fpu_flags,
            note,
        });
        debug_assert_eq!(pushed, entry_id);
        Ok(())
    }

    /// Parses one `<syntax>` form. An element with no child nodes at
    /// all is skipped; a non-empty one must carry a mnemonic.
    fn parse_syntax(
        &mut self,
        ele: Node<'_, '_>,
        entry: EntryId,
    ) -> Result<Option<SyntaxId>, ReferenceError> {
        if ele.first_child().is_none() {
            return Ok(None);
        }

        let mnemonic = one_element(ele, "mnem")?
            .and_then(|n| n.text())
            .ok_or(ReferenceError::MissingElement("mnem"))?;

        let syntax_id = SyntaxId::new(self.catalog.syntax_count());
        let mut src_operands = Vec::new();
        let mut dst_operands = Vec::new();
        for child in child_elements(ele) {
            match child.tag_name().name() {
                "src" => src_operands.push(self.parse_operand(child, syntax_id)?),
                "dst" => dst_operands.push(self.parse_operand(child, syntax_id)?),
                _ => {}
            }
        }

        let mod_constraint = ele
            .attribute("mod")
            .map(ModConstraint::from_code)
            .transpose()?;

        let pushed = self.catalog.push_syntax(Syntax {
            mnemonic: mnemonic.trim().to_string(),
            mod_constraint,
            src_operands,
            dst_operands,
            entry,
        });
        debug_assert_eq!(pushed, syntax_id);
        Ok(Some(syntax_id))
    }

    fn parse_operand(
        &mut self,
        ele: Node<'_, '_>,
        syntax: SyntaxId,
    ) -> Result<OperandId, ReferenceError> {
        let register_number = ele
            .attribute("registerNumber")
            .map(RegisterNumber::from_code)
            .transpose()?;
        let group = ele
            .attribute("group")
            .map(OperandGroup::from_code)
            .transpose()?;
        let no_depend = ele.attribute("depend") == Some("no");
        let no_displayed = ele.attribute("displayed") == Some("no");

        let mut text = None;
        for node in ele.children().filter(|n| n.is_text()) {
            let content = node.text().unwrap_or("");
            if content.trim().is_empty() {
                continue;
            }
            if text.is_some() {
                return Err(ReferenceError::MultipleTextNodes);
            }
            text = Some(content.to_string());
        }

        let type_attr = ele.attribute("type");
        let type_child = one_text(ele, "t")?;
        if type_attr.is_some() && type_child.is_some() {
            return Err(ReferenceError::DoubleSpecified("type"));
        }
        let ty = type_attr
            .or(type_child)
            .map(OperandType::from_code)
            .transpose()?;

        let address_attr = ele.attribute("address");
        let address_child = one_text(ele, "a")?;
        if address_attr.is_some() && address_child.is_some() {
            return Err(ReferenceError::DoubleSpecified("address"));
        }
        let address = address_attr
            .or(address_child)
            .map(AddressingMethod::from_code)
            .transpose()?;

        Ok(self.catalog.push_operand(Operand {
            text,
            register_number,
            group,
            ty,
            address,
            no_depend,
            no_displayed,
            syntax,
        }))
    }

    fn parse_note(&self, ele: Node<'_, '_>) -> Result<Note, ReferenceError> {
        let brief = one_text(ele, "brief")?.map(collapse_whitespace);
        let detailed = one_text(ele, "det")?.map(collapse_whitespace);
        Ok(Note { brief, detailed })
    }

    fn parse_flags(&self, ele: Node<'_, '_>) -> Result<(FlagSet<Flag>, bool), ReferenceError> {
        let mut flags = FlagSet::default();
        let mut conditional = false;

        if let Some(s) = one_text(ele, "test_f")? {
            flags.tested = Flag::parse_set(s)?;
        }
        if let Some(s) = one_text(ele, "modif_f")? {
            flags.modified = Flag::parse_set(s)?;
        }
        if let Some(def) = one_element(ele, "def_f")? {
            flags.defined = Flag::parse_set(def.text().unwrap_or(""))?;
            conditional |= def.attribute("cond") == Some("yes");
        }
        if let Some(undef) = one_element(ele, "undef_f")? {
            flags.undefined = Flag::parse_set(undef.text().unwrap_or(""))?;
            conditional |= undef.attribute("cond") == Some("yes");
        }
        if let Some(s) = one_text(ele, "f_vals")? {
            for ch in s.chars() {
                let flag = Flag::from_letter(ch.to_ascii_uppercase())
                    .ok_or_else(|| ReferenceError::unknown_enum("flag", ch.to_string()))?;
                if ch.is_ascii_uppercase() {
                    flags.set.insert(flag);
                } else {
                    flags.unset.insert(flag);
                }
            }
        }

        Ok((flags, conditional))
    }

    fn parse_fpu_flags(&self, ele: Node<'_, '_>) -> Result<FlagSet<FpuFlag>, ReferenceError> {
        let mut flags = FlagSet::default();

        if let Some(s) = one_text(ele, "test_f_fpu")? {
            flags.tested = FpuFlag::parse_set(s)?;
        }
        if let Some(s) = one_text(ele, "modif_f_fpu")? {
            flags.modified = FpuFlag::parse_set(s)?;
        }
        if let Some(s) = one_text(ele, "def_f_fpu")? {
            flags.defined = FpuFlag::parse_set(s)?;
        }
        if let Some(s) = one_text(ele, "undef_f_fpu")? {
            flags.undefined = FpuFlag::parse_set(s)?;
        }
        // Letter case distinguishes forced-to-1 from forced-to-0;
        // digit spellings land in the unset subset.
        if let Some(s) = one_text(ele, "f_vals_fpu")? {
            for ch in s.chars() {
                let flag = FpuFlag::from_char(ch)
                    .ok_or_else(|| ReferenceError::unknown_enum("fpu flag", ch.to_string()))?;
                if ch.is_ascii_uppercase() {
                    flags.set.insert(flag);
                } else {
                    flags.unset.insert(flag);
                }
            }
        }

        Ok(flags)
    }
}

fn collapse_whitespace(s: &str) -> String {
    s.split_whitespace().collect::<Vec<_>>().join(" ")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::flags::Flag;

    fn load(xml: &str) -> Reference {
        load_reference_str(xml).expect("reference should load")
    }

    #[test]
    fn loads_a_single_entry() {
        let reference = load(
            r#"<x86reference>
                <one-byte>
                  <pri_opcd value="50">
                    <entry>
                      <syntax>
                        <mnem>PUSH</mnem>
                        <src><a>Z</a><t>vq</t></src>
                        <dst displayed="no"><a>SC</a></dst>
                      </syntax>
                      <grp1>gen</grp1>
                      <grp2>stack</grp2>
                    </entry>
                  </pri_opcd>
                </one-byte>
              </x86reference>"#,
        );

        assert_eq!(reference.entry_count(), 1);
        let (id, entry) = reference.entries().next().unwrap();
        assert_eq!(entry.bytes, vec![0x50]);
        assert!(entry.groups.contains(EntryGroup::Gen));
        assert!(entry.groups.contains(EntryGroup::Stack));
        assert_eq!(entry.mode, Mode::R);
        assert_eq!(entry.documentation, Documentation::D);

        let syntax = reference.canonical_syntax(id).unwrap();
        assert_eq!(syntax.mnemonic, "PUSH");
        assert_eq!(syntax.entry, id);
        let src = reference.operand(syntax.src_operands[0]);
        assert_eq!(src.address, Some(AddressingMethod::Z));
        assert_eq!(src.ty, Some(OperandType::VQ));
        let dst = reference.operand(syntax.dst_operands[0]);
        assert_eq!(dst.address, Some(AddressingMethod::SC));
        assert!(dst.no_displayed);
    }

    #[test]
    fn two_byte_entries_get_the_0f_prefix() {
        let reference = load(
            r#"<x86reference>
                <two-byte>
                  <pri_opcd value="1F">
                    <entry>
                      <syntax><mnem>NOP</mnem><src displayed="no"><a>E</a><t>v</t></src></syntax>
                    </entry>
                  </pri_opcd>
                </two-byte>
              </x86reference>"#,
        );

        let (_, entry) = reference.entries().next().unwrap();
        assert_eq!(entry.bytes, vec![0x0F, 0x1F]);
        assert_eq!(entry.opcode_len(), 2);
    }

    #[test]
    fn parses_entry_metadata() {
        let reference = load(
            r#"<x86reference>
                <one-byte>
                  <pri_opcd value="D9">
                    <entry lock="yes" is_undoc="yes" is_particular="yes" r="yes"
                           fpush="yes" fpop="twice" mod="nomem" attr="serial_cond"
                           ring="0" mode="e" documentation="m" alias="0F_AF"
                           direction="1" op_size="0" tttn="0111" mem_format="01">
                      <syntax><mnem>FAKE</mnem></syntax>
                      <sec_opcd>E0</sec_opcd>
                      <opcd_ext>4</opcd_ext>
                      <proc_start>02</proc_start>
                      <proc_end>09</proc_end>
                      <instr_ext>sse2</instr_ext>
                      <note><brief>multi   word
                        brief</brief><det>detail text</det></note>
                    </entry>
                  </pri_opcd>
                </one-byte>
              </x86reference>"#,
        );

        let (_, entry) = reference.entries().next().unwrap();
        assert_eq!(entry.secondary_byte, Some(0xE0));
        assert_eq!(entry.opcode_extension, Some(4));
        assert!(entry.valid_with_lock_prefix);
        assert!(entry.undocumented);
        assert!(entry.particular);
        assert!(entry.modrm_register);
        assert!(entry.fpush);
        assert_eq!(entry.fpop, 2);
        assert_eq!(entry.mod_constraint, Some(ModConstraint::NoMem));
        assert_eq!(entry.attr, Some(Attr::SerialCond));
        assert_eq!(entry.ring, Some(Ring::R0));
        assert_eq!(entry.mode, Mode::E);
        assert_eq!(entry.documentation, Documentation::M);
        assert_eq!(entry.processor_start, Some(ProcessorCode::P80286));
        assert_eq!(entry.processor_end, Some(ProcessorCode::PIII));
        assert_eq!(
            entry.instruction_extension,
            Some(InstructionExtension::SSE2)
        );
        assert_eq!(entry.alias_bytes.as_deref(), Some(&[0x0F, 0xAF][..]));
        assert_eq!(entry.partial_alias_bytes, entry.alias_bytes);
        assert_eq!(entry.bit_fields.len(), 4);
        assert!(entry.bit_fields.contains(BitField::Direction));
        assert!(entry.bit_fields.contains(BitField::OperandSize));
        assert!(entry.bit_fields.contains(BitField::Condition));
        assert!(entry.bit_fields.contains(BitField::MemoryFormat));
        assert!(!entry.bit_fields.contains(BitField::SignExtend));
        let note = entry.note.as_ref().unwrap();
        assert_eq!(note.brief.as_deref(), Some("multi word brief"));
        assert_eq!(note.detailed.as_deref(), Some("detail text"));
        assert_eq!(entry.encoding(), vec![0xD9, 0xE0]);
    }

    #[test]
    fn parses_flag_sets() {
        let reference = load(
            r#"<x86reference>
                <one-byte>
                  <pri_opcd value="00">
                    <entry>
                      <syntax><mnem>ADD</mnem></syntax>
                      <test_f>d</test_f>
                      <modif_f>oszapc</modif_f>
                      <def_f cond="yes">oszapc</def_f>
                      <undef_f>a</undef_f>
                      <f_vals>Cz</f_vals>
                      <modif_f_fpu>1</modif_f_fpu>
                      <f_vals_fpu>B3</f_vals_fpu>
                    </entry>
                  </pri_opcd>
                </one-byte>
              </x86reference>"#,
        );

        let (_, entry) = reference.entries().next().unwrap();
        assert!(entry.flags.tested.contains(Flag::D));
        assert_eq!(entry.flags.modified.len(), 6);
        assert!(entry.conditionally_modifies_flags);
        assert!(entry.flags.undefined.contains(Flag::A));
        assert!(entry.flags.set.contains(Flag::C));
        assert!(entry.flags.unset.contains(Flag::Z));
        assert!(entry.fpu_flags.modified.contains(FpuFlag::C1));
        assert!(entry.fpu_flags.set.contains(FpuFlag::C1));
        assert!(entry.fpu_flags.unset.contains(FpuFlag::C3));
    }

    #[test]
    fn empty_syntax_elements_are_skipped() {
        let reference = load(
            r#"<x86reference>
                <one-byte>
                  <pri_opcd value="66">
                    <entry attr="null"><syntax/><grp1>prefix</grp1></entry>
                  </pri_opcd>
                </one-byte>
              </x86reference>"#,
        );

        let (_, entry) = reference.entries().next().unwrap();
        assert!(entry.syntaxes.is_empty());
        assert!(entry.is_prefix());
    }

    #[test]
    fn missing_mnemonic_is_an_error() {
        let result = load_reference_str(
            r#"<x86reference><one-byte><pri_opcd value="00">
                 <entry><syntax><src>AL</src></syntax></entry>
               </pri_opcd></one-byte></x86reference>"#,
        );
        assert!(matches!(result, Err(ReferenceError::MissingElement("mnem"))));
    }

    #[test]
    fn double_specified_type_is_an_error() {
        let result = load_reference_str(
            r#"<x86reference><one-byte><pri_opcd value="00">
                 <entry><syntax><mnem>X</mnem><src type="b"><t>b</t></src></syntax></entry>
               </pri_opcd></one-byte></x86reference>"#,
        );
        assert!(matches!(
            result,
            Err(ReferenceError::DoubleSpecified("type"))
        ));
    }

    #[test]
    fn multiple_operand_text_nodes_are_an_error() {
        let result = load_reference_str(
            r#"<x86reference><one-byte><pri_opcd value="00">
                 <entry><syntax><mnem>X</mnem><src>AL<t>b</t>BL</src></syntax></entry>
               </pri_opcd></one-byte></x86reference>"#,
        );
        assert!(matches!(result, Err(ReferenceError::MultipleTextNodes)));
    }

    #[test]
    fn unknown_enumerant_is_an_error() {
        let result = load_reference_str(
            r#"<x86reference><one-byte><pri_opcd value="00">
                 <entry><grp1>florble</grp1></entry>
               </pri_opcd></one-byte></x86reference>"#,
        );
        assert!(matches!(
            result,
            Err(ReferenceError::UnknownEnum { kind: "entry group", .. })
        ));
    }

    #[test]
    fn inverted_processor_range_is_an_error() {
        let result = load_reference_str(
            r#"<x86reference><one-byte><pri_opcd value="00">
                 <entry><proc_start>09</proc_start><proc_end>02</proc_end></entry>
               </pri_opcd></one-byte></x86reference>"#,
        );
        assert!(matches!(
            result,
            Err(ReferenceError::ProcessorRange { start: 9, end: 2 })
        ));
    }

    #[test]
    fn operand_attributes_are_parsed() {
        let reference = load(
            r#"<x86reference>
                <one-byte>
                  <pri_opcd value="9B">
                    <entry>
                      <syntax>
                        <mnem>FAKE</mnem>
                        <src registerNumber="C0000081" group="msr" depend="no">IA32_STAR</src>
                      </syntax>
                    </entry>
                  </pri_opcd>
                </one-byte>
              </x86reference>"#,
        );

        let (_, operand) = reference.operands().next().unwrap();
        assert_eq!(operand.register_number, Some(RegisterNumber::RC0000081));
        assert_eq!(operand.group, Some(OperandGroup::MSR));
        assert!(operand.no_depend);
        assert!(!operand.no_displayed);
        assert_eq!(operand.text.as_deref(), Some("IA32_STAR"));
    }

    #[test]
    fn back_references_are_consistent() {
        let reference = load(
            r#"<x86reference>
                <one-byte>
                  <pri_opcd value="88">
                    <entry>
                      <syntax><mnem>MOV</mnem><dst><a>E</a><t>b</t></dst><src><a>G</a><t>b</t></src></syntax>
                      <syntax><mnem>MOVB</mnem><dst><a>E</a><t>b</t></dst><src><a>G</a><t>b</t></src></syntax>
                    </entry>
                  </pri_opcd>
                  <pri_opcd value="89">
                    <entry>
                      <syntax><mnem>MOV</mnem><dst><a>E</a><t>vqp</t></dst><src><a>G</a><t>vqp</t></src></syntax>
                    </entry>
                  </pri_opcd>
                </one-byte>
              </x86reference>"#,
        );

        for (entry_id, entry) in reference.entries() {
            for &syntax_id in &entry.syntaxes {
                let syntax = reference.syntax(syntax_id);
                assert_eq!(syntax.entry, entry_id);
                for &operand_id in syntax.src_operands.iter().chain(&syntax.dst_operands) {
                    assert_eq!(reference.operand(operand_id).syntax, syntax_id);
                }
            }
        }
        assert_eq!(reference.syntax_count(), 3);
        assert_eq!(reference.operand_count(), 6);
    }
}
