//! Builds the opcode trie from a loaded reference catalog.

use opdis_ref::{AddressingMethod, EntryId, Reference};

use crate::error::BuildError;
use crate::trie::ByteTrie;

/// Converts the flat entry list into a byte trie keyed by
/// `prefix_byte? | bytes | secondary_byte?`.
///
/// Each entry is keyed exactly once, however many mnemonic forms it
/// carries; distinct entries sharing a key become multiple candidates
/// and are resolved later by the decoder's selection policy. An entry
/// with a register-in-opcode operand (addressing method Z) is
/// additionally inserted under the seven variants with the low three
/// bits of its final opcode byte set to 1..7.
pub fn build_trie(reference: &Reference) -> Result<ByteTrie<EntryId>, BuildError> {
    let mut trie = ByteTrie::new();

    for (entry_id, entry) in reference.entries() {
        trie.insert(&entry.encoding(), entry_id);

        let has_register_form = entry.syntaxes.iter().any(|&syntax_id| {
            let syntax = reference.syntax(syntax_id);
            syntax
                .dst_operands
                .iter()
                .chain(&syntax.src_operands)
                .any(|&op| reference.operand(op).address == Some(AddressingMethod::Z))
        });
        if !has_register_form {
            continue;
        }

        let last = *entry.bytes.last().expect("entry bytes are never empty");
        if last & 0x07 != 0 {
            return Err(BuildError::register_bits_occupied(&entry.bytes));
        }

        for register in 1..8u8 {
            let mut key = Vec::with_capacity(entry.opcode_len());
            if let Some(prefix) = entry.prefix_byte {
                key.push(prefix);
            }
            key.extend_from_slice(&entry.bytes);
            *key.last_mut().expect("key is never empty") = last | register;
            if let Some(secondary) = entry.secondary_byte {
                key.push(secondary);
            }
            trie.insert(&key, entry_id);
        }
    }

    Ok(trie)
}

#[cfg(test)]
mod tests {
    use super::*;
    use opdis_ref::load_reference_str;

    #[test]
    fn register_forms_expand_to_eight_keys() {
        let reference = load_reference_str(
            r#"<x86reference>
                <one-byte>
                  <pri_opcd value="50">
                    <entry>
                      <syntax><mnem>PUSH</mnem><src><a>Z</a><t>vq</t></src></syntax>
                    </entry>
                  </pri_opcd>
                </one-byte>
              </x86reference>"#,
        )
        .unwrap();
        let trie = build_trie(&reference).unwrap();

        for opcode in 0x50..=0x57u8 {
            let key = [opcode];
            let found: Vec<_> = trie.get(&key).collect();
            assert_eq!(found.len(), 1, "opcode {opcode:#x} should resolve");
        }
        assert_eq!(trie.get(&[0x58]).count(), 0);
    }

    #[test]
    fn occupied_register_bits_are_fatal() {
        let reference = load_reference_str(
            r#"<x86reference>
                <one-byte>
                  <pri_opcd value="51">
                    <entry>
                      <syntax><mnem>PUSH</mnem><src><a>Z</a><t>vq</t></src></syntax>
                    </entry>
                  </pri_opcd>
                </one-byte>
              </x86reference>"#,
        )
        .unwrap();
        assert!(matches!(
            build_trie(&reference),
            Err(BuildError::RegisterBitsOccupied { .. })
        ));
    }

    #[test]
    fn entries_with_several_syntaxes_are_keyed_once() {
        let reference = load_reference_str(
            r#"<x86reference>
                <one-byte>
                  <pri_opcd value="C3">
                    <entry>
                      <syntax><mnem>RET</mnem></syntax>
                      <syntax><mnem>RETN</mnem></syntax>
                    </entry>
                  </pri_opcd>
                </one-byte>
              </x86reference>"#,
        )
        .unwrap();
        let trie = build_trie(&reference).unwrap();
        assert_eq!(trie.get(&[0xC3]).count(), 1);
    }

    #[test]
    fn register_forms_expand_once_per_entry() {
        // Two forms, one of them with a register-in-opcode operand:
        // every variant key still resolves to a single candidate.
        let reference = load_reference_str(
            r#"<x86reference>
                <one-byte>
                  <pri_opcd value="58">
                    <entry>
                      <syntax><mnem>POP</mnem><dst><a>Z</a><t>vq</t></dst></syntax>
                      <syntax><mnem>POPQ</mnem><dst><a>Z</a><t>vq</t></dst></syntax>
                    </entry>
                  </pri_opcd>
                </one-byte>
              </x86reference>"#,
        )
        .unwrap();
        let trie = build_trie(&reference).unwrap();
        for opcode in 0x58..=0x5Fu8 {
            assert_eq!(trie.get(&[opcode]).count(), 1, "opcode {opcode:#x}");
        }
    }

    #[test]
    fn syntaxless_prefix_entries_stay_reachable() {
        let reference = load_reference_str(
            r#"<x86reference>
                <one-byte>
                  <pri_opcd value="66">
                    <entry attr="null"><syntax/><grp1>prefix</grp1></entry>
                  </pri_opcd>
                </one-byte>
              </x86reference>"#,
        )
        .unwrap();
        let trie = build_trie(&reference).unwrap();
        assert_eq!(trie.get(&[0x66]).count(), 1);
    }

    #[test]
    fn prefixed_and_secondary_keys_compose() {
        let reference = load_reference_str(
            r#"<x86reference>
                <one-byte>
                  <pri_opcd value="D9">
                    <entry>
                      <sec_opcd>E0</sec_opcd>
                      <syntax><mnem>FCHS</mnem></syntax>
                    </entry>
                  </pri_opcd>
                  <pri_opcd value="10">
                    <entry>
                      <pref>F3</pref>
                      <syntax><mnem>FAKE</mnem></syntax>
                    </entry>
                  </pri_opcd>
                </one-byte>
              </x86reference>"#,
        )
        .unwrap();
        let trie = build_trie(&reference).unwrap();
        assert_eq!(trie.get(&[0xD9, 0xE0]).count(), 1);
        assert_eq!(trie.get(&[0xF3, 0x10]).count(), 1);
        assert_eq!(trie.get(&[0x10]).count(), 0);
    }
}
