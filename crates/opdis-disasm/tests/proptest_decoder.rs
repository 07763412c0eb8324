//! Property-based tests for the reference-driven decoder.
//!
//! Invariants checked over arbitrary input:
//! - Decoding never panics
//! - Decoded lengths stay within the 15-byte architectural bound
//! - Decoding is deterministic
//! - Streaming decode covers the buffer without gaps or overlaps

use proptest::prelude::*;

use opdis_disasm::{build_trie, ByteTrie, Decoder, MAX_INSTRUCTION_LEN};
use opdis_ref::{load_reference_str, EntryId, Mode, Reference};

const FIXTURE: &str = include_str!("fixtures/x86_subset.xml");

fn fixture() -> (Reference, ByteTrie<EntryId>) {
    let reference = load_reference_str(FIXTURE).expect("fixture should load");
    let trie = build_trie(&reference).expect("fixture trie should build");
    (reference, trie)
}

fn any_mode() -> impl Strategy<Value = Mode> {
    prop_oneof![
        Just(Mode::R),
        Just(Mode::P),
        Just(Mode::E),
        Just(Mode::S),
    ]
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(2048))]

    /// Decoding arbitrary bytes never panics; errors are fine.
    #[test]
    fn decode_never_panics(
        bytes in prop::collection::vec(any::<u8>(), 0..MAX_INSTRUCTION_LEN),
        mode in any_mode()
    ) {
        let (reference, trie) = fixture();
        let decoder = Decoder::new(&reference, &trie, mode);
        let _ = decoder.decode_one(&bytes);
    }

    /// A successful decode consumes between 1 byte and the buffer
    /// length, never exceeding the architectural limit.
    #[test]
    fn decoded_length_is_bounded(
        bytes in prop::collection::vec(any::<u8>(), 1..MAX_INSTRUCTION_LEN),
        mode in any_mode()
    ) {
        let (reference, trie) = fixture();
        let decoder = Decoder::new(&reference, &trie, mode);
        if let Ok(insn) = decoder.decode_one(&bytes) {
            prop_assert!(insn.length >= 1);
            prop_assert!(insn.length <= bytes.len());
            prop_assert!(insn.length <= MAX_INSTRUCTION_LEN);
        }
    }

    /// Same input, same output.
    #[test]
    fn decode_is_deterministic(
        bytes in prop::collection::vec(any::<u8>(), 1..MAX_INSTRUCTION_LEN),
        mode in any_mode()
    ) {
        let (reference, trie) = fixture();
        let decoder = Decoder::new(&reference, &trie, mode);
        match (decoder.decode_one(&bytes), decoder.decode_one(&bytes)) {
            (Ok(a), Ok(b)) => {
                prop_assert_eq!(a.entry, b.entry);
                prop_assert_eq!(a.length, b.length);
                prop_assert_eq!(a.modrm, b.modrm);
                prop_assert_eq!(a.immediate, b.immediate);
            }
            (Err(_), Err(_)) => {}
            (a, b) => prop_assert!(false, "inconsistent results: {a:?} vs {b:?}"),
        }
    }

    /// The streaming iterator advances by exactly the lengths it
    /// reports and never loops.
    #[test]
    fn stream_decode_advances_monotonically(
        bytes in prop::collection::vec(any::<u8>(), 1..256usize),
        mode in any_mode()
    ) {
        let (reference, trie) = fixture();
        let decoder = Decoder::new(&reference, &trie, mode);
        let mut covered = 0usize;
        for result in decoder.decode(&bytes) {
            match result {
                Ok(insn) => {
                    prop_assert!(insn.length >= 1);
                    covered += insn.length;
                    prop_assert!(covered <= bytes.len());
                }
                Err(_) => break,
            }
        }
    }

    /// Buffers over the limit are always rejected.
    #[test]
    fn oversized_buffers_are_rejected(
        bytes in prop::collection::vec(any::<u8>(), MAX_INSTRUCTION_LEN + 1..64),
        mode in any_mode()
    ) {
        let (reference, trie) = fixture();
        let decoder = Decoder::new(&reference, &trie, mode);
        prop_assert!(decoder.decode_one(&bytes).is_err());
    }
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(512))]

    /// Register-in-opcode forms resolve to the same entry for all
    /// eight register selections.
    #[test]
    fn register_forms_share_their_entry(low_bits in 0u8..8) {
        let (reference, trie) = fixture();
        let decoder = Decoder::new(&reference, &trie, Mode::E);

        let push = decoder.decode_one(&[0x50 | low_bits]).unwrap();
        let base = decoder.decode_one(&[0x50]).unwrap();
        prop_assert_eq!(push.entry, base.entry);
        prop_assert_eq!(reference.entry(push.entry).bytes.as_slice(), &[0x50][..]);
    }
}
