//! Property-based tests for recipe storage and document decoding
//!
//! Critical properties:
//! - The selection never leaves `[0, capacity)` whatever the scroll sequence
//! - Arbitrary bytes never panic the document decoder
//! - A flipped payload byte is always caught

use proptest::prelude::*;
use stackshift_core::{ItemId, ItemStack};
use stackshift_storage::persist::{decode_document, encode_document};
use stackshift_storage::{RecipeStorage, SaveScope};

proptest! {
    /// Property: scroll/select sequences keep the selection clamped
    #[test]
    fn selection_stays_in_range(
        capacity in 1usize..40,
        steps in prop::collection::vec((any::<bool>(), any::<bool>(), 0usize..64), 0..200),
    ) {
        let mut storage = RecipeStorage::new(capacity, SaveScope::Global);
        for (scroll, forward, index) in steps {
            if scroll {
                storage.scroll_selection(forward);
            } else {
                storage.change_selection(index);
            }
            prop_assert!(storage.selection() < capacity);
        }
    }

    /// Property: forward scrolling saturates at the last index
    #[test]
    fn forward_scroll_saturates(capacity in 1usize..40, extra in 0usize..10) {
        let mut storage = RecipeStorage::new(capacity, SaveScope::Global);
        for _ in 0..capacity + extra {
            storage.scroll_selection(true);
        }
        prop_assert_eq!(storage.selection(), capacity - 1);
    }

    /// Property: arbitrary bytes decode to an error or a value, never a panic
    #[test]
    fn arbitrary_bytes_dont_crash(bytes in prop::collection::vec(any::<u8>(), 0..2048)) {
        let _ = decode_document::<Vec<ItemStack>>(&bytes);
    }

    /// Property: corrupting any payload byte is detected
    #[test]
    fn corruption_is_detected(
        counts in prop::collection::vec(1u32..64, 1..20),
        flip in any::<prop::sample::Index>(),
    ) {
        let stacks: Vec<ItemStack> = counts
            .iter()
            .enumerate()
            .map(|(i, &count)| ItemStack::new(ItemId(i as u16 + 1), count))
            .collect();
        let mut bytes = encode_document(&stacks).unwrap();
        let payload_start = 14;
        let target = payload_start + flip.index(bytes.len() - payload_start);
        bytes[target] ^= 0x5A;
        prop_assert!(decode_document::<Vec<ItemStack>>(&bytes).is_err());
    }
}
