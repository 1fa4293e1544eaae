//! Property tests for the bounded top-N selector
//!
//! The selector must bound its memory at the configured capacity while
//! retaining exactly the largest items of an arbitrary stream.

use proptest::prelude::*;
use rdbstat::{BoundedTopN, Sizeable};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct Item(u64);

impl Sizeable for Item {
    fn size(&self) -> u64 {
        self.0
    }
}

proptest! {
    #[test]
    fn retains_min_of_capacity_and_input_length(
        sizes in proptest::collection::vec(0u64..10_000, 0..200),
        capacity in 0usize..50,
    ) {
        let mut top = BoundedTopN::new(capacity);
        for &s in &sizes {
            top.add(Item(s));
        }
        let items = top.into_sorted_desc();
        prop_assert_eq!(items.len(), capacity.min(sizes.len()));
    }

    #[test]
    fn output_is_sorted_descending(
        sizes in proptest::collection::vec(0u64..10_000, 0..200),
        capacity in 1usize..50,
    ) {
        let mut top = BoundedTopN::new(capacity);
        for &s in &sizes {
            top.add(Item(s));
        }
        let items = top.into_sorted_desc();
        for pair in items.windows(2) {
            prop_assert!(pair[0].size() >= pair[1].size());
        }
    }

    #[test]
    fn retained_dominate_dropped(
        sizes in proptest::collection::vec(0u64..10_000, 0..200),
        capacity in 1usize..50,
    ) {
        let mut top = BoundedTopN::new(capacity);
        for &s in &sizes {
            top.add(Item(s));
        }
        let retained: Vec<u64> = top.into_sorted_desc().iter().map(|i| i.0).collect();

        // The retained multiset must equal the largest capacity-many sizes.
        let mut expected = sizes.clone();
        expected.sort_unstable_by(|a, b| b.cmp(a));
        expected.truncate(capacity);
        prop_assert_eq!(retained, expected);
    }

    #[test]
    fn never_exceeds_capacity_mid_stream(
        sizes in proptest::collection::vec(0u64..10_000, 0..200),
        capacity in 0usize..20,
    ) {
        let mut top = BoundedTopN::new(capacity);
        for &s in &sizes {
            top.add(Item(s));
            prop_assert!(top.len() <= capacity);
        }
    }
}
