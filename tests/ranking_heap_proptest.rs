use ipgraph::collections::{heap_sort, HeapError, RankingHeap};
use proptest::prelude::*;

proptest! {
    #[test]
    fn test_pops_are_non_increasing(items in proptest::collection::vec(any::<i32>(), 0..200)) {
        let mut heap = RankingHeap::with_capacity(items.len());
        for &x in &items {
            prop_assert!(heap.push(x).is_ok());
        }
        prop_assert_eq!(heap.push(0).is_err(), true);

        let mut popped = Vec::with_capacity(items.len());
        while let Ok(x) = heap.pop() {
            popped.push(x);
        }
        prop_assert!(popped.windows(2).all(|w| w[0] >= w[1]));

        let mut expected = items;
        expected.sort_unstable_by(|a, b| b.cmp(a));
        prop_assert_eq!(popped, expected);
    }

    #[test]
    fn test_heap_sort_matches_std_sort(items in proptest::collection::vec(any::<i64>(), 0..300)) {
        let mut sorted = items.clone();
        heap_sort(&mut sorted);
        let mut expected = items;
        expected.sort();
        prop_assert_eq!(sorted, expected);
    }

    #[test]
    fn test_interleaved_push_pop(ops in proptest::collection::vec(prop::option::of(0u8..50), 1..200)) {
        let mut heap = RankingHeap::with_capacity(16);
        let mut model: Vec<u8> = Vec::new();
        for op in ops {
            match op {
                Some(x) => {
                    let result = heap.push(x);
                    if model.len() == 16 {
                        prop_assert_eq!(result, Err(HeapError::Overflow { capacity: 16 }));
                    } else {
                        prop_assert!(result.is_ok());
                        model.push(x);
                    }
                }
                None => {
                    let expected = model.iter().copied().max();
                    match expected {
                        Some(max) => {
                            prop_assert_eq!(heap.pop(), Ok(max));
                            let pos = model.iter().position(|&v| v == max).unwrap();
                            model.swap_remove(pos);
                        }
                        None => prop_assert_eq!(heap.pop(), Err(HeapError::Underflow)),
                    }
                }
            }
            prop_assert_eq!(heap.len(), model.len());
            prop_assert_eq!(heap.top().ok(), model.iter().max());
        }
    }
}

#[test]
fn test_heap_sort_fixed_sizes() {
    // Deterministic pseudo-random input, no extra dependencies.
    let mut state = 0x2545_f491_u32;
    let mut next = || {
        state ^= state << 13;
        state ^= state >> 17;
        state ^= state << 5;
        state % 1000
    };
    for size in [0usize, 1, 2, 50] {
        let input: Vec<u32> = (0..size).map(|_| next()).collect();
        let mut sorted = input.clone();
        heap_sort(&mut sorted);
        let mut expected = input;
        expected.sort_unstable();
        assert_eq!(sorted, expected, "size {size}");
    }
}
