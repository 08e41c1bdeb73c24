//! Completion Set Tests
//!
//! ## Test Scopes
//! - **Membership**: `add`/`delete`/`has` behave like a set of page IDs.
//! - **Counting**: `len` tracks the number of set bits.
//! - **Gap Scan**: `min_not_exists_from` finds the first incomplete page at or after a cursor.
//! - **Snapshots**: byte snapshots reload into an identical set.

#[cfg(test)]
mod tests {
    use crate::completion::CompletionSet;
    use std::sync::Arc;

    // ============================================================
    // MEMBERSHIP
    // ============================================================

    #[test]
    fn test_has_reflects_adds_and_deletes() {
        // ARRANGE
        let set = CompletionSet::new();
        for id in [1, 3, 5, 7, 100, 101, 102, 103, 104, 105, 106] {
            set.add(id);
        }

        // ACT
        set.delete(101);
        set.delete(103);
        set.delete(105);

        // ASSERT
        let expected = [
            (0, false),
            (1, true),
            (2, false),
            (3, true),
            (4, false),
            (5, true),
            (6, false),
            (7, true),
            (8, false),
            (9, false),
            (100, true),
            (101, false),
            (102, true),
            (103, false),
            (104, true),
            (105, false),
            (106, true),
            (107, false),
        ];
        for (id, want) in expected {
            assert_eq!(set.has(id), want, "has({}) should be {}", id, want);
        }
    }

    #[test]
    fn test_delete_beyond_length_is_noop() {
        let set = CompletionSet::new();
        set.add(3);

        set.delete(10_000);

        assert_eq!(set.byte_len(), 1);
        assert!(set.has(3));
    }

    #[test]
    fn test_scenario_sparse_adds() {
        let set = CompletionSet::new();
        set.add(1);
        set.add(3);
        set.add(5);

        assert_eq!(set.min_not_exists_from(0), 0);
        assert!(!set.has(2));
        assert!(set.has(3));
        assert_eq!(set.len(), 3);
    }

    // ============================================================
    // COUNTING
    // ============================================================

    #[test]
    fn test_len_tracks_population() {
        let set = CompletionSet::new();
        assert_eq!(set.len(), 0);
        assert!(set.is_empty());

        set.add(123);
        assert_eq!(set.len(), 1);

        set.add(8);
        assert_eq!(set.len(), 2);

        set.delete(7);
        assert_eq!(set.len(), 2);

        set.delete(123);
        assert_eq!(set.len(), 1);

        set.add(9999);
        assert_eq!(set.len(), 2);
        assert!(!set.is_empty());
    }

    #[test]
    fn test_adding_same_page_twice_counts_once() {
        let set = CompletionSet::new();
        set.add(42);
        set.add(42);

        assert_eq!(set.len(), 1);
    }

    // ============================================================
    // GAP SCAN
    // ============================================================

    #[test]
    fn test_min_not_exists_from_on_empty_set() {
        let set = CompletionSet::new();

        assert_eq!(set.min_not_exists_from(0), 0);
        assert_eq!(set.min_not_exists_from(1), 1);
        assert_eq!(set.min_not_exists_from(123), 123);
    }

    #[test]
    fn test_min_not_exists_from_skips_completed_run() {
        // ARRANGE: pages 30..=70 done
        let set = CompletionSet::new();
        for id in 30..=70 {
            set.add(id);
        }

        // ASSERT
        assert_eq!(set.min_not_exists_from(0), 0);
        assert_eq!(set.min_not_exists_from(1), 1);
        assert_eq!(set.min_not_exists_from(30), 71);
        assert_eq!(set.min_not_exists_from(33), 71);
        assert_eq!(set.min_not_exists_from(71), 71);
        assert_eq!(set.min_not_exists_from(123), 123);
    }

    #[test]
    fn test_min_not_exists_from_runs_off_the_end() {
        // Every bit of the first two bytes is set
        let set = CompletionSet::new();
        for id in 0..16 {
            set.add(id);
        }

        assert_eq!(set.min_not_exists_from(0), 16);
        assert_eq!(set.min_not_exists_from(9), 16);
    }

    #[test]
    fn test_min_not_exists_from_matches_linear_scan() {
        // ARRANGE: irregular pattern crossing several bytes
        let set = CompletionSet::new();
        for id in 0..200u64 {
            if id % 7 != 3 && id % 11 != 0 {
                set.add(id);
            }
        }

        // ASSERT: result is clear and everything in [from, result) is set
        for from in 0..210u64 {
            let found = set.min_not_exists_from(from);
            assert!(found >= from);
            assert!(!set.has(found), "page {} should be incomplete", found);
            for k in from..found {
                assert!(set.has(k), "page {} should be complete", k);
            }
        }
    }

    // ============================================================
    // SNAPSHOTS AND MERGE
    // ============================================================

    #[test]
    fn test_bytes_reload_reproduces_membership() {
        // ARRANGE
        let set = CompletionSet::new();
        for id in [0, 2, 9, 64, 65, 1000] {
            set.add(id);
        }

        // ACT
        let reloaded = CompletionSet::from_bytes(&set.to_bytes());

        // ASSERT
        for id in 0..1100 {
            assert_eq!(reloaded.has(id), set.has(id));
        }
        assert_eq!(reloaded.len(), 6);
    }

    #[test]
    fn test_bit_layout_is_lsb_first() {
        let set = CompletionSet::new();
        set.add(0);
        set.add(9);

        assert_eq!(set.to_bytes(), vec![0b0000_0001, 0b0000_0010]);
    }

    #[test]
    fn test_union_merges_and_grows() {
        let left = CompletionSet::new();
        left.add(1);
        let right = CompletionSet::new();
        right.add(2);
        right.add(500);

        left.union(&right);

        assert!(left.has(1));
        assert!(left.has(2));
        assert!(left.has(500));
        assert_eq!(left.len(), 3);
        assert_eq!(right.len(), 2);
    }

    #[test]
    fn test_union_with_itself_is_noop() {
        let set = CompletionSet::new();
        set.add(5);

        set.union(&set);

        assert_eq!(set.len(), 1);
    }

    #[test]
    fn test_concurrent_adds_are_all_recorded() {
        let set = Arc::new(CompletionSet::new());

        let handles: Vec<_> = (0..4u64)
            .map(|worker| {
                let set = set.clone();
                std::thread::spawn(move || {
                    for id in (worker * 1000)..((worker + 1) * 1000) {
                        set.add(id);
                    }
                })
            })
            .collect();
        for handle in handles {
            handle.join().unwrap();
        }

        assert_eq!(set.len(), 4000);
        assert_eq!(set.min_not_exists_from(0), 4000);
    }
}
