//==================================================================================
// Unit Tests for the validity bitmask
//==================================================================================

#[cfg(test)]
mod tests {
    use std::sync::atomic::Ordering;

    use crate::null_handling::bitmap::*;

    #[test]
    fn test_all_valid_counts_and_trailing_bits() {
        // 70 rows spans two words; the last word must not carry set bits
        // beyond row 69.
        let mask = ValidityMask::all_valid(70);
        assert_eq!(mask.num_rows(), 70);
        assert_eq!(mask.count_valid(), 70);
        assert!(mask.is_valid(0));
        assert!(mask.is_valid(69));
    }

    #[test]
    fn test_all_null_then_set() {
        let mut mask = ValidityMask::all_null(5);
        assert_eq!(mask.count_valid(), 0);
        mask.set_valid(3, true);
        assert!(mask.is_valid(3));
        assert!(!mask.is_valid(2));
        mask.set_valid(3, false);
        assert_eq!(mask.count_valid(), 0);
    }

    #[test]
    fn test_from_bools_round_trip() {
        let flags = vec![true, false, true, true, false];
        let mask = ValidityMask::from_bools(&flags);
        for (row, &valid) in flags.iter().enumerate() {
            assert_eq!(mask.is_valid(row), valid);
        }
    }

    #[test]
    fn test_atomic_set_and_clear_same_word() {
        // All 64 rows share one mask word; every update is a read-modify-write
        // on the same atomic, so none may be lost.
        let mut mask = ValidityMask::all_null(64);
        {
            let all_rows: Vec<usize> = (0..64).collect();
            let words = mask.atomic_words();
            std::thread::scope(|s| {
                for chunk in all_rows.chunks(16) {
                    let rows = chunk.to_vec();
                    s.spawn(|| {
                        for row in rows {
                            set_bit_safe(words, row);
                        }
                    });
                }
            });
            assert_ne!(words[0].load(Ordering::Relaxed), 0);
        }
        assert_eq!(mask.count_valid(), 64);

        {
            let words = mask.atomic_words();
            for row in (0..64).step_by(2) {
                clear_bit_safe(words, row);
            }
        }
        assert_eq!(mask.count_valid(), 32);
        assert!(!mask.is_valid(0));
        assert!(mask.is_valid(1));
    }

    #[test]
    fn test_deep_copy_is_independent() {
        let mut original = ValidityMask::all_valid(10);
        let copy = original.deep_copy();
        original.set_valid(4, false);
        assert!(!original.is_valid(4));
        assert!(copy.is_valid(4));
    }
}
