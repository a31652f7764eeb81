//! Tests for pattern flattening, overlap checks and frequency counting

#[cfg(test)]
mod tests {
    use ndarray::{Array2, array};
    use wavetile::SynthesisError;
    use wavetile::analysis::patterns::{Pattern, PatternTable};
    use wavetile::spatial::window::SymmetryMode;

    fn pattern(window: &Array2<u8>) -> Pattern<u8> {
        Pattern::from_window(window).expect("window should be square")
    }

    // Tests row-major flattening with the top-left anchor
    // Verified by collecting the window in column-major order
    #[test]
    fn test_from_window_flattens_row_major() {
        let p = pattern(&array![[1, 2], [3, 4]]);
        assert_eq!(p.size(), 2);
        assert_eq!(p.symbols(), &[1, 2, 3, 4]);
        assert_eq!(p.anchor(), 1);
    }

    // Tests rejection of non-square and empty windows
    // Verified by removing the rows != cols check
    #[test]
    fn test_from_window_rejects_invalid_shapes() {
        let wide: Array2<u8> = Array2::zeros((2, 3));
        let empty: Array2<u8> = Array2::zeros((0, 0));
        assert!(Pattern::from_window(&wide).is_none());
        assert!(Pattern::from_window(&empty).is_none());
    }

    // Tests horizontal overlap on the shared N-1 columns
    // Verified by comparing first columns with first columns
    #[test]
    fn test_accepts_west() {
        let right = pattern(&array![[2, 3], [5, 6]]);
        let left = pattern(&array![[1, 2], [4, 5]]);

        assert!(right.accepts_west(&left));
        assert!(!left.accepts_west(&right));
    }

    // Tests vertical overlap on the shared N-1 rows
    // Verified by comparing the last row of self with the first row of other
    #[test]
    fn test_accepts_north() {
        let lower = pattern(&array![[4, 5], [7, 8]]);
        let upper = pattern(&array![[1, 2], [4, 5]]);

        assert!(lower.accepts_north(&upper));
        assert!(!upper.accepts_north(&lower));
    }

    // Tests that 1x1 patterns overlap on nothing and accept any neighbor
    // Verified by returning false for size 1
    #[test]
    fn test_single_symbol_patterns_always_overlap() {
        let a = pattern(&array![[1]]);
        let b = pattern(&array![[2]]);
        assert!(a.accepts_west(&b));
        assert!(a.accepts_north(&b));
    }

    // Tests that patterns of different sizes never overlap
    // Verified by removing the size equality guard
    #[test]
    fn test_mismatched_sizes_do_not_overlap() {
        let small = pattern(&array![[1]]);
        let large = pattern(&array![[1, 1], [1, 1]]);
        assert!(!small.accepts_west(&large));
        assert!(!large.accepts_north(&small));
    }

    // Tests checkerboard extraction merges all variants into two patterns
    // Verified by skipping the lookup and pushing every variant
    #[test]
    fn test_checkerboard_extracts_two_patterns() {
        let raster = array![[0u8, 1], [1, 0]];
        let table = PatternTable::extract(&raster, 2, SymmetryMode::ALL)
            .expect("extraction should succeed");

        assert_eq!(table.len(), 2);
        assert_eq!(table.frequencies(), &[16, 16]);
        assert_eq!(table.pattern_size(), 2);
        assert_eq!(table.symmetry(), SymmetryMode::ALL);
    }

    // Tests that frequencies add up to windows times variants
    // Verified by counting only first occurrences
    #[test]
    fn test_frequency_conservation() {
        let raster = array![[0u8, 1, 2], [2, 1, 1], [0, 0, 2], [1, 2, 0]];
        for mode in [
            SymmetryMode::NONE,
            SymmetryMode {
                rotations: false,
                reflections: true,
            },
            SymmetryMode::ALL,
        ] {
            let table =
                PatternTable::extract(&raster, 2, mode).expect("extraction should succeed");
            assert_eq!(table.total_frequency(), mode.variant_count() * 3 * 4);
            assert!(table.frequencies().iter().all(|&f| f >= 1));
        }
    }

    // Tests first-seen ordering of the pattern table
    // Verified by sorting patterns by symbols
    #[test]
    fn test_patterns_keep_first_seen_order() {
        let raster = array![[1u8, 0]];
        let table = PatternTable::extract(&raster, 2, SymmetryMode::NONE)
            .expect("extraction should succeed");

        assert_eq!(table.index_of(&[1, 0, 1, 0]), Some(0));
        assert_eq!(table.index_of(&[0, 1, 0, 1]), Some(1));
        assert_eq!(table.index_of(&[1, 1, 1, 1]), None);
        assert_eq!(table.pattern(0).map(Pattern::anchor), Some(1));
        assert_eq!(table.frequency(1), Some(1));
        assert_eq!(table.frequency(2), None);
    }

    // Tests a uniform raster collapses to a single pattern
    // Verified by treating each variant as a new pattern
    #[test]
    fn test_uniform_raster_single_pattern() {
        let raster = Array2::from_elem((3, 3), 7u8);
        let table = PatternTable::extract(&raster, 1, SymmetryMode::ALL)
            .expect("extraction should succeed");

        assert_eq!(table.len(), 1);
        assert_eq!(table.frequency(0), Some(72));
    }

    // Tests rejection of empty rasters and a zero pattern size
    // Verified by removing the pattern_size guard
    #[test]
    fn test_extract_rejects_invalid_input() {
        let empty: Array2<u8> = Array2::zeros((0, 0));
        assert!(matches!(
            PatternTable::extract(&empty, 2, SymmetryMode::ALL),
            Err(SynthesisError::InvalidSourceData { .. })
        ));

        let raster = array![[1u8]];
        assert!(matches!(
            PatternTable::extract(&raster, 0, SymmetryMode::ALL),
            Err(SynthesisError::InvalidParameter {
                parameter: "pattern_size",
                ..
            })
        ));
    }
}
