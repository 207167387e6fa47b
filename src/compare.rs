//! Correctness oracle: mean absolute difference between two results.

/// Compares two result vectors element-wise.
///
/// Returns `None` while either side of the benchmark has not produced a
/// result yet, when the lengths disagree, or when both are empty (a mean
/// over zero elements is undefined); a partial or default value is never
/// reported, so an incomplete run cannot masquerade as a success. When
/// both are present the arithmetic mean of `|a[i] - b[i]|` is returned,
/// which is non-negative by construction.
///
/// A well-formed device kernel lands near zero here, bounded by
/// floating-point accumulation error rather than exact equality; a value
/// far from zero indicates a genuine kernel bug rather than drift.
pub fn mean_absolute_difference(a: Option<&[f32]>, b: Option<&[f32]>) -> Option<f32> {
    let (a, b) = (a?, b?);
    if a.is_empty() {
        return None;
    }
    if a.len() != b.len() {
        log::warn!(
            "refusing to compare results of unequal length ({} vs {})",
            a.len(),
            b.len()
        );
        return None;
    }

    let total: f32 = a.iter().zip(b).map(|(x, y)| (x - y).abs()).sum();
    Some(total / a.len() as f32)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn absent_operands_yield_none() {
        let data = [1.0f32, 2.0];
        assert_eq!(mean_absolute_difference(None, None), None);
        assert_eq!(mean_absolute_difference(Some(&data[..]), None), None);
        assert_eq!(mean_absolute_difference(None, Some(&data[..])), None);
    }

    #[test]
    fn empty_operands_yield_none() {
        assert_eq!(mean_absolute_difference(Some(&[][..]), Some(&[][..])), None);
    }

    #[test]
    fn unequal_lengths_yield_none() {
        assert_eq!(
            mean_absolute_difference(Some(&[1.0, 2.0][..]), Some(&[1.0][..])),
            None
        );
    }

    #[test]
    fn identical_inputs_yield_zero() {
        let data = [0.5f32, 1.5, -3.0, 7.25];
        assert_eq!(
            mean_absolute_difference(Some(&data[..]), Some(&data[..])),
            Some(0.0)
        );
    }

    #[test]
    fn difference_is_the_mean_of_per_element_gaps() {
        let a = [1.0f32, 2.0, 3.0, 4.0];
        let b = [2.0f32, 2.0, 1.0, 4.0];
        // gaps: 1, 0, 2, 0 -> mean 0.75
        assert_eq!(
            mean_absolute_difference(Some(&a[..]), Some(&b[..])),
            Some(0.75)
        );
    }

    #[test]
    fn difference_is_non_negative_for_random_operands() {
        let a: Vec<f32> = (0..64).map(|v| (v as f32).sin()).collect();
        let b: Vec<f32> = (0..64).map(|v| (v as f32).cos()).collect();
        let diff = mean_absolute_difference(Some(&a[..]), Some(&b[..])).unwrap();
        assert!(diff >= 0.0);
    }
}
