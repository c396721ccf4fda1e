//! Custom ordering: parse, validate and apply a 1-based permutation.
//!
//! An ordering like `3 1 2` means "image 3 first, then image 1, then 2".
//! It is only accepted when it names every image exactly once.

use super::locate::ImageSet;
use crate::error::OrderingError;
use std::num::IntErrorKind;

/// Parse whitespace-separated 1-based indices, e.g. `"3 1 4 2"`.
///
/// Only checks that every token is a number; use [`validate`] for the rest.
/// A number too large for `usize` parses as `usize::MAX`, which [`validate`]
/// then rejects as out of range.
pub fn parse_order(input: &str) -> Result<Vec<usize>, OrderingError> {
    input
        .split_whitespace()
        .map(|tok| match tok.parse::<usize>() {
            Ok(k) => Ok(k),
            Err(e) if *e.kind() == IntErrorKind::PosOverflow => Ok(usize::MAX),
            Err(_) => Err(OrderingError::Malformed {
                token: tok.to_string(),
            }),
        })
        .collect()
}

/// Check that `permutation` is exactly a permutation of `1..=n`.
///
/// # Errors
/// * [`OrderingError::LengthMismatch`] when `permutation.len() != n`
/// * [`OrderingError::NotAPermutation`] on a repeated or out-of-range value
pub fn validate(permutation: &[usize], n: usize) -> Result<(), OrderingError> {
    if permutation.len() != n {
        return Err(OrderingError::LengthMismatch {
            expected: n,
            actual: permutation.len(),
        });
    }

    // With the lengths equal, "no repeats and all in range" is the same as
    // "value set == {1..n}".
    let mut seen = vec![false; n];
    for &k in permutation {
        if k == 0 || k > n || seen[k - 1] {
            return Err(OrderingError::NotAPermutation { n });
        }
        seen[k - 1] = true;
    }
    Ok(())
}

/// Reorder `images` so that `result[i] == images[permutation[i] - 1]`.
pub fn apply_order(images: &ImageSet, permutation: &[usize]) -> Result<ImageSet, OrderingError> {
    validate(permutation, images.len())?;
    let slice = images.as_slice();
    let reordered = permutation.iter().map(|&k| slice[k - 1].clone()).collect();
    Ok(ImageSet::from_ordered(reordered))
}
