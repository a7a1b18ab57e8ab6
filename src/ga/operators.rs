//! Genetic operators for the (permutation, bit vector) encoding.
//!
//! Permutations are `&[usize]` index vectors over `0..n`; bit vectors are
//! `&[bool]` of the same length.
//!
//! # Crossover Operators
//!
//! - [`order_crossover`] (OX): Davis (1985), preserves relative order
//! - [`uniform_crossover`]: per-position choice between parents
//!
//! # Mutation Operators
//!
//! - [`swap_mutation`]: exchange two distinct positions
//! - [`flip_bits`]: independent per-bit flips
//!
//! # References
//!
//! - Davis (1985), "Applying Adaptive Algorithms to Epistatic Domains"
//! - Syswerda (1989), "Uniform Crossover in Genetic Algorithms"

use rand::Rng;

// ============================================================================
// Crossover operators
// ============================================================================

/// Order Crossover (OX) producing a single child.
///
/// 1. Pick two distinct positions `a < b`
/// 2. Copy `parent1[a..=b]` to the same positions of the child
/// 3. Fill the remaining positions left to right with the elements of
///    `parent2` in their order, skipping those already copied
///
/// # Panics
/// Panics if parents have different lengths or are empty.
pub fn order_crossover<R: Rng>(parent1: &[usize], parent2: &[usize], rng: &mut R) -> Vec<usize> {
    let n = parent1.len();
    assert_eq!(n, parent2.len(), "parents must have equal length");
    assert!(n > 0, "parents must not be empty");

    if n == 1 {
        return parent1.to_vec();
    }

    let (start, end) = distinct_pair(n, rng);
    ox_build_child(parent1, parent2, start, end)
}

/// Build one OX child: copy `template[start..=end]`, fill from `donor`.
fn ox_build_child(template: &[usize], donor: &[usize], start: usize, end: usize) -> Vec<usize> {
    let n = template.len();
    let mut child = vec![usize::MAX; n];
    let mut in_segment = vec![false; n];

    for i in start..=end {
        child[i] = template[i];
        in_segment[template[i]] = true;
    }

    let mut fill = donor.iter().copied().filter(|&v| !in_segment[v]);
    for slot in child.iter_mut().filter(|v| **v == usize::MAX) {
        if let Some(v) = fill.next() {
            *slot = v;
        }
    }

    child
}

/// Uniform crossover: each position comes from either parent with equal probability.
///
/// # Panics
/// Panics if parents have different lengths.
pub fn uniform_crossover<R: Rng>(parent1: &[bool], parent2: &[bool], rng: &mut R) -> Vec<bool> {
    assert_eq!(
        parent1.len(),
        parent2.len(),
        "parents must have equal length"
    );
    parent1
        .iter()
        .zip(parent2)
        .map(|(&a, &b)| if rng.random_bool(0.5) { a } else { b })
        .collect()
}

// ============================================================================
// Mutation operators
// ============================================================================

/// Swap mutation: exchange two distinct random positions.
///
/// No-op for permutations shorter than 2.
pub fn swap_mutation<R: Rng>(perm: &mut [usize], rng: &mut R) {
    if perm.len() < 2 {
        return;
    }
    let (i, j) = distinct_pair(perm.len(), rng);
    perm.swap(i, j);
}

/// Flips each bit independently with probability `rate`.
///
/// Returns the number of flipped bits.
pub fn flip_bits<R: Rng>(bits: &mut [bool], rate: f64, rng: &mut R) -> usize {
    let rate = rate.clamp(0.0, 1.0);
    let mut flipped = 0;
    for bit in bits.iter_mut() {
        if rng.random_bool(rate) {
            *bit = !*bit;
            flipped += 1;
        }
    }
    flipped
}

// ============================================================================
// Helpers
// ============================================================================

/// Two distinct positions in `0..n`, returned as `(low, high)`.
///
/// Requires `n >= 2`.
pub(crate) fn distinct_pair<R: Rng>(n: usize, rng: &mut R) -> (usize, usize) {
    let a = rng.random_range(0..n);
    let mut b = rng.random_range(0..n - 1);
    if b >= a {
        b += 1;
    }
    (a.min(b), a.max(b))
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::random::create_rng;
    use std::collections::HashSet;

    fn is_valid_permutation(perm: &[usize], n: usize) -> bool {
        if perm.len() != n {
            return false;
        }
        let set: HashSet<usize> = perm.iter().copied().collect();
        set.len() == n && perm.iter().all(|&v| v < n)
    }

    // ---- OX ----

    #[test]
    fn test_ox_produces_valid_permutations() {
        let mut rng = create_rng(42);
        let p1 = vec![0, 1, 2, 3, 4, 5, 6, 7];
        let p2 = vec![7, 6, 5, 4, 3, 2, 1, 0];

        for _ in 0..100 {
            let child = order_crossover(&p1, &p2, &mut rng);
            assert!(is_valid_permutation(&child, 8), "OX child not valid: {child:?}");
        }
    }

    #[test]
    fn test_ox_fills_left_to_right_in_donor_order() {
        // Segment [2, 3] from p1 = {2, 3}; remaining donor order is 6,5,4,1,0
        let child = ox_build_child(&[0, 1, 2, 3, 4, 5, 6], &[6, 5, 4, 3, 2, 1, 0], 2, 3);
        assert_eq!(child, vec![6, 5, 2, 3, 4, 1, 0]);
    }

    #[test]
    fn test_ox_keeps_a_segment_of_parent1() {
        let mut rng = create_rng(123);
        let p1 = vec![0, 1, 2, 3, 4];
        let p2 = vec![4, 3, 2, 1, 0];
        for _ in 0..50 {
            let child = order_crossover(&p1, &p2, &mut rng);
            // At least two adjacent positions are copied verbatim.
            let kept = child
                .windows(2)
                .zip(p1.windows(2))
                .any(|(c, p)| c == p);
            assert!(kept, "no parent1 segment in {child:?}");
        }
    }

    #[test]
    fn test_ox_single_element() {
        let mut rng = create_rng(42);
        assert_eq!(order_crossover(&[0], &[0], &mut rng), vec![0]);
    }

    // ---- Uniform ----

    #[test]
    fn test_uniform_crossover_takes_from_parents() {
        let mut rng = create_rng(7);
        let a = vec![true; 16];
        let b = vec![false; 16];
        let child = uniform_crossover(&a, &b, &mut rng);
        assert_eq!(child.len(), 16);
        assert!(child.iter().any(|&x| x));
        assert!(child.iter().any(|&x| !x));

        let same = uniform_crossover(&a, &a, &mut rng);
        assert_eq!(same, a);
    }

    // ---- Mutation ----

    #[test]
    fn test_swap_changes_exactly_two_positions() {
        let mut rng = create_rng(42);
        for _ in 0..50 {
            let mut perm: Vec<usize> = (0..6).collect();
            swap_mutation(&mut perm, &mut rng);
            let moved = perm.iter().enumerate().filter(|&(i, &v)| i != v).count();
            assert_eq!(moved, 2);
            assert!(is_valid_permutation(&perm, 6));
        }
    }

    #[test]
    fn test_swap_short_permutation_is_noop() {
        let mut rng = create_rng(42);
        let mut perm = vec![0];
        swap_mutation(&mut perm, &mut rng);
        assert_eq!(perm, vec![0]);
    }

    #[test]
    fn test_flip_bits_rates() {
        let mut rng = create_rng(42);
        let mut bits = vec![false; 32];
        assert_eq!(flip_bits(&mut bits, 0.0, &mut rng), 0);
        assert_eq!(flip_bits(&mut bits, 1.0, &mut rng), 32);
        assert!(bits.iter().all(|&b| b));
    }

    #[test]
    fn test_distinct_pair() {
        let mut rng = create_rng(9);
        for _ in 0..200 {
            let (a, b) = distinct_pair(3, &mut rng);
            assert!(a < b && b < 3);
        }
    }
}
