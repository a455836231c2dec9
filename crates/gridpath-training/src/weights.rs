//! Weight vector operators for the genetic algorithm.
//!
//! Network weights are signed, so every operator keeps values inside the symmetric range
//! `[-max_weight, max_weight]`.
//!
//! - [`random`] - Uniform initialization
//! - [`blx_alpha`] - BLX-α crossover
//! - [`mutate`] - Gaussian mutation

use rand::Rng;
use rand_distr::Normal;

/// Draws `len` weights uniformly from `[-max_weight, max_weight]`.
pub fn random<R>(rng: &mut R, max_weight: f64, len: usize) -> Vec<f64>
where
    R: Rng + ?Sized,
{
    (0..len)
        .map(|_| rng.random_range(-max_weight..=max_weight))
        .collect()
}

/// BLX-α crossover.
///
/// For each position the child is drawn uniformly from the parents' interval widened by
/// `alpha` times its length on both sides, then clamped to `[-max_weight, max_weight]`.
///
/// # Panics
///
/// Panics if the parents have different lengths.
pub fn blx_alpha<R>(p1: &[f64], p2: &[f64], alpha: f64, max_weight: f64, rng: &mut R) -> Vec<f64>
where
    R: Rng + ?Sized,
{
    assert_eq!(p1.len(), p2.len());
    p1.iter()
        .zip(p2)
        .map(|(&x1, &x2)| {
            let min = f64::min(x1, x2);
            let max = f64::max(x1, x2);
            let d = max - min;
            rng.random_range((min - alpha * d)..=(max + alpha * d))
                .clamp(-max_weight, max_weight)
        })
        .collect()
}

/// Gaussian mutation in place.
///
/// Each weight is perturbed by `N(0, sigma)` with probability `rate` and clamped back into
/// `[-max_weight, max_weight]`.
///
/// # Panics
///
/// Panics if `sigma` is negative or not finite, or if `rate` is outside `[0, 1]`.
pub fn mutate<R>(weights: &mut [f64], sigma: f64, max_weight: f64, rate: f64, rng: &mut R)
where
    R: Rng + ?Sized,
{
    let normal = Normal::new(0.0, sigma).expect("mutation sigma must be finite and non-negative");
    for w in weights {
        if rng.random_bool(rate) {
            *w = (*w + rng.sample(normal)).clamp(-max_weight, max_weight);
        }
    }
}

#[cfg(test)]
mod tests {
    use rand::SeedableRng as _;
    use rand_pcg::Pcg32;

    use super::*;

    #[test]
    fn test_random_stays_in_range() {
        let mut rng = Pcg32::seed_from_u64(1);
        let weights = random(&mut rng, 2.0, 500);
        assert_eq!(weights.len(), 500);
        assert!(weights.iter().all(|w| (-2.0..=2.0).contains(w)));
        assert!(weights.iter().any(|w| *w < 0.0));
    }

    #[test]
    fn test_blx_alpha_zero_stays_between_parents() {
        let mut rng = Pcg32::seed_from_u64(2);
        let p1 = [-1.0, 0.0, 0.5];
        let p2 = [1.0, 0.0, -0.5];
        for _ in 0..100 {
            let child = blx_alpha(&p1, &p2, 0.0, 10.0, &mut rng);
            assert!((-1.0..=1.0).contains(&child[0]));
            assert_eq!(child[1], 0.0);
            assert!((-0.5..=0.5).contains(&child[2]));
        }
    }

    #[test]
    fn test_blx_alpha_is_clamped() {
        let mut rng = Pcg32::seed_from_u64(3);
        for _ in 0..100 {
            let child = blx_alpha(&[-1.0], &[1.0], 5.0, 1.5, &mut rng);
            assert!((-1.5..=1.5).contains(&child[0]));
        }
    }

    #[test]
    fn test_mutate_rate_bounds() {
        let mut rng = Pcg32::seed_from_u64(4);
        let mut untouched = vec![0.25; 50];
        mutate(&mut untouched, 1.0, 1.0, 0.0, &mut rng);
        assert!(untouched.iter().all(|w| *w == 0.25));

        let mut mutated = vec![0.25; 50];
        mutate(&mut mutated, 1.0, 1.0, 1.0, &mut rng);
        assert!(mutated.iter().any(|w| *w != 0.25));
        assert!(mutated.iter().all(|w| (-1.0..=1.0).contains(w)));
    }
}
