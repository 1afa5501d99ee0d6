use rand_core::CryptoRngCore;
use zeroize::Zeroize;

use crate::{Error, Result};

use super::deck::MAX_DECK_SIZE;

/// Samples a uniform index in `[0, bound)` by rejection.
///
/// Plain `next_u32() % bound` is biased for bounds that don't divide 2³²;
/// rejecting draws above the largest multiple of `bound` removes it.
fn uniform_index<R: CryptoRngCore>(rng: &mut R, bound: u32) -> u32 {
    debug_assert!(bound > 0);
    let zone = ((1u64 << 32) / u64::from(bound)) * u64::from(bound);
    loop {
        let v = u64::from(rng.next_u32());
        if v < zone {
            return (v % u64::from(bound)) as u32;
        }
    }
}

/// A permutation of deck positions, stored as a dense index array.
///
/// Entry `i` holds `π(i)`; one byte per index since decks are capped at
/// 255 cards. The deck permutation `π` is secret until its game ends, so
/// the buffer is zeroized on drop.
#[derive(Clone, Debug, PartialEq, Eq, Zeroize)]
#[zeroize(drop)]
pub struct Permutation(Vec<u8>);

impl Permutation {
    /// The identity permutation on `n` positions.
    pub fn identity(n: usize) -> Result<Self> {
        if n == 0 || n > MAX_DECK_SIZE {
            return Err(Error::InvalidDeck(format!(
                "permutation size {} outside 1..={}",
                n, MAX_DECK_SIZE
            )));
        }
        Ok(Self((0..n as u8).collect()))
    }

    /// Samples a permutation uniformly from `S_n` via Fisher–Yates.
    pub fn random<R: CryptoRngCore>(n: usize, rng: &mut R) -> Result<Self> {
        let mut perm = Self::identity(n)?;
        for i in 0..n {
            let j = uniform_index(rng, (i + 1) as u32) as usize;
            perm.0.swap(i, j);
        }
        Ok(perm)
    }

    /// Parses a permutation received from the peer, rejecting any index
    /// vector that is not a bijection on `0..len`.
    pub fn from_bytes(bytes: &[u8]) -> Result<Self> {
        let n = bytes.len();
        if n == 0 || n > MAX_DECK_SIZE {
            return Err(Error::MalformedMessage(format!(
                "permutation size {} outside 1..={}",
                n, MAX_DECK_SIZE
            )));
        }
        let mut seen = [false; MAX_DECK_SIZE];
        for &idx in bytes {
            if usize::from(idx) >= n || seen[usize::from(idx)] {
                return Err(Error::MalformedMessage(
                    "index vector is not a permutation".to_string(),
                ));
            }
            seen[usize::from(idx)] = true;
        }
        Ok(Self(bytes.to_vec()))
    }

    /// Number of positions.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Always false; empty permutations are rejected at construction.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// `π(i)`.
    pub fn index(&self, i: usize) -> usize {
        usize::from(self.0[i])
    }

    /// The raw index bytes, one per position.
    pub fn as_bytes(&self) -> &[u8] {
        &self.0
    }

    /// Composition `self ∘ inner`: position `i` maps to `self(inner(i))`.
    ///
    /// This is the combined permutation revealed on an input-side shuffle
    /// challenge: the deck relation `input → deck → commitment` collapses
    /// to `input → commitment` under `π∘σ`.
    pub fn compose(&self, inner: &Permutation) -> Permutation {
        debug_assert_eq!(self.len(), inner.len());
        Permutation(inner.0.iter().map(|&j| self.0[usize::from(j)]).collect())
    }

    /// Applies the permutation: output position `i` receives `items[π(i)]`.
    pub fn apply<T: Clone>(&self, items: &[T]) -> Vec<T> {
        debug_assert_eq!(self.len(), items.len());
        self.0
            .iter()
            .map(|&j| items[usize::from(j)].clone())
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::SecureRng;

    #[test]
    fn random_permutation_is_bijective() {
        let mut rng = SecureRng::new();
        let perm = Permutation::random(52, &mut rng).unwrap();

        let mut seen = [false; 52];
        for i in 0..52 {
            seen[perm.index(i)] = true;
        }
        assert!(seen.iter().all(|&s| s));
    }

    #[test]
    fn compose_matches_pointwise_application() {
        let mut rng = SecureRng::new();
        let pi = Permutation::random(10, &mut rng).unwrap();
        let sigma = Permutation::random(10, &mut rng).unwrap();

        let combined = pi.compose(&sigma);
        for i in 0..10 {
            assert_eq!(combined.index(i), pi.index(sigma.index(i)));
        }
    }

    #[test]
    fn apply_composes_like_indices() {
        let mut rng = SecureRng::new();
        let pi = Permutation::random(8, &mut rng).unwrap();
        let sigma = Permutation::random(8, &mut rng).unwrap();
        let items: Vec<u32> = (0..8).collect();

        // out[i] = pi.apply(items)[sigma(i)] = items[pi(sigma(i))]
        let two_step = sigma.apply(&pi.apply(&items));
        let one_step = pi.compose(&sigma).apply(&items);
        assert_eq!(two_step, one_step);
    }

    #[test]
    fn from_bytes_rejects_non_bijections() {
        assert!(Permutation::from_bytes(&[]).is_err());
        assert!(Permutation::from_bytes(&[0, 0]).is_err());
        assert!(Permutation::from_bytes(&[0, 2]).is_err());
        assert!(Permutation::from_bytes(&[1, 0]).is_ok());
    }

    #[test]
    fn size_bounds() {
        assert!(Permutation::identity(0).is_err());
        assert!(Permutation::identity(1).is_ok());
        assert!(Permutation::identity(255).is_ok());
        assert!(Permutation::identity(256).is_err());
    }

    #[test]
    fn uniform_index_stays_in_bounds() {
        let mut rng = SecureRng::new();
        for bound in [1u32, 2, 3, 52, 255] {
            for _ in 0..100 {
                assert!(uniform_index(&mut rng, bound) < bound);
            }
        }
    }
}
