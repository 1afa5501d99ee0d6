use rand_core::CryptoRngCore;
use zeroize::{Zeroize, ZeroizeOnDrop};

use crate::Group;

/// Private key for commutative card encryption.
///
/// Holds the scalar `s` together with `s⁻¹ mod q`, cached at generation
/// because every partial decryption needs it. Both are zeroized on drop.
///
/// # Security
///
/// A key is scoped to one shuffle round of one game and must never be
/// reused across games.
#[derive(Clone, Debug, Zeroize, ZeroizeOnDrop)]
pub struct PrivateKey<G: Group> {
    scalar: G::Scalar,
    inverse: G::Scalar,
}

impl<G: Group> PrivateKey<G> {
    /// Generates a key pair: the private key and the public key `s·B`.
    ///
    /// The scalar is sampled uniformly and resampled on the (negligible
    /// probability) zero draw, so the inverse always exists.
    pub fn generate<R: CryptoRngCore>(rng: &mut R) -> (Self, G::Element) {
        let scalar = loop {
            let candidate = G::random_scalar(rng);
            if !G::scalar_is_zero(&candidate) {
                break candidate;
            }
        };
        let inverse = G::scalar_invert(&scalar)
            .unwrap_or_else(|| unreachable!("nonzero scalar is invertible"));
        let public = G::scalar_mul(&G::basepoint(), &scalar);

        (Self { scalar, inverse }, public)
    }

    /// Returns the private scalar `s`.
    pub fn scalar(&self) -> &G::Scalar {
        &self.scalar
    }

    /// Returns the cached inverse `s⁻¹ mod q`.
    pub fn inverse(&self) -> &G::Scalar {
        &self.inverse
    }

    /// Recomputes the public key `s·B`.
    pub fn public_key(&self) -> G::Element {
        G::scalar_mul(&G::basepoint(), &self.scalar)
    }
}
