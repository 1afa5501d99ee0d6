use core::fmt::Debug;

use rand_core::CryptoRngCore;
use serde::{Deserialize, Serialize};
use zeroize::Zeroize;

use crate::Result;

/// Prime-order group over which the mental poker protocol runs.
///
/// Cards are elements of the group; commutative encryption is scalar
/// multiplication. The protocol relies on three algebraic identities:
///
/// - commutativity: `a·(b·P) = b·(a·P) = (a·b)·P`, which makes the
///   two-round shuffle sound regardless of who encrypts first;
/// - homomorphy under addition: `s·(P + Q) = s·P + s·Q`;
/// - inverse: `s⁻¹·(s·P) = P` for nonzero `s`.
///
/// Implementations must reject off-curve and non-canonical encodings in
/// `element_from_bytes`, and compare elements by the full point.
pub trait Group: Clone + Debug + Send + Sync + 'static {
    /// Scalars modulo the group order `q`.
    type Scalar: Clone
        + Debug
        + Eq
        + PartialEq
        + Zeroize
        + Serialize
        + for<'de> Deserialize<'de>
        + Send
        + Sync;
    /// Group elements, i.e. cards.
    type Element: Clone
        + Debug
        + Eq
        + PartialEq
        + Serialize
        + for<'de> Deserialize<'de>
        + Send
        + Sync;

    /// Human-readable backend name, also bound into proof transcripts.
    fn name() -> &'static str;

    /// The fixed generator `B` used for public keys and deck rolls.
    fn basepoint() -> Self::Element;

    /// The neutral element.
    fn identity() -> Self::Element;

    /// Whether an element is the neutral element.
    fn is_identity(element: &Self::Element) -> bool;

    /// Decodes a scalar, rejecting out-of-range or wrong-size input.
    fn scalar_from_bytes(b: &[u8]) -> Result<Self::Scalar>;

    /// Canonical fixed-width scalar encoding.
    fn scalar_to_bytes(s: &Self::Scalar) -> Vec<u8>;

    /// Decodes an element, rejecting anything outside the prime-order
    /// group.
    fn element_from_bytes(b: &[u8]) -> Result<Self::Element>;

    /// Compressed fixed-width element encoding.
    fn element_to_bytes(e: &Self::Element) -> Vec<u8>;

    /// Samples a scalar uniformly from `[0, q)`.
    fn random_scalar<R: CryptoRngCore>(rng: &mut R) -> Self::Scalar;

    /// Reduces 64 bytes of hash output to a uniform scalar.
    fn scalar_from_hash(wide: &[u8; 64]) -> Self::Scalar;

    /// `s·P` — encryption of a card under key `s`.
    fn scalar_mul(e: &Self::Element, s: &Self::Scalar) -> Self::Element;

    /// `P + Q`.
    fn element_add(a: &Self::Element, b: &Self::Element) -> Self::Element;

    /// `a + b mod q`.
    fn scalar_add(a: &Self::Scalar, b: &Self::Scalar) -> Self::Scalar;

    /// `a − b mod q`.
    fn scalar_sub(a: &Self::Scalar, b: &Self::Scalar) -> Self::Scalar;

    /// `a·b mod q` — key composition.
    fn scalar_mul_scalar(a: &Self::Scalar, b: &Self::Scalar) -> Self::Scalar;

    /// `k − c·s mod q` — the response form of the reveal proof.
    fn scalar_sub_product(k: &Self::Scalar, c: &Self::Scalar, s: &Self::Scalar) -> Self::Scalar;

    /// `s⁻¹ mod q`; `None` at zero.
    fn scalar_invert(s: &Self::Scalar) -> Option<Self::Scalar>;

    /// Whether a scalar is zero.
    fn scalar_is_zero(s: &Self::Scalar) -> bool;

    /// Checks that an element lies in the prime-order group.
    fn validate_element(e: &Self::Element) -> Result<()>;
}
