//! Ristretto255 group implementation.

use curve25519_dalek::constants::RISTRETTO_BASEPOINT_TABLE;
use curve25519_dalek::ristretto::{CompressedRistretto, RistrettoPoint};
use curve25519_dalek::scalar::Scalar as DalekScalar;
use curve25519_dalek::traits::Identity;
use rand_core::CryptoRngCore;
use serde::{Deserialize, Serialize};
use zeroize::Zeroize;

use crate::{Error, Group, Result};

/// Number of bytes in a Ristretto255 scalar or compressed element (32 bytes).
const RISTRETTO_BYTES: usize = 32;

/// Number of bytes used for wide scalar reduction (64 bytes).
const WIDE_REDUCTION_BYTES: usize = 64;

/// Ristretto255 group implementation.
///
/// The preferred backend: a prime-order group with no cofactor, so any
/// point that decompresses is a valid card.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Ristretto255;

/// Scalar in the Ristretto255 group.
///
/// Scalars are automatically zeroized when dropped.
#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize, Zeroize)]
#[zeroize(drop)]
pub struct Scalar(DalekScalar);

/// Element (point) in the Ristretto255 group.
#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub struct Element(RistrettoPoint);

impl Scalar {
    /// Creates a new scalar from a curve25519_dalek Scalar.
    pub fn new(value: DalekScalar) -> Self {
        Self(value)
    }

    /// Returns a reference to the inner curve25519_dalek Scalar.
    pub fn inner(&self) -> &DalekScalar {
        &self.0
    }
}

impl Element {
    /// Creates a new element from a RistrettoPoint.
    pub fn new(value: RistrettoPoint) -> Self {
        Self(value)
    }

    /// Returns a reference to the inner RistrettoPoint.
    pub fn inner(&self) -> &RistrettoPoint {
        &self.0
    }
}

impl Group for Ristretto255 {
    type Scalar = Scalar;
    type Element = Element;

    fn name() -> &'static str {
        "Ristretto255"
    }

    fn basepoint() -> Self::Element {
        Element(RISTRETTO_BASEPOINT_TABLE.basepoint())
    }

    fn identity() -> Self::Element {
        Element(RistrettoPoint::identity())
    }

    fn is_identity(element: &Self::Element) -> bool {
        element.0 == RistrettoPoint::identity()
    }

    fn scalar_from_bytes(bytes: &[u8]) -> Result<Self::Scalar> {
        if bytes.len() != RISTRETTO_BYTES {
            return Err(Error::InvalidScalar(format!(
                "expected {} bytes, got {}",
                RISTRETTO_BYTES,
                bytes.len()
            )));
        }

        let mut arr = [0u8; RISTRETTO_BYTES];
        arr.copy_from_slice(bytes);

        match DalekScalar::from_canonical_bytes(arr).into() {
            Some(scalar) => Ok(Scalar(scalar)),
            None => Err(Error::InvalidScalar(
                "bytes are not a canonical scalar".to_string(),
            )),
        }
    }

    fn scalar_to_bytes(scalar: &Self::Scalar) -> Vec<u8> {
        scalar.0.to_bytes().to_vec()
    }

    fn element_from_bytes(bytes: &[u8]) -> Result<Self::Element> {
        if bytes.len() != RISTRETTO_BYTES {
            return Err(Error::InvalidCard(format!(
                "expected {} bytes, got {}",
                RISTRETTO_BYTES,
                bytes.len()
            )));
        }

        let mut arr = [0u8; RISTRETTO_BYTES];
        arr.copy_from_slice(bytes);

        match CompressedRistretto(arr).decompress() {
            Some(point) => Ok(Element(point)),
            None => Err(Error::InvalidCard(
                "bytes are not a valid Ristretto point".to_string(),
            )),
        }
    }

    fn element_to_bytes(element: &Self::Element) -> Vec<u8> {
        element.0.compress().to_bytes().to_vec()
    }

    fn random_scalar<R: CryptoRngCore>(rng: &mut R) -> Self::Scalar {
        let mut bytes = [0u8; WIDE_REDUCTION_BYTES];
        rng.fill_bytes(&mut bytes);
        Scalar(DalekScalar::from_bytes_mod_order_wide(&bytes))
    }

    fn scalar_from_hash(wide: &[u8; 64]) -> Self::Scalar {
        Scalar(DalekScalar::from_bytes_mod_order_wide(wide))
    }

    fn scalar_mul(element: &Self::Element, scalar: &Self::Scalar) -> Self::Element {
        Element(element.0 * scalar.0)
    }

    fn element_add(a: &Self::Element, b: &Self::Element) -> Self::Element {
        Element(a.0 + b.0)
    }

    fn scalar_add(a: &Self::Scalar, b: &Self::Scalar) -> Self::Scalar {
        Scalar(a.0 + b.0)
    }

    fn scalar_sub(a: &Self::Scalar, b: &Self::Scalar) -> Self::Scalar {
        Scalar(a.0 - b.0)
    }

    fn scalar_mul_scalar(a: &Self::Scalar, b: &Self::Scalar) -> Self::Scalar {
        Scalar(a.0 * b.0)
    }

    fn scalar_sub_product(k: &Self::Scalar, c: &Self::Scalar, s: &Self::Scalar) -> Self::Scalar {
        Scalar(k.0 - c.0 * s.0)
    }

    fn scalar_invert(scalar: &Self::Scalar) -> Option<Self::Scalar> {
        if Self::scalar_is_zero(scalar) {
            None
        } else {
            Some(Scalar(scalar.0.invert()))
        }
    }

    fn scalar_is_zero(scalar: &Self::Scalar) -> bool {
        scalar.0 == DalekScalar::ZERO
    }

    fn validate_element(_element: &Self::Element) -> Result<()> {
        Ok(())
    }
}
