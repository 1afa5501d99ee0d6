pub mod p256;
pub mod ristretto;

pub use p256::P256;
pub use ristretto::Ristretto255;
