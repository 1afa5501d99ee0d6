/// Errors surfaced by the protocol.
///
/// All of them are fatal for the game in progress: cryptographic games
/// either complete end-to-end or are discarded. None are retried, and
/// none carry secret material.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// A scalar encoding was out of range or the wrong size.
    #[error("Invalid scalar: {0}")]
    InvalidScalar(String),

    /// A card encoding was off-curve, non-canonical or the wrong size.
    #[error("Invalid card: {0}")]
    InvalidCard(String),

    /// A deck or roll violated the size or shape constraints.
    #[error("Invalid deck: {0}")]
    InvalidDeck(String),

    /// A wire message failed to parse.
    #[error("Malformed message: {0}")]
    MalformedMessage(String),

    /// A zero-knowledge check failed; blame lies with the proving peer.
    #[error("Verification failed: {0}")]
    VerificationFailed(&'static str),

    /// A fully decrypted card matched nothing in the initial deck,
    /// indicating either tampering or a bug.
    #[error("Decrypted card not present in the initial deck")]
    CardNotFound,

    /// A message arrived outside the expected protocol sequence.
    #[error("Protocol message out of order: {0}")]
    OutOfOrder(&'static str),
}
