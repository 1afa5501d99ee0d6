/// Deck initialization: per-party rolls and the combined initial deck.
pub mod deck;
/// Private keys for commutative card encryption.
pub mod keys;
/// Deck permutations and uniform sampling.
pub mod permutation;
/// Card reveal with a Chaum-Pedersen proof of honest decryption.
pub mod reveal;
/// Shuffle-and-encrypt with a cut-and-choose proof.
pub mod shuffle;
/// Merlin transcript for the non-interactive reveal proof.
pub mod transcript;
/// Byte-level wire formats for the protocol messages.
pub mod wire;

pub use deck::{DeckRoll, InitialDeck, RollCommitment, MAX_DECK_SIZE};
pub use keys::PrivateKey;
pub use permutation::Permutation;
pub use reveal::{
    decrypt_card, RevealCommitment, RevealNonce, RevealProof, RevealProver, RevealResponse,
    RevealStatement, RevealVerifier,
};
pub use shuffle::{
    check_round, RoundCommitment, RoundOpening, ShuffleChallenge, ShuffleProver, ShuffleVerifier,
    RECOMMENDED_ROUNDS,
};
pub use transcript::Transcript;
pub use wire::Message;
