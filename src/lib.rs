//! # Two-Party Mental Poker
//!
//! ## Overview
//!
//! A cryptographic protocol engine that lets two mutually distrustful
//! players jointly create, shuffle and draw from a deck of up to 255
//! unique cards, such that neither player alone knows which card sits at
//! which position, and every shuffle and every reveal comes with a
//! zero-knowledge proof of honesty.
//!
//! Cards are points in a prime-order group; encryption is scalar
//! multiplication, which commutes, so the two players can layer their
//! encryptions in either order. Three proofs hold the protocol together:
//!
//! - a **cut-and-choose** proof (soundness `2⁻ᴷ` over K rounds) that a
//!   published deck really is a shuffle-and-encryption of its input,
//! - a **Chaum-Pedersen** proof that a partial decryption used the same
//!   private key as the decrypter's public key,
//! - a hash **commitment** on each party's deck-initialization roll, so
//!   neither side can steer the card values.
//!
//! ## Quick start
//!
//! ```rust
//! use mental_poker::{
//!     DeckRoll, InitialDeck, Ristretto255, SecureRng, ShuffleProver, ShuffleVerifier,
//! };
//!
//! let mut rng = SecureRng::new();
//!
//! // Both players roll, then combine into the shared deck.
//! let roll_a = DeckRoll::<Ristretto255>::random(4, &mut rng).unwrap();
//! let roll_b = DeckRoll::<Ristretto255>::random(4, &mut rng).unwrap();
//! let deck = InitialDeck::combine(&roll_a, &roll_b).unwrap();
//!
//! // Player A shuffles and proves it over 8 cut-and-choose rounds.
//! let mut prover = ShuffleProver::<Ristretto255>::shuffle(deck.cards(), &mut rng).unwrap();
//! let mut verifier = ShuffleVerifier::<Ristretto255>::new(deck.cards(), prover.deck()).unwrap();
//! for _ in 0..8 {
//!     let commitment = prover.commit(&mut rng).unwrap();
//!     let challenge = verifier.challenge(commitment, &mut rng).unwrap();
//!     let opening = prover.open(challenge).unwrap();
//!     verifier.check(&opening).unwrap();
//! }
//! assert_eq!(verifier.accepted_rounds(), 8);
//! ```
//!
//! ## Security considerations
//!
//! - **Group selection**: use [`Ristretto255`] unless a NIST curve is
//!   required; it is prime-order by construction, so decoded points need
//!   no subgroup checks.
//! - **Commit before challenge**: a shuffle-proof challenge bit must only
//!   be sampled after the round's commitment has arrived. The
//!   [`ShuffleVerifier`] API enforces this ordering.
//! - **Key freshness**: every shuffle round uses a fresh key; keys,
//!   nonces and permutations are zeroized when dropped.
//! - **Abort on failure**: every verification error is fatal for the
//!   game. Nothing is retried.

#![forbid(unsafe_code)]
#![warn(missing_docs, clippy::all)]

/// Cryptographic primitives and traits.
pub mod crypto;
/// Error types for the library.
pub mod error;
/// Group implementations backing the protocol.
pub mod groups;
/// The mental poker protocol: deck setup, shuffle and reveal.
pub mod protocol;

pub use crypto::{Group, SecureRng};
pub use error::Error;
pub use groups::{Ristretto255, P256};
pub use protocol::{
    check_round, decrypt_card, DeckRoll, InitialDeck, Message, Permutation, PrivateKey,
    RevealCommitment, RevealNonce, RevealProof, RevealProver, RevealResponse, RevealStatement,
    RevealVerifier, RollCommitment, RoundCommitment, RoundOpening, ShuffleChallenge,
    ShuffleProver, ShuffleVerifier, Transcript, MAX_DECK_SIZE, RECOMMENDED_ROUNDS,
};

/// A specialized Result type for protocol operations.
pub type Result<T> = core::result::Result<T, Error>;
