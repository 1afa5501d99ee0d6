//! Fiat-Shamir transcript for the non-interactive reveal proof.
//!
//! Domain-separated challenge generation using Merlin. The challenge
//! binds the basepoint, the full statement and the commitment, so a proof
//! cannot be replayed against a different card or public key.

use merlin::Transcript as MerlinTranscript;

use crate::Group;

/// Protocol label for transcript initialization.
const PROTOCOL_LABEL: &[u8] = b"mental-poker reveal v1";

/// Domain separation tag for challenge generation.
const CHALLENGE_DST: &[u8] = b"challenge";

/// Number of bytes hashed into a challenge scalar.
const WIDE_REDUCTION_BYTES: usize = 64;

/// Transcript wrapper for the Fiat-Shamir transformation.
pub struct Transcript(MerlinTranscript);

impl Transcript {
    /// Creates a new transcript for the reveal proof.
    pub fn new() -> Self {
        Self(MerlinTranscript::new(PROTOCOL_LABEL))
    }

    /// Appends application context, e.g. a game or session identifier.
    ///
    /// Both sides must append the same context or verification fails;
    /// this stops proofs from one game being replayed in another.
    pub fn append_context(&mut self, context: &[u8]) {
        self.0.append_message(b"context", context);
    }

    /// Appends the group name.
    pub fn append_group_name(&mut self, name: &str) {
        self.0.append_message(b"group", name.as_bytes());
    }

    /// Appends the statement: basepoint, public key, card and its partial
    /// decryption.
    pub fn append_statement(&mut self, base: &[u8], public_key: &[u8], card: &[u8], decrypted: &[u8]) {
        self.0.append_message(b"base", base);
        self.0.append_message(b"public-key", public_key);
        self.0.append_message(b"card", card);
        self.0.append_message(b"decrypted", decrypted);
    }

    /// Appends the commitment pair.
    pub fn append_commitment(&mut self, r1: &[u8], r2: &[u8]) {
        self.0.append_message(b"r1", r1);
        self.0.append_message(b"r2", r2);
    }

    /// Squeezes the challenge scalar, reduced uniformly per backend.
    pub fn challenge_scalar<G: Group>(&mut self) -> G::Scalar {
        let mut buf = [0u8; WIDE_REDUCTION_BYTES];
        self.0.challenge_bytes(CHALLENGE_DST, &mut buf);
        G::scalar_from_hash(&buf)
    }
}

impl Default for Transcript {
    fn default() -> Self {
        Self::new()
    }
}
