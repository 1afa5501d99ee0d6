use rand_core::CryptoRngCore;
use sha2::{Digest, Sha256};

use crate::{Error, Group, Result};

use super::keys::PrivateKey;

/// Permutations are exchanged as one byte per index, so decks are capped
/// at 255 cards.
pub const MAX_DECK_SIZE: usize = 255;

/// Domain separation tag for roll commitments.
const ROLL_COMMIT_DST: &[u8] = b"mental-poker-v1-roll-commitment";

pub(crate) fn check_deck_size(n: usize) -> Result<()> {
    if n == 0 || n > MAX_DECK_SIZE {
        return Err(Error::InvalidDeck(format!(
            "deck size {} outside 1..={}",
            n, MAX_DECK_SIZE
        )));
    }
    Ok(())
}

/// One party's contribution to the initial deck: `N` random basepoint
/// multiples whose scalars were discarded at generation.
///
/// Neither party controls any card of the combined deck, because each
/// combined card `R_A + R_B` has at least one uniformly random summand
/// unknown to the other party.
#[derive(Clone, Debug)]
pub struct DeckRoll<G: Group> {
    points: Vec<G::Element>,
}

impl<G: Group> DeckRoll<G> {
    /// Rolls `n` random points. The discrete logs are dropped immediately;
    /// nothing about a roll needs to stay secret once exchanged.
    pub fn random<R: CryptoRngCore>(n: usize, rng: &mut R) -> Result<Self> {
        check_deck_size(n)?;
        let points = (0..n)
            .map(|_| {
                let (_, point) = PrivateKey::<G>::generate(rng);
                point
            })
            .collect();
        Ok(Self { points })
    }

    /// Reassembles a roll received from the peer.
    pub fn from_points(points: Vec<G::Element>) -> Result<Self> {
        check_deck_size(points.len())?;
        Ok(Self { points })
    }

    /// The rolled points.
    pub fn points(&self) -> &[G::Element] {
        &self.points
    }

    /// Number of cards in the roll.
    pub fn len(&self) -> usize {
        self.points.len()
    }

    /// Always false; empty rolls are rejected at construction.
    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// Commits to this roll before revealing it.
    ///
    /// Exchanging commitments first stops the second mover from choosing
    /// their roll as a function of ours and steering individual cards of
    /// the combined deck.
    pub fn commitment(&self) -> RollCommitment {
        let mut hasher = Sha256::new();
        hasher.update(ROLL_COMMIT_DST);
        hasher.update([self.points.len() as u8]);
        for point in &self.points {
            hasher.update(G::element_to_bytes(point));
        }
        RollCommitment(hasher.finalize().into())
    }
}

/// Hash commitment to a [`DeckRoll`], exchanged before the roll itself.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct RollCommitment([u8; 32]);

impl RollCommitment {
    /// Checks a revealed roll against this commitment.
    pub fn matches<G: Group>(&self, roll: &DeckRoll<G>) -> bool {
        roll.commitment() == *self
    }

    /// The commitment digest.
    pub fn as_bytes(&self) -> &[u8; 32] {
        &self.0
    }

    /// Reconstructs a commitment received from the peer.
    pub fn from_bytes(bytes: [u8; 32]) -> Self {
        Self(bytes)
    }
}

/// The `N` plaintext cards both players agreed on.
///
/// Card `j` is `R_{A,j} + R_{B,j}`, uniform in the group from either
/// party's point of view. With overwhelming probability all cards are
/// pairwise distinct.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct InitialDeck<G: Group> {
    cards: Vec<G::Element>,
}

impl<G: Group> InitialDeck<G> {
    /// Combines the two parties' rolls into the shared deck.
    pub fn combine(local: &DeckRoll<G>, remote: &DeckRoll<G>) -> Result<Self> {
        if local.len() != remote.len() {
            return Err(Error::InvalidDeck(format!(
                "roll sizes differ: {} vs {}",
                local.len(),
                remote.len()
            )));
        }
        let cards = local
            .points()
            .iter()
            .zip(remote.points())
            .map(|(a, b)| G::element_add(a, b))
            .collect();
        Ok(Self { cards })
    }

    /// The plaintext cards, in agreed order.
    pub fn cards(&self) -> &[G::Element] {
        &self.cards
    }

    /// Number of cards.
    pub fn len(&self) -> usize {
        self.cards.len()
    }

    /// Always false; empty decks are rejected at construction.
    pub fn is_empty(&self) -> bool {
        self.cards.is_empty()
    }

    /// Looks up a fully decrypted card, returning its deck position.
    ///
    /// This resolves a drawn card to its identity. `Error::CardNotFound`
    /// means tampering or a protocol bug; the game must be aborted.
    pub fn position_of(&self, card: &G::Element) -> Result<usize> {
        self.cards
            .iter()
            .position(|c| c == card)
            .ok_or(Error::CardNotFound)
    }
}
