//! Shuffle-and-encrypt with a cut-and-choose proof of correctness.
//!
//! The shuffler publishes `D′` with `D′_i = s·D_{π(i)}` and then proves,
//! over K rounds, that some `(s, π)` relates the two decks. Each round the
//! shuffler commits to an auxiliary deck `P_i = x_i·D′_{σ_i(j)}` and the
//! verifier picks which side to open: the output side `(x_i, σ_i)` or the
//! input side `(s·x_i, π∘σ_i)`. A shuffler whose `D′` is not a valid
//! shuffle-encryption of `D` can answer at most one of the two, so K
//! rounds leave a cheating-acceptance probability of at most `2⁻ᴷ`.

use rand_core::CryptoRngCore;
use zeroize::{Zeroize, ZeroizeOnDrop};

use crate::{Error, Group, Result};

use super::keys::PrivateKey;
use super::permutation::Permutation;

/// Number of proof rounds recommended for production use (soundness 2⁻⁸⁰).
pub const RECOMMENDED_ROUNDS: usize = 80;

/// The verifier's coin for one proof round.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ShuffleChallenge {
    /// Open `(x_i, σ_i)`: the commitment is a shuffle-encryption of the
    /// output deck.
    Output,
    /// Open `(s·x_i, π∘σ_i)`: the commitment is a shuffle-encryption of
    /// the input deck.
    Input,
}

impl ShuffleChallenge {
    /// Samples a uniform challenge bit.
    pub fn random<R: CryptoRngCore>(rng: &mut R) -> Self {
        if rng.next_u32() & 1 == 0 {
            Self::Output
        } else {
            Self::Input
        }
    }

    /// Wire encoding: 0 opens the output side, 1 the input side.
    pub fn to_byte(self) -> u8 {
        match self {
            Self::Output => 0,
            Self::Input => 1,
        }
    }

    /// Parses a challenge byte.
    pub fn from_byte(byte: u8) -> Result<Self> {
        match byte {
            0 => Ok(Self::Output),
            1 => Ok(Self::Input),
            other => Err(Error::MalformedMessage(format!(
                "challenge byte {} not in {{0, 1}}",
                other
            ))),
        }
    }
}

/// The auxiliary deck `P_i` committed at the start of a proof round.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RoundCommitment<G: Group> {
    cards: Vec<G::Element>,
}

impl<G: Group> RoundCommitment<G> {
    /// Reassembles a commitment received from the peer.
    pub fn from_cards(cards: Vec<G::Element>) -> Self {
        Self { cards }
    }

    /// The committed cards.
    pub fn cards(&self) -> &[G::Element] {
        &self.cards
    }
}

/// The shuffler's answer to one challenge: a composite key and the
/// permutation that reproduce the committed deck from the chosen side.
#[derive(Clone, Debug)]
pub struct RoundOpening<G: Group> {
    key: G::Scalar,
    shuffle: Permutation,
}

impl<G: Group> RoundOpening<G> {
    /// Reassembles an opening received from the peer.
    pub fn new(key: G::Scalar, shuffle: Permutation) -> Self {
        Self { key, shuffle }
    }

    /// `x_i` on an output challenge, `s·x_i` on an input challenge.
    pub fn key(&self) -> &G::Scalar {
        &self.key
    }

    /// `σ_i` on an output challenge, `π∘σ_i` on an input challenge.
    pub fn shuffle(&self) -> &Permutation {
        &self.shuffle
    }
}

/// Per-round secrets held between commit and reveal.
#[derive(Zeroize, ZeroizeOnDrop)]
struct RoundSecret<G: Group> {
    blind: G::Scalar,
    shuffle: Permutation,
}

/// Shuffler side of shuffle-and-encrypt plus its proof.
///
/// Holds the shuffle transcript — the deck key `s`, the permutation `π`,
/// and the open round's `(x_i, σ_i)` — none of which leave this value.
/// The state machine is `Idle → Committed → Revealed` per round:
/// [`commit`](Self::commit) is rejected while a round is open, and
/// [`open`](Self::open) is rejected when none is.
pub struct ShuffleProver<G: Group> {
    deck: Vec<G::Element>,
    key: PrivateKey<G>,
    permutation: Permutation,
    round: Option<RoundSecret<G>>,
}

impl<G: Group> ShuffleProver<G> {
    /// Shuffles and encrypts `input` under a fresh key and a uniform
    /// permutation, producing the published output deck.
    pub fn shuffle<R: CryptoRngCore>(input: &[G::Element], rng: &mut R) -> Result<Self> {
        let permutation = Permutation::random(input.len(), rng)?;
        let (key, _) = PrivateKey::generate(rng);
        let deck = (0..input.len())
            .map(|i| G::scalar_mul(&input[permutation.index(i)], key.scalar()))
            .collect();
        Ok(Self {
            deck,
            key,
            permutation,
            round: None,
        })
    }

    /// The output deck `D′` to publish to the verifier.
    pub fn deck(&self) -> &[G::Element] {
        &self.deck
    }

    /// Starts a proof round: samples `(x_i, σ_i)` and returns the
    /// commitment `P_i` with `(P_i)_j = x_i·D′_{σ_i(j)}`.
    ///
    /// The previous round must have been opened first; in a networked
    /// setting this forces the shuffler to wait for the challenge bit.
    pub fn commit<R: CryptoRngCore>(&mut self, rng: &mut R) -> Result<RoundCommitment<G>> {
        if self.round.is_some() {
            return Err(Error::OutOfOrder("commit while a proof round is open"));
        }
        let blind = G::random_scalar(rng);
        let shuffle = Permutation::random(self.deck.len(), rng)?;
        let cards = (0..self.deck.len())
            .map(|j| G::scalar_mul(&self.deck[shuffle.index(j)], &blind))
            .collect();
        self.round = Some(RoundSecret { blind, shuffle });
        Ok(RoundCommitment { cards })
    }

    /// Answers the verifier's challenge for the open round.
    pub fn open(&mut self, challenge: ShuffleChallenge) -> Result<RoundOpening<G>> {
        let round = self
            .round
            .take()
            .ok_or(Error::OutOfOrder("open without a committed round"))?;
        let opening = match challenge {
            ShuffleChallenge::Output => RoundOpening {
                key: round.blind.clone(),
                shuffle: round.shuffle.clone(),
            },
            ShuffleChallenge::Input => RoundOpening {
                key: G::scalar_mul_scalar(self.key.scalar(), &round.blind),
                shuffle: self.permutation.compose(&round.shuffle),
            },
        };
        Ok(opening)
    }

    /// Surrenders the deck key once the proof is done; the reveal phase
    /// needs it for partial decryption.
    pub fn into_key(self) -> PrivateKey<G> {
        self.key
    }
}

/// Verifier side of the cut-and-choose proof.
///
/// The challenge bit is sampled only after the round's commitment is in
/// hand, and [`check`](Self::check) is rejected without a pending
/// challenge, so the commit-before-challenge ordering is structural.
pub struct ShuffleVerifier<G: Group> {
    input: Vec<G::Element>,
    output: Vec<G::Element>,
    pending: Option<(RoundCommitment<G>, ShuffleChallenge)>,
    accepted: usize,
}

impl<G: Group> ShuffleVerifier<G> {
    /// Creates a verifier for the claim that `output` is a
    /// shuffle-encryption of `input`.
    pub fn new(input: &[G::Element], output: &[G::Element]) -> Result<Self> {
        super::deck::check_deck_size(input.len())?;
        if input.len() != output.len() {
            return Err(Error::InvalidDeck(format!(
                "deck sizes differ: {} vs {}",
                input.len(),
                output.len()
            )));
        }
        Ok(Self {
            input: input.to_vec(),
            output: output.to_vec(),
            pending: None,
            accepted: 0,
        })
    }

    /// Accepts a round commitment and returns a fresh challenge bit.
    pub fn challenge<R: CryptoRngCore>(
        &mut self,
        commitment: RoundCommitment<G>,
        rng: &mut R,
    ) -> Result<ShuffleChallenge> {
        if self.pending.is_some() {
            return Err(Error::OutOfOrder("challenge while a round is pending"));
        }
        if commitment.cards().len() != self.input.len() {
            return Err(Error::VerificationFailed("round commitment size mismatch"));
        }
        let challenge = ShuffleChallenge::random(rng);
        self.pending = Some((commitment, challenge));
        Ok(challenge)
    }

    /// Checks the opening of the pending round.
    pub fn check(&mut self, opening: &RoundOpening<G>) -> Result<()> {
        let (commitment, challenge) = self
            .pending
            .take()
            .ok_or(Error::OutOfOrder("check without a pending challenge"))?;
        check_round(&self.input, &self.output, &commitment, challenge, opening)?;
        self.accepted += 1;
        Ok(())
    }

    /// Number of rounds accepted so far. Soundness is `2^-accepted`.
    pub fn accepted_rounds(&self) -> usize {
        self.accepted
    }
}

/// Verifies one round: every committed card must equal the opened key
/// times the challenged deck at the opened permutation's position.
pub fn check_round<G: Group>(
    input: &[G::Element],
    output: &[G::Element],
    commitment: &RoundCommitment<G>,
    challenge: ShuffleChallenge,
    opening: &RoundOpening<G>,
) -> Result<()> {
    let base = match challenge {
        ShuffleChallenge::Output => output,
        ShuffleChallenge::Input => input,
    };
    if commitment.cards().len() != base.len() || opening.shuffle().len() != base.len() {
        return Err(Error::VerificationFailed("shuffle opening size mismatch"));
    }
    for (j, committed) in commitment.cards().iter().enumerate() {
        let expected = G::scalar_mul(&base[opening.shuffle().index(j)], opening.key());
        if *committed != expected {
            return Err(Error::VerificationFailed("shuffle equality check"));
        }
    }
    Ok(())
}
