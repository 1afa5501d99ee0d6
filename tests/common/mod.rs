//! Common test utilities shared across integration tests.
//!
//! Each test binary compiles this module separately and uses a subset of
//! the helpers.
#![allow(dead_code)]

use mental_poker::{
    decrypt_card, DeckRoll, Group, InitialDeck, PrivateKey, Result, RevealProver, RevealVerifier,
    Ristretto255, ShuffleProver, ShuffleVerifier,
};
use rand_chacha::rand_core::SeedableRng;
use rand_chacha::ChaCha20Rng;
use rand_core::CryptoRngCore;

/// Initialize test tracing (call once at the beginning of tests).
///
/// Subsequent calls are safe and will be ignored.
pub fn init_tracing() {
    use tracing_subscriber::EnvFilter;

    let filter = EnvFilter::new("integration_tests=info");

    let _ = tracing_subscriber::fmt()
        .with_test_writer()
        .with_env_filter(filter)
        .try_init();
}

/// Deterministic RNG for reproducible protocol runs.
pub fn seeded_rng(seed: u64) -> ChaCha20Rng {
    ChaCha20Rng::seed_from_u64(seed)
}

pub type Card = <Ristretto255 as Group>::Element;

/// Which positions of the initial deck each player ended up drawing.
#[derive(Debug, PartialEq, Eq)]
pub struct GameOutcome {
    pub a_picks: Vec<usize>,
    pub b_picks: Vec<usize>,
}

/// Runs one shuffle-encrypt round plus its full cut-and-choose proof.
pub fn proved_shuffle<R: CryptoRngCore>(
    input: &[Card],
    rounds: usize,
    rng: &mut R,
) -> Result<(PrivateKey<Ristretto255>, Vec<Card>)> {
    let mut prover = ShuffleProver::<Ristretto255>::shuffle(input, rng)?;
    let output = prover.deck().to_vec();
    let mut verifier = ShuffleVerifier::new(input, &output)?;

    for _ in 0..rounds {
        let commitment = prover.commit(rng)?;
        let challenge = verifier.challenge(commitment, rng)?;
        let opening = prover.open(challenge)?;
        verifier.check(&opening)?;
    }
    assert_eq!(verifier.accepted_rounds(), rounds);

    Ok((prover.into_key(), output))
}

/// Plays a complete in-process game: committed deck roll, two proved
/// shuffles, then a proved draw of every card, alternating between the
/// players (even positions to A, odd to B).
pub fn play_game<R: CryptoRngCore>(n: usize, rounds: usize, rng: &mut R) -> Result<GameOutcome> {
    let roll_a = DeckRoll::<Ristretto255>::random(n, rng)?;
    let roll_b = DeckRoll::<Ristretto255>::random(n, rng)?;

    // commitments cross the wire before the rolls themselves
    let commit_a = roll_a.commitment();
    let commit_b = roll_b.commitment();
    assert!(commit_a.matches(&roll_a));
    assert!(commit_b.matches(&roll_b));

    let deck = InitialDeck::combine(&roll_a, &roll_b)?;

    let (key_a, round_a) = proved_shuffle(deck.cards(), rounds, rng)?;
    let (key_b, round_b) = proved_shuffle(&round_a, rounds, rng)?;

    let mut a_picks = Vec::new();
    let mut b_picks = Vec::new();

    for (j, card) in round_b.iter().enumerate() {
        let (decrypter, drawer_key) = if j % 2 == 0 {
            (&key_b, &key_a)
        } else {
            (&key_a, &key_b)
        };

        let prover = RevealProver::new(decrypter, card.clone());
        let proof = prover.prove(rng);
        RevealVerifier::new(prover.statement().clone()).verify(&proof)?;

        let plain = decrypt_card(drawer_key, prover.statement().decrypted());
        let position = deck.position_of(&plain)?;
        if j % 2 == 0 {
            a_picks.push(position);
        } else {
            b_picks.push(position);
        }
    }

    Ok(GameOutcome { a_picks, b_picks })
}
