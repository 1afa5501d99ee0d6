//! In-process demo: two players play a full game against each other.
//!
//! Sequences both sides of the protocol in one process — deck roll with
//! commitments, two proved shuffle rounds, and a proved reveal of every
//! card, alternating draws between the players.

use std::time::Instant;

use clap::Parser;
use mental_poker::{
    DeckRoll, Group, InitialDeck, PrivateKey, RevealProver, RevealVerifier, Ristretto255,
    SecureRng, ShuffleProver, ShuffleVerifier,
};

type Card = <Ristretto255 as Group>::Element;

#[derive(Parser)]
#[command(name = "demo")]
#[command(about = "Two-player mental poker demo", long_about = None)]
struct Cli {
    /// Number of cards in the deck (at most 255)
    #[arg(short, long, default_value_t = 52)]
    n_cards: usize,

    /// Number of cut-and-choose proof rounds per shuffle
    #[arg(short = 'k', long, default_value_t = 10)]
    rounds: usize,
}

fn proved_shuffle(
    input: &[Card],
    rounds: usize,
    rng: &mut SecureRng,
) -> mental_poker::Result<(PrivateKey<Ristretto255>, Vec<Card>)> {
    let mut prover = ShuffleProver::<Ristretto255>::shuffle(input, rng)?;
    let output = prover.deck().to_vec();
    let mut verifier = ShuffleVerifier::new(input, &output)?;

    for _ in 0..rounds {
        let commitment = prover.commit(rng)?;
        let challenge = verifier.challenge(commitment, rng)?;
        let opening = prover.open(challenge)?;
        verifier.check(&opening)?;
    }

    Ok((prover.into_key(), output))
}

fn main() -> mental_poker::Result<()> {
    let cli = Cli::parse();
    let mut rng = SecureRng::new();

    let start = Instant::now();

    // Deck roll with commitments exchanged before the rolls.
    let roll_a = DeckRoll::<Ristretto255>::random(cli.n_cards, &mut rng)?;
    let roll_b = DeckRoll::<Ristretto255>::random(cli.n_cards, &mut rng)?;
    let commit_a = roll_a.commitment();
    let commit_b = roll_b.commitment();
    assert!(commit_a.matches(&roll_a) && commit_b.matches(&roll_b));
    let deck = InitialDeck::combine(&roll_a, &roll_b)?;

    // Each player shuffles, encrypts and proves it to the other.
    let (key_a, round_a) = proved_shuffle(deck.cards(), cli.rounds, &mut rng)?;
    let (key_b, round_b) = proved_shuffle(&round_a, cli.rounds, &mut rng)?;

    println!(
        "setup: {} cards, {} proof rounds per shuffle, {:?}",
        cli.n_cards,
        cli.rounds,
        start.elapsed()
    );

    let start = Instant::now();

    // Draws alternate: even positions to A (B decrypts first), odd to B.
    for (j, card) in round_b.iter().enumerate() {
        let (drawer, first_key, second_key) = if j % 2 == 0 {
            ("A", &key_b, &key_a)
        } else {
            ("B", &key_a, &key_b)
        };

        let prover = RevealProver::new(first_key, card.clone());
        let proof = prover.prove(&mut rng);
        RevealVerifier::new(prover.statement().clone()).verify(&proof)?;

        let plain = mental_poker::decrypt_card(second_key, prover.statement().decrypted());
        let position = deck.position_of(&plain)?;
        println!("{} picked {}", drawer, position);
    }

    println!("draws: {:?}", start.elapsed());
    Ok(())
}
