//! Full game where every exchange between the players crosses the wire
//! as bytes: each protocol value is serialized by the sender and
//! reconstructed by the receiver before use.

mod common;

use common::seeded_rng;
use mental_poker::{
    decrypt_card, DeckRoll, Group, InitialDeck, Message, PrivateKey, Result, RevealProver,
    RevealStatement, RevealVerifier, Ristretto255, RollCommitment, RoundCommitment, RoundOpening,
    ShuffleProver, ShuffleVerifier,
};
use rand_core::CryptoRngCore;

type G = Ristretto255;
type Card = <G as Group>::Element;

/// Serializes, ships and reparses a message, as the peer would see it.
fn pass(message: Message<G>) -> Message<G> {
    let bytes = message.to_bytes();
    Message::from_bytes(&bytes).expect("well-formed message must parse")
}

/// One shuffle round proved entirely over the wire. The verifier works
/// only with decks and proof values it parsed from bytes.
fn proved_shuffle_over_wire<R: CryptoRngCore>(
    verifier_input: &[Card],
    rounds: usize,
    rng: &mut R,
) -> Result<(PrivateKey<G>, Vec<Card>)> {
    let mut prover = ShuffleProver::<G>::shuffle(verifier_input, rng)?;

    let received_deck = match pass(Message::ShuffledDeck(prover.deck().to_vec())) {
        Message::ShuffledDeck(cards) => cards,
        _ => unreachable!(),
    };
    let mut verifier = ShuffleVerifier::<G>::new(verifier_input, &received_deck)?;

    for _ in 0..rounds {
        let commitment = prover.commit(rng)?;
        let received = match pass(Message::ShuffleCommit(commitment.cards().to_vec())) {
            Message::ShuffleCommit(cards) => RoundCommitment::from_cards(cards),
            _ => unreachable!(),
        };

        let challenge = verifier.challenge(received, rng)?;
        let challenge = match pass(Message::ShuffleChallenge(challenge)) {
            Message::ShuffleChallenge(challenge) => challenge,
            _ => unreachable!(),
        };

        let opening = prover.open(challenge)?;
        let opening = match pass(Message::ShuffleOpening {
            key: opening.key().clone(),
            shuffle: opening.shuffle().clone(),
        }) {
            Message::ShuffleOpening { key, shuffle } => RoundOpening::new(key, shuffle),
            _ => unreachable!(),
        };
        verifier.check(&opening)?;
    }

    Ok((prover.into_key(), received_deck))
}

#[test]
fn full_game_over_serialized_messages() {
    common::init_tracing();
    let mut rng = seeded_rng(0x317E);
    let n = 4;
    let k = 8;

    // Deck roll: commitments first, then the rolls, all as bytes.
    let roll_a = DeckRoll::<G>::random(n, &mut rng).unwrap();
    let roll_b = DeckRoll::<G>::random(n, &mut rng).unwrap();

    let commit_a = match pass(Message::RollCommit(*roll_a.commitment().as_bytes())) {
        Message::RollCommit(digest) => RollCommitment::from_bytes(digest),
        _ => unreachable!(),
    };
    let received_roll_a = match pass(Message::InitRoll(roll_a.points().to_vec())) {
        Message::InitRoll(points) => DeckRoll::<G>::from_points(points).unwrap(),
        _ => unreachable!(),
    };
    assert!(commit_a.matches(&received_roll_a));

    let received_roll_b = match pass(Message::InitRoll(roll_b.points().to_vec())) {
        Message::InitRoll(points) => DeckRoll::<G>::from_points(points).unwrap(),
        _ => unreachable!(),
    };

    // B's view of the deck, built from its own roll and A's wire roll.
    let deck = InitialDeck::combine(&received_roll_a, &received_roll_b).unwrap();

    let (key_a, round_a) = proved_shuffle_over_wire(deck.cards(), k, &mut rng).unwrap();
    let (key_b, round_b) = proved_shuffle_over_wire(&round_a, k, &mut rng).unwrap();

    // Public keys are exchanged once at setup, as encoded points.
    let pub_a = G::element_from_bytes(&G::element_to_bytes(&key_a.public_key())).unwrap();
    let pub_b = G::element_from_bytes(&G::element_to_bytes(&key_b.public_key())).unwrap();

    // Interactive reveals: PARTIAL_DECRYPT, CP_CHAL and CP_RESP all
    // cross the wire.
    let mut picks = Vec::new();
    for (j, card) in round_b.iter().enumerate() {
        let (decrypter, decrypter_pub, drawer_key) = if j % 2 == 0 {
            (&key_b, &pub_b, &key_a)
        } else {
            (&key_a, &pub_a, &key_b)
        };

        let prover = RevealProver::new(decrypter, card.clone());
        let (commitment, nonce) = prover.commit(&mut rng);

        let (decrypted, r1, r2) = match pass(Message::PartialDecrypt {
            decrypted: prover.statement().decrypted().clone(),
            r1: commitment.r1().clone(),
            r2: commitment.r2().clone(),
        }) {
            Message::PartialDecrypt { decrypted, r1, r2 } => (decrypted, r1, r2),
            _ => unreachable!(),
        };

        let challenge = G::random_scalar(&mut rng);
        let received_challenge = match pass(Message::RevealChallenge(challenge.clone())) {
            Message::RevealChallenge(c) => c,
            _ => unreachable!(),
        };

        let response = prover.respond(&nonce, &received_challenge);
        let received_response = match pass(Message::RevealResponse(response.s().clone())) {
            Message::RevealResponse(s) => mental_poker::RevealResponse::<G>::new(s),
            _ => unreachable!(),
        };

        // the drawer rebuilds everything from wire values
        let statement =
            RevealStatement::new(decrypter_pub.clone(), card.clone(), decrypted.clone());
        RevealVerifier::new(statement)
            .verify_response(
                &mental_poker::RevealCommitment::new(r1, r2),
                &challenge,
                &received_response,
            )
            .unwrap();

        picks.push(deck.position_of(&decrypt_card(drawer_key, &decrypted)).unwrap());
    }

    let mut all = picks.clone();
    all.sort_unstable();
    assert_eq!(all, (0..n).collect::<Vec<_>>());
}
