//! Byte-level wire formats for the protocol messages.
//!
//! Every message is `[version][tag][payload]`. Card vectors carry a count
//! byte and a per-element length byte up front; decks are capped at 255
//! cards so one byte suffices for counts and permutation indices.
//! Decoding is strict: truncation, trailing bytes, unknown versions or
//! tags, bad counts, malformed points or scalars, and index vectors that
//! are not permutations are all rejected.

use crate::{Error, Group, Result};

use super::permutation::Permutation;
use super::shuffle::ShuffleChallenge;

/// Wire format version.
const WIRE_VERSION: u8 = 1;

const TAG_ROLL_COMMIT: u8 = 1;
const TAG_INIT_ROLL: u8 = 2;
const TAG_SHUFFLED_DECK: u8 = 3;
const TAG_SHUFFLE_COMMIT: u8 = 4;
const TAG_SHUFFLE_CHALLENGE: u8 = 5;
const TAG_SHUFFLE_OPENING: u8 = 6;
const TAG_PARTIAL_DECRYPT: u8 = 7;
const TAG_REVEAL_CHALLENGE: u8 = 8;
const TAG_REVEAL_RESPONSE: u8 = 9;

/// A protocol message as it crosses the channel between the two players.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Message<G: Group> {
    /// Hash commitment to a deck roll, sent before the roll itself.
    RollCommit([u8; 32]),
    /// One party's deck-initialization roll.
    InitRoll(Vec<G::Element>),
    /// The output deck of a shuffle-encrypt round.
    ShuffledDeck(Vec<G::Element>),
    /// Commitment deck of one cut-and-choose round.
    ShuffleCommit(Vec<G::Element>),
    /// The verifier's challenge bit for the committed round.
    ShuffleChallenge(ShuffleChallenge),
    /// The shuffler's opening of the committed round.
    ShuffleOpening {
        /// `x_i` or `s·x_i`, depending on the challenge.
        key: G::Scalar,
        /// `σ_i` or `π∘σ_i`, depending on the challenge.
        shuffle: Permutation,
    },
    /// Partial decryption of a drawn card plus the proof commitment.
    PartialDecrypt {
        /// `D = s⁻¹·C`.
        decrypted: G::Element,
        /// `R₁ = k·B`.
        r1: G::Element,
        /// `R₂ = k·D`.
        r2: G::Element,
    },
    /// The drawer's challenge scalar (interactive variant only).
    RevealChallenge(G::Scalar),
    /// The decrypter's response scalar.
    RevealResponse(G::Scalar),
}

impl<G: Group> Message<G> {
    /// Serializes the message.
    pub fn to_bytes(&self) -> Vec<u8> {
        let mut buf = vec![WIRE_VERSION];
        match self {
            Message::RollCommit(digest) => {
                buf.push(TAG_ROLL_COMMIT);
                buf.extend_from_slice(digest);
            }
            Message::InitRoll(cards) => {
                buf.push(TAG_INIT_ROLL);
                put_elements::<G>(&mut buf, cards);
            }
            Message::ShuffledDeck(cards) => {
                buf.push(TAG_SHUFFLED_DECK);
                put_elements::<G>(&mut buf, cards);
            }
            Message::ShuffleCommit(cards) => {
                buf.push(TAG_SHUFFLE_COMMIT);
                put_elements::<G>(&mut buf, cards);
            }
            Message::ShuffleChallenge(challenge) => {
                buf.push(TAG_SHUFFLE_CHALLENGE);
                buf.push(challenge.to_byte());
            }
            Message::ShuffleOpening { key, shuffle } => {
                buf.push(TAG_SHUFFLE_OPENING);
                put_scalar::<G>(&mut buf, key);
                buf.push(shuffle.len() as u8);
                buf.extend_from_slice(shuffle.as_bytes());
            }
            Message::PartialDecrypt { decrypted, r1, r2 } => {
                buf.push(TAG_PARTIAL_DECRYPT);
                let encoded = G::element_to_bytes(decrypted);
                buf.push(encoded.len() as u8);
                buf.extend_from_slice(&encoded);
                buf.extend_from_slice(&G::element_to_bytes(r1));
                buf.extend_from_slice(&G::element_to_bytes(r2));
            }
            Message::RevealChallenge(scalar) => {
                buf.push(TAG_REVEAL_CHALLENGE);
                put_scalar::<G>(&mut buf, scalar);
            }
            Message::RevealResponse(scalar) => {
                buf.push(TAG_REVEAL_RESPONSE);
                put_scalar::<G>(&mut buf, scalar);
            }
        }
        buf
    }

    /// Deserializes a message, rejecting anything malformed.
    pub fn from_bytes(bytes: &[u8]) -> Result<Self> {
        let mut reader = Reader::new(bytes);

        let version = reader.take_u8("version")?;
        if version != WIRE_VERSION {
            return Err(Error::MalformedMessage(format!(
                "unsupported wire version {}",
                version
            )));
        }

        let tag = reader.take_u8("tag")?;
        let message = match tag {
            TAG_ROLL_COMMIT => {
                let digest = reader.take(32, "roll commitment")?;
                let mut arr = [0u8; 32];
                arr.copy_from_slice(digest);
                Message::RollCommit(arr)
            }
            TAG_INIT_ROLL => Message::InitRoll(take_elements::<G>(&mut reader)?),
            TAG_SHUFFLED_DECK => Message::ShuffledDeck(take_elements::<G>(&mut reader)?),
            TAG_SHUFFLE_COMMIT => Message::ShuffleCommit(take_elements::<G>(&mut reader)?),
            TAG_SHUFFLE_CHALLENGE => {
                let byte = reader.take_u8("challenge")?;
                Message::ShuffleChallenge(ShuffleChallenge::from_byte(byte)?)
            }
            TAG_SHUFFLE_OPENING => {
                let key = take_scalar::<G>(&mut reader)?;
                let n = reader.take_u8("permutation size")?;
                let indices = reader.take(usize::from(n), "permutation")?;
                let shuffle = Permutation::from_bytes(indices)?;
                Message::ShuffleOpening { key, shuffle }
            }
            TAG_PARTIAL_DECRYPT => {
                let elem_len = usize::from(reader.take_u8("element length")?);
                let decrypted = G::element_from_bytes(reader.take(elem_len, "decrypted card")?)?;
                let r1 = G::element_from_bytes(reader.take(elem_len, "commitment r1")?)?;
                let r2 = G::element_from_bytes(reader.take(elem_len, "commitment r2")?)?;
                Message::PartialDecrypt { decrypted, r1, r2 }
            }
            TAG_REVEAL_CHALLENGE => Message::RevealChallenge(take_scalar::<G>(&mut reader)?),
            TAG_REVEAL_RESPONSE => Message::RevealResponse(take_scalar::<G>(&mut reader)?),
            other => {
                return Err(Error::MalformedMessage(format!(
                    "unknown message tag {}",
                    other
                )))
            }
        };

        reader.finish()?;
        Ok(message)
    }
}

fn put_elements<G: Group>(buf: &mut Vec<u8>, cards: &[G::Element]) {
    debug_assert!(!cards.is_empty() && cards.len() <= 255);
    buf.push(cards.len() as u8);
    let first = G::element_to_bytes(&cards[0]);
    buf.push(first.len() as u8);
    buf.extend_from_slice(&first);
    for card in &cards[1..] {
        buf.extend_from_slice(&G::element_to_bytes(card));
    }
}

fn take_elements<G: Group>(reader: &mut Reader<'_>) -> Result<Vec<G::Element>> {
    let n = reader.take_u8("card count")?;
    if n == 0 {
        return Err(Error::MalformedMessage("empty card vector".to_string()));
    }
    let elem_len = usize::from(reader.take_u8("element length")?);
    (0..n)
        .map(|_| G::element_from_bytes(reader.take(elem_len, "card")?))
        .collect()
}

fn put_scalar<G: Group>(buf: &mut Vec<u8>, scalar: &G::Scalar) {
    let encoded = G::scalar_to_bytes(scalar);
    buf.push(encoded.len() as u8);
    buf.extend_from_slice(&encoded);
}

fn take_scalar<G: Group>(reader: &mut Reader<'_>) -> Result<G::Scalar> {
    let len = usize::from(reader.take_u8("scalar length")?);
    G::scalar_from_bytes(reader.take(len, "scalar")?)
}

struct Reader<'a> {
    bytes: &'a [u8],
    pos: usize,
}

impl<'a> Reader<'a> {
    fn new(bytes: &'a [u8]) -> Self {
        Self { bytes, pos: 0 }
    }

    fn take(&mut self, n: usize, what: &str) -> Result<&'a [u8]> {
        let end = self.pos.checked_add(n).filter(|&end| end <= self.bytes.len());
        match end {
            Some(end) => {
                let slice = &self.bytes[self.pos..end];
                self.pos = end;
                Ok(slice)
            }
            None => Err(Error::MalformedMessage(format!("truncated at {}", what))),
        }
    }

    fn take_u8(&mut self, what: &str) -> Result<u8> {
        Ok(self.take(1, what)?[0])
    }

    fn finish(&self) -> Result<()> {
        if self.pos != self.bytes.len() {
            return Err(Error::MalformedMessage(format!(
                "{} trailing bytes",
                self.bytes.len() - self.pos
            )));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::protocol::deck::DeckRoll;
    use crate::protocol::keys::PrivateKey;
    use crate::{Ristretto255, SecureRng, P256};

    fn sample_cards(n: usize) -> Vec<<Ristretto255 as Group>::Element> {
        let mut rng = SecureRng::new();
        DeckRoll::<Ristretto255>::random(n, &mut rng)
            .unwrap()
            .points()
            .to_vec()
    }

    #[test]
    fn card_vector_messages_round_trip() {
        let cards = sample_cards(5);
        for message in [
            Message::InitRoll(cards.clone()),
            Message::ShuffledDeck(cards.clone()),
            Message::ShuffleCommit(cards),
        ] {
            let bytes = message.to_bytes();
            assert_eq!(Message::<Ristretto255>::from_bytes(&bytes).unwrap(), message);
        }
    }

    #[test]
    fn scalar_messages_round_trip() {
        let mut rng = SecureRng::new();
        let scalar = Ristretto255::random_scalar(&mut rng);
        for message in [
            Message::<Ristretto255>::RevealChallenge(scalar.clone()),
            Message::RevealResponse(scalar),
        ] {
            let bytes = message.to_bytes();
            assert_eq!(Message::<Ristretto255>::from_bytes(&bytes).unwrap(), message);
        }
    }

    #[test]
    fn opening_and_challenge_round_trip() {
        let mut rng = SecureRng::new();
        let message = Message::<Ristretto255>::ShuffleOpening {
            key: Ristretto255::random_scalar(&mut rng),
            shuffle: Permutation::random(7, &mut rng).unwrap(),
        };
        let bytes = message.to_bytes();
        assert_eq!(Message::<Ristretto255>::from_bytes(&bytes).unwrap(), message);

        for challenge in [ShuffleChallenge::Output, ShuffleChallenge::Input] {
            let message = Message::<Ristretto255>::ShuffleChallenge(challenge);
            let bytes = message.to_bytes();
            assert_eq!(Message::<Ristretto255>::from_bytes(&bytes).unwrap(), message);
        }
    }

    #[test]
    fn partial_decrypt_round_trips_on_both_backends() {
        let mut rng = SecureRng::new();
        let cards = sample_cards(3);
        let message = Message::<Ristretto255>::PartialDecrypt {
            decrypted: cards[0].clone(),
            r1: cards[1].clone(),
            r2: cards[2].clone(),
        };
        let bytes = message.to_bytes();
        assert_eq!(Message::<Ristretto255>::from_bytes(&bytes).unwrap(), message);

        let (_, a) = PrivateKey::<P256>::generate(&mut rng);
        let (_, b) = PrivateKey::<P256>::generate(&mut rng);
        let (_, c) = PrivateKey::<P256>::generate(&mut rng);
        let message = Message::<P256>::PartialDecrypt {
            decrypted: a,
            r1: b,
            r2: c,
        };
        let bytes = message.to_bytes();
        assert_eq!(Message::<P256>::from_bytes(&bytes).unwrap(), message);
    }

    #[test]
    fn roll_commit_round_trip() {
        let message = Message::<Ristretto255>::RollCommit([7u8; 32]);
        let bytes = message.to_bytes();
        assert_eq!(Message::<Ristretto255>::from_bytes(&bytes).unwrap(), message);
    }

    #[test]
    fn rejects_malformed_framing() {
        assert!(Message::<Ristretto255>::from_bytes(&[]).is_err());
        assert!(Message::<Ristretto255>::from_bytes(&[WIRE_VERSION]).is_err());
        assert!(Message::<Ristretto255>::from_bytes(&[99, TAG_ROLL_COMMIT]).is_err());
        assert!(Message::<Ristretto255>::from_bytes(&[WIRE_VERSION, 200]).is_err());

        // truncated roll commitment
        assert!(Message::<Ristretto255>::from_bytes(&[WIRE_VERSION, TAG_ROLL_COMMIT, 1, 2]).is_err());

        // empty card vector
        assert!(
            Message::<Ristretto255>::from_bytes(&[WIRE_VERSION, TAG_INIT_ROLL, 0, 32]).is_err()
        );

        // trailing garbage
        let mut bytes = Message::<Ristretto255>::RollCommit([0u8; 32]).to_bytes();
        bytes.push(0xFF);
        assert!(Message::<Ristretto255>::from_bytes(&bytes).is_err());
    }

    #[test]
    fn rejects_invalid_card_bytes() {
        let mut bytes = vec![WIRE_VERSION, TAG_INIT_ROLL, 1, 32];
        bytes.extend_from_slice(&[0xFF; 32]);
        assert!(Message::<Ristretto255>::from_bytes(&bytes).is_err());
    }

    #[test]
    fn rejects_non_permutation_opening() {
        let mut rng = SecureRng::new();
        let mut bytes = vec![WIRE_VERSION, TAG_SHUFFLE_OPENING];
        let scalar = Ristretto255::random_scalar(&mut rng);
        bytes.push(32);
        bytes.extend_from_slice(&Ristretto255::scalar_to_bytes(&scalar));
        bytes.push(3);
        bytes.extend_from_slice(&[0, 0, 1]);
        assert!(Message::<Ristretto255>::from_bytes(&bytes).is_err());
    }
}
