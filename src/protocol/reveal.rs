//! Card reveal: partial decryption plus a Chaum-Pedersen proof of honesty.
//!
//! A draw hands one player the card only after the other player strips
//! their encryption layer. The decrypting player proves that the same
//! private key `s` behind their public key `Y = s·B` was used, i.e. that
//! `D = s⁻¹·C` — without learning or leaking which card it is. The claim
//! verified is equality of discrete logs: `Y = s·B` and `C = s·D`.

use rand_core::CryptoRngCore;
use zeroize::{Zeroize, ZeroizeOnDrop};

use crate::{Error, Group, Result};

use super::keys::PrivateKey;
use super::transcript::Transcript;

/// Strips one encryption layer: `D = s⁻¹·C`.
pub fn decrypt_card<G: Group>(key: &PrivateKey<G>, card: &G::Element) -> G::Element {
    G::scalar_mul(card, key.inverse())
}

/// Public statement of one reveal: the decrypter's public key `Y`, the
/// ciphertext card `C` and the claimed partial decryption `D`.
#[derive(Clone, Debug)]
pub struct RevealStatement<G: Group> {
    public_key: G::Element,
    card: G::Element,
    decrypted: G::Element,
}

impl<G: Group> RevealStatement<G> {
    /// Creates a statement from its public parts.
    pub fn new(public_key: G::Element, card: G::Element, decrypted: G::Element) -> Self {
        Self {
            public_key,
            card,
            decrypted,
        }
    }

    /// The decrypter's public key `Y = s·B`.
    pub fn public_key(&self) -> &G::Element {
        &self.public_key
    }

    /// The encrypted card `C`.
    pub fn card(&self) -> &G::Element {
        &self.card
    }

    /// The partial decryption `D = s⁻¹·C`.
    pub fn decrypted(&self) -> &G::Element {
        &self.decrypted
    }

    /// Checks that all statement elements lie in the group.
    pub fn validate(&self) -> Result<()> {
        G::validate_element(&self.public_key)?;
        G::validate_element(&self.card)?;
        G::validate_element(&self.decrypted)?;
        Ok(())
    }

    fn append_to(&self, transcript: &mut Transcript) {
        transcript.append_group_name(G::name());
        transcript.append_statement(
            &G::element_to_bytes(&G::basepoint()),
            &G::element_to_bytes(&self.public_key),
            &G::element_to_bytes(&self.card),
            &G::element_to_bytes(&self.decrypted),
        );
    }
}

/// Commitment pair of the proof: `R₁ = k·B`, `R₂ = k·D`.
#[derive(Clone, Debug)]
pub struct RevealCommitment<G: Group> {
    r1: G::Element,
    r2: G::Element,
}

impl<G: Group> RevealCommitment<G> {
    /// Creates a commitment from its two points.
    pub fn new(r1: G::Element, r2: G::Element) -> Self {
        Self { r1, r2 }
    }

    /// `R₁ = k·B`.
    pub fn r1(&self) -> &G::Element {
        &self.r1
    }

    /// `R₂ = k·D`.
    pub fn r2(&self) -> &G::Element {
        &self.r2
    }
}

/// Secret nonce behind a commitment. Zeroized on drop.
#[derive(Clone, Debug, Zeroize, ZeroizeOnDrop)]
pub struct RevealNonce<G: Group> {
    k: G::Scalar,
}

impl<G: Group> RevealNonce<G> {
    /// The nonce scalar `k`.
    pub fn k(&self) -> &G::Scalar {
        &self.k
    }
}

/// Response scalar `s_resp = k − c·s`.
#[derive(Clone, Debug, Zeroize)]
#[zeroize(drop)]
pub struct RevealResponse<G: Group> {
    s: G::Scalar,
}

impl<G: Group> RevealResponse<G> {
    /// Creates a response from a scalar.
    pub fn new(s: G::Scalar) -> Self {
        Self { s }
    }

    /// The response scalar.
    pub fn s(&self) -> &G::Scalar {
        &self.s
    }
}

/// Complete non-interactive reveal proof.
#[derive(Clone, Debug)]
pub struct RevealProof<G: Group> {
    commitment: RevealCommitment<G>,
    response: RevealResponse<G>,
}

impl<G: Group> RevealProof<G> {
    /// Assembles a proof from commitment and response.
    pub fn new(commitment: RevealCommitment<G>, response: RevealResponse<G>) -> Self {
        Self {
            commitment,
            response,
        }
    }

    /// The commitment pair.
    pub fn commitment(&self) -> &RevealCommitment<G> {
        &self.commitment
    }

    /// The response.
    pub fn response(&self) -> &RevealResponse<G> {
        &self.response
    }
}

/// Decrypting player's side of the reveal proof.
///
/// Supports both the interactive flow ([`commit`](Self::commit), then
/// [`respond`](Self::respond) to the peer's challenge) and the
/// Fiat-Shamir flow ([`prove`](Self::prove)).
pub struct RevealProver<'k, G: Group> {
    key: &'k PrivateKey<G>,
    statement: RevealStatement<G>,
}

impl<'k, G: Group> RevealProver<'k, G> {
    /// Partially decrypts `card` and sets up the proof of honesty.
    pub fn new(key: &'k PrivateKey<G>, card: G::Element) -> Self {
        let decrypted = decrypt_card(key, &card);
        let statement = RevealStatement::new(key.public_key(), card, decrypted);
        Self { key, statement }
    }

    /// The public statement, including the partial decryption to send.
    pub fn statement(&self) -> &RevealStatement<G> {
        &self.statement
    }

    /// Interactive step 1: sample `k`, commit `R₁ = k·B`, `R₂ = k·D`.
    pub fn commit<R: CryptoRngCore>(&self, rng: &mut R) -> (RevealCommitment<G>, RevealNonce<G>) {
        let k = G::random_scalar(rng);
        let r1 = G::scalar_mul(&G::basepoint(), &k);
        let r2 = G::scalar_mul(&self.statement.decrypted, &k);
        (RevealCommitment { r1, r2 }, RevealNonce { k })
    }

    /// Interactive step 3: answer the challenge with `s_resp = k − c·s`.
    pub fn respond(&self, nonce: &RevealNonce<G>, challenge: &G::Scalar) -> RevealResponse<G> {
        RevealResponse {
            s: G::scalar_sub_product(nonce.k(), challenge, self.key.scalar()),
        }
    }

    /// Non-interactive proof: the challenge is squeezed from a transcript
    /// binding the statement and commitment.
    pub fn prove<R: CryptoRngCore>(&self, rng: &mut R) -> RevealProof<G> {
        let mut transcript = Transcript::new();
        self.prove_with_transcript(rng, &mut transcript)
    }

    /// Non-interactive proof over a caller-provided transcript, which may
    /// carry extra context such as a game identifier.
    pub fn prove_with_transcript<R: CryptoRngCore>(
        &self,
        rng: &mut R,
        transcript: &mut Transcript,
    ) -> RevealProof<G> {
        let (commitment, nonce) = self.commit(rng);
        self.statement.append_to(transcript);
        transcript.append_commitment(
            &G::element_to_bytes(&commitment.r1),
            &G::element_to_bytes(&commitment.r2),
        );
        let challenge = transcript.challenge_scalar::<G>();
        let response = self.respond(&nonce, &challenge);
        RevealProof::new(commitment, response)
    }
}

/// Drawing player's side of the reveal proof.
pub struct RevealVerifier<G: Group> {
    statement: RevealStatement<G>,
}

impl<G: Group> RevealVerifier<G> {
    /// Creates a verifier for the received statement.
    pub fn new(statement: RevealStatement<G>) -> Self {
        Self { statement }
    }

    /// Interactive step 4: check `R₁ = s_resp·B + c·Y` and
    /// `R₂ = s_resp·D + c·C`.
    ///
    /// A dishonest partial decryption admits at most one challenge value
    /// that satisfies both equations.
    pub fn verify_response(
        &self,
        commitment: &RevealCommitment<G>,
        challenge: &G::Scalar,
        response: &RevealResponse<G>,
    ) -> Result<()> {
        self.statement.validate()?;

        let st = &self.statement;
        let r1_check = G::element_add(
            &G::scalar_mul(&G::basepoint(), response.s()),
            &G::scalar_mul(&st.public_key, challenge),
        );
        let r2_check = G::element_add(
            &G::scalar_mul(&st.decrypted, response.s()),
            &G::scalar_mul(&st.card, challenge),
        );

        if commitment.r1 != r1_check || commitment.r2 != r2_check {
            return Err(Error::VerificationFailed("reveal equality check"));
        }
        Ok(())
    }

    /// Verifies a non-interactive proof.
    pub fn verify(&self, proof: &RevealProof<G>) -> Result<()> {
        let mut transcript = Transcript::new();
        self.verify_with_transcript(proof, &mut transcript)
    }

    /// Verifies a non-interactive proof over a caller-provided transcript.
    /// The transcript context must match the prover's.
    pub fn verify_with_transcript(
        &self,
        proof: &RevealProof<G>,
        transcript: &mut Transcript,
    ) -> Result<()> {
        self.statement.append_to(transcript);
        transcript.append_commitment(
            &G::element_to_bytes(&proof.commitment.r1),
            &G::element_to_bytes(&proof.commitment.r2),
        );
        let challenge = transcript.challenge_scalar::<G>();
        self.verify_response(&proof.commitment, &challenge, &proof.response)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{Ristretto255, SecureRng};

    type G = Ristretto255;

    fn setup() -> (PrivateKey<G>, <G as Group>::Element) {
        let mut rng = SecureRng::new();
        let (key, _) = PrivateKey::<G>::generate(&mut rng);
        let card = Ristretto255::scalar_mul(
            &Ristretto255::basepoint(),
            &Ristretto255::random_scalar(&mut rng),
        );
        (key, card)
    }

    #[test]
    fn decrypt_inverts_encrypt() {
        let (key, card) = setup();

        let encrypted = Ristretto255::scalar_mul(&card, key.scalar());
        assert_eq!(decrypt_card(&key, &encrypted), card);
    }

    #[test]
    fn interactive_proof_accepts_honest_decryption() {
        let mut rng = SecureRng::new();
        let (key, card) = setup();

        let prover = RevealProver::new(&key, card);
        let (commitment, nonce) = prover.commit(&mut rng);
        let challenge = Ristretto255::random_scalar(&mut rng);
        let response = prover.respond(&nonce, &challenge);

        let verifier = RevealVerifier::new(prover.statement().clone());
        verifier
            .verify_response(&commitment, &challenge, &response)
            .unwrap();
    }

    #[test]
    fn fiat_shamir_proof_accepts_honest_decryption() {
        let mut rng = SecureRng::new();
        let (key, card) = setup();

        let prover = RevealProver::new(&key, card);
        let proof = prover.prove(&mut rng);

        let verifier = RevealVerifier::new(prover.statement().clone());
        verifier.verify(&proof).unwrap();
    }

    #[test]
    fn dishonest_decryption_rejected() {
        let mut rng = SecureRng::new();
        let (key, card) = setup();

        let prover = RevealProver::new(&key, card.clone());
        let proof = prover.prove(&mut rng);

        // claim a different partial decryption for the same card
        let bogus = Ristretto255::scalar_mul(
            &Ristretto255::basepoint(),
            &Ristretto255::random_scalar(&mut rng),
        );
        let statement = RevealStatement::new(key.public_key(), card, bogus);
        let verifier = RevealVerifier::new(statement);
        assert!(verifier.verify(&proof).is_err());
    }

    #[test]
    fn mismatched_transcript_context_rejected() {
        let mut rng = SecureRng::new();
        let (key, card) = setup();

        let prover = RevealProver::new(&key, card);
        let mut prove_transcript = Transcript::new();
        prove_transcript.append_context(b"game-1");
        let proof = prover.prove_with_transcript(&mut rng, &mut prove_transcript);

        let verifier = RevealVerifier::new(prover.statement().clone());

        let mut matching = Transcript::new();
        matching.append_context(b"game-1");
        verifier.verify_with_transcript(&proof, &mut matching).unwrap();

        let mut wrong = Transcript::new();
        wrong.append_context(b"game-2");
        assert!(verifier.verify_with_transcript(&proof, &mut wrong).is_err());
    }
}
