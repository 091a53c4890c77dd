use std::time::Duration;

use num_bigint::BigUint;
use rand_core::{CryptoRng, RngCore};
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use crate::crypto_error::{CryptoError, ProtocolError};
use crate::elgamal::ciphertext::Ciphertext;
use crate::elgamal::eg_encrypt::{eg_blinding, eg_encrypt_exponent};
use crate::elgamal::eg_homomorphic::eg_pow;
use crate::elgamal::eg_keygen::PublicKey;
use crate::elgamal::params::GroupParams;
use crate::oblivious_transfer::channel::Transport;
use crate::oblivious_transfer::message::{OtMessage, SELECTION_BIT_TAG, SELECTION_TAG};
use crate::threshold::{reconstruct_from_shares, DecryptShare, Keyshare};

// ============================================================================
// Configuration d'une partie
// ============================================================================
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct OtConfig {
    /// Attente maximale sur chaque réception, en millisecondes
    pub receive_timeout_ms: u64,
}

impl Default for OtConfig {
    fn default() -> Self {
        OtConfig { receive_timeout_ms: 30_000 }
    }
}

impl OtConfig {
    pub fn receive_timeout(&self) -> Duration {
        Duration::from_millis(self.receive_timeout_ms)
    }
}

// ============================================================================
// États d'une session
//
// AwaitSelectionBit -> AwaitSelection -> Done ; toute erreur mène à Aborted.
//
// Aucun engagement de l'émetteur sur (i0, i1) n'est échangé avant la
// sélection : une étape d'engagement s'insérerait entre AwaitSelection et
// Done.
// ============================================================================
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TransferState {
    AwaitSelectionBit,
    AwaitSelection,
    Done,
    Aborted,
}

impl TransferState {
    pub fn name(self) -> &'static str {
        match self {
            TransferState::AwaitSelectionBit => "AwaitSelectionBit",
            TransferState::AwaitSelection => "AwaitSelection",
            TransferState::Done => "Done",
            TransferState::Aborted => "Aborted",
        }
    }
}

// ---------------------------------------------------------------------------
// Étapes sans E/S
// ---------------------------------------------------------------------------

/// Exige i0 < i1 < modulus_bits : 2^i1 doit rester décodable.
pub fn check_indices(i0: u64, i1: u64, params: &GroupParams) -> Result<(), CryptoError> {
    if i0 >= i1 {
        return Err(CryptoError::InvalidParameters(format!(
            "indices OT : i0 < i1 requis (i0 = {i0}, i1 = {i1})"
        )));
    }
    if i1 >= params.modulus_bits() {
        return Err(CryptoError::ExponentOutOfRange {
            exponent: i1,
            bound:    params.modulus_bits(),
        });
    }
    Ok(())
}

/// Exige l'ordre q connu et 2^q = 1 mod p. Sinon 2 sort de <g> et le
/// caractère quadratique de E suffit à révéler le bit du receveur.
pub fn check_ot_params(params: &GroupParams) -> Result<(), CryptoError> {
    if params.powers_of_two_in_subgroup() {
        return Ok(());
    }
    Err(CryptoError::InvalidParameters(
        "OT : ordre q connu et 2^q = 1 mod p requis (p = 7 mod 8)".to_string(),
    ))
}

/// Receveur, étape 1 : E = Enc(2^0) si `bit` (choisit i0), Enc(2^1) sinon (choisit i1).
pub fn receiver_selection_bit<R>(
    bit: bool,
    pk: &PublicKey,
    params: &GroupParams,
    rng: &mut R,
) -> Result<Ciphertext, CryptoError>
where
    R: RngCore + CryptoRng,
{
    check_ot_params(params)?;
    eg_encrypt_exponent(if bit { 0 } else { 1 }, pk, params, rng)
}

/// Émetteur, étape 2 : C = E^(i1-i0) · Enc(2^i0) · Enc(1), et sa part sur C.
///
/// C déchiffre en 2^i0 si E chiffre 2^0, en 2^i1 si E chiffre 2^1.
pub fn sender_respond<R>(
    selection: &Ciphertext,
    i0: u64,
    i1: u64,
    keyshare: &Keyshare,
    pk: &PublicKey,
    params: &GroupParams,
    rng: &mut R,
) -> Result<(Ciphertext, DecryptShare), CryptoError>
where
    R: RngCore + CryptoRng,
{
    check_ot_params(params)?;
    check_indices(i0, i1, params)?;

    let mut combined = eg_pow(selection, &BigUint::from(i1 - i0), params);
    combined.mul_ciphertext(params, &eg_encrypt_exponent(i0, pk, params, rng)?);
    combined.mul_ciphertext(params, &eg_blinding(pk, params, rng));

    let share = keyshare.decrypt_share(params, &combined);
    Ok((combined, share))
}

/// Receveur, étape 3 : recombine sa part avec celle de l'émetteur et décode l'indice.
pub fn receiver_finish(
    combined: &Ciphertext,
    sender_share: &DecryptShare,
    keyshare: &Keyshare,
    params: &GroupParams,
) -> Result<u64, CryptoError> {
    let own_share = keyshare.decrypt_share(params, combined);
    let m = reconstruct_from_shares(combined, &[sender_share.clone(), own_share], 2, params)?;
    params.decode_exponent(&m)
}

// ============================================================================
// Partie du protocole : paramètres, clé publique commune, part 2-parmi-2 de
// la clé privée et extrémité de transport.
//
// Une session occupe le transport de bout en bout. Après Aborted, des
// messages périmés peuvent rester dans la file : la partie refuse toute
// nouvelle session.
// ============================================================================
pub struct ObliviousTransfer {
    params:     GroupParams,
    public_key: PublicKey,
    keyshare:   Keyshare,
    transport:  Transport,
    config:     OtConfig,
    state:      TransferState,
}

impl ObliviousTransfer {
    pub fn new(
        params: GroupParams,
        public_key: PublicKey,
        keyshare: Keyshare,
        transport: Transport,
        config: OtConfig,
    ) -> Result<Self, CryptoError> {
        check_ot_params(&params)?;
        Ok(ObliviousTransfer {
            params,
            public_key,
            keyshare,
            transport,
            config,
            state: TransferState::AwaitSelectionBit,
        })
    }

    pub fn state(&self) -> TransferState {
        self.state
    }

    fn begin_session(&mut self) -> Result<(), CryptoError> {
        if self.state == TransferState::Aborted {
            return Err(ProtocolError::InvalidState {
                expected: TransferState::AwaitSelectionBit.name(),
                actual:   self.state.name(),
            }
            .into());
        }
        self.state = TransferState::AwaitSelectionBit;
        Ok(())
    }

    fn finish_session<T>(&mut self, result: Result<T, CryptoError>) -> Result<T, CryptoError> {
        match &result {
            Ok(_) => {
                self.state = TransferState::Done;
                info!(x = self.keyshare.x, "session OT terminée");
            }
            Err(e) => {
                warn!(x = self.keyshare.x, state = self.state.name(), error = %e, "session OT abandonnée");
                self.state = TransferState::Aborted;
            }
        }
        result
    }

    fn receive(&self, expected: &'static str) -> Result<OtMessage, CryptoError> {
        let raw = self.transport.inbound.take(self.config.receive_timeout())?;
        let message = OtMessage::parse_expecting(&raw, expected)?;
        message.check_elements(&self.params)?;
        debug!(tag = expected, "message OT reçu");
        Ok(message)
    }

    fn send(&self, message: &OtMessage) -> Result<(), CryptoError> {
        self.transport.outbound.offer(message.to_string())?;
        debug!(tag = message.tag(), "message OT envoyé");
        Ok(())
    }

    // -----------------------------------------------------------------------
    // Émetteur : propose (i0, i1), le receveur en apprend exactement un.
    // Les indices sont validés avant toute lecture du transport.
    // -----------------------------------------------------------------------
    pub fn send_1_of_2<R>(&mut self, i0: u64, i1: u64, rng: &mut R) -> Result<(), CryptoError>
    where
        R: RngCore + CryptoRng,
    {
        // Mauvais indices : erreur de l'appelant, la session n'est pas ouverte.
        check_indices(i0, i1, &self.params)?;
        self.begin_session()?;
        let result = self.run_sender(i0, i1, rng);
        self.finish_session(result)
    }

    fn run_sender<R>(&mut self, i0: u64, i1: u64, rng: &mut R) -> Result<(), CryptoError>
    where
        R: RngCore + CryptoRng,
    {
        let selection = match self.receive(SELECTION_BIT_TAG)? {
            OtMessage::SelectionBit { selection } => selection,
            other => return Err(unexpected(SELECTION_BIT_TAG, &other)),
        };
        self.state = TransferState::AwaitSelection;

        let (combined, share) = sender_respond(
            &selection,
            i0,
            i1,
            &self.keyshare,
            &self.public_key,
            &self.params,
            rng,
        )?;
        self.send(&OtMessage::Selection { combined, share })
    }

    // -----------------------------------------------------------------------
    // Receveur : `bit` vrai choisit i0, faux choisit i1.
    // -----------------------------------------------------------------------
    pub fn receive_1_of_2<R>(&mut self, bit: bool, rng: &mut R) -> Result<u64, CryptoError>
    where
        R: RngCore + CryptoRng,
    {
        self.begin_session()?;
        let result = self.run_receiver(bit, rng);
        self.finish_session(result)
    }

    fn run_receiver<R>(&mut self, bit: bool, rng: &mut R) -> Result<u64, CryptoError>
    where
        R: RngCore + CryptoRng,
    {
        let selection = receiver_selection_bit(bit, &self.public_key, &self.params, rng)?;
        self.send(&OtMessage::SelectionBit { selection })?;
        self.state = TransferState::AwaitSelection;

        let (combined, share) = match self.receive(SELECTION_TAG)? {
            OtMessage::Selection { combined, share } => (combined, share),
            other => return Err(unexpected(SELECTION_TAG, &other)),
        };
        receiver_finish(&combined, &share, &self.keyshare, &self.params)
    }
}

fn unexpected(expected: &'static str, found: &OtMessage) -> CryptoError {
    ProtocolError::UnexpectedMessage {
        expected,
        found: found.tag().to_string(),
    }
    .into()
}
