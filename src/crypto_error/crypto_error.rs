// ===========================================================================
// Gestion centralisée des erreurs cryptographiques
//
// Tous les modules utilisent ce type au lieu de panic!/assert!/unwrap().
// Les violations d'invariant arithmétique (fatales) sont séparées des
// erreurs d'entrée et de protocole (récupérables) : voir is_fatal().
// ===========================================================================

use std::time::Duration;
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CryptoError {
    // --- Invariants internes (fatals, jamais réessayés) ---
    /// Inverse modulaire indéfini : inatteignable si p est premier et n != 0 mod p
    #[error("Invariant arithmétique violé : {0}")]
    ArithmeticInvariantViolation(&'static str),

    // --- Déchiffrement à seuil ---
    #[error("Ensemble de parts invalide : {0}")]
    InvalidShareSet(#[from] ShareSetError),

    // --- Transfert inconscient ---
    #[error("Erreur de protocole : {0}")]
    Protocol(#[from] ProtocolError),

    /// Aucune puissance de deux ne correspond dans [low, high)
    #[error("Aucun exposant k dans [{low}, {high}) tel que 2^k corresponde au clair")]
    DecodeFailure { low: u64, high: u64 },

    // --- Erreurs de paramètres d'entrée ---
    /// Le message m n'est pas dans [1, p)
    #[error("Le message doit être dans [1, p)")]
    MessageOutOfRange,
    /// 2^x dépasserait p : l'encodage exponentiel ne serait plus décodable
    #[error("Exposant {exponent} hors domaine : doit être < {bound}")]
    ExponentOutOfRange { exponent: u64, bound: u64 },
    #[error("Paramètres de groupe invalides : {0}")]
    InvalidParameters(String),
    #[error("Seuil {threshold} invalide pour {shares} parts (requis : 1 <= t <= n)")]
    InvalidThreshold { threshold: u32, shares: u32 },
    /// La taille de module demandée est trop petite (< MIN_MODULUS_BITS)
    #[error("Taille de module {requested} bits insuffisante, minimum requis : {minimum} bits")]
    KeySizeTooSmall { requested: u64, minimum: u64 },

    // --- Encodage texte / stockage ---
    #[error("Encodage texte invalide : {0}")]
    ParseError(String),
    /// Parsing hexadécimal invalide dans un champ de clé JSON
    #[error("Parsing hexadécimal invalide dans le fichier de clés")]
    HexParseError,
    /// Champ trop long : vecteur DoS potentiel (conversion BigUint coûteuse)
    #[error("Champ trop long : {actual} caractères (maximum autorisé : {maximum})")]
    FieldTooLong { actual: usize, maximum: usize },
    /// Clé publique incohérente avec les paramètres du groupe
    #[error("Fichier de clés incohérent avec les paramètres du groupe (corrompu ou falsifié)")]
    KeyCoherenceError,
}

impl CryptoError {
    /// Vrai pour les erreurs qui signalent un bug de l'appelant ou des
    /// paramètres de groupe incorrects, et non une mauvaise entrée.
    pub fn is_fatal(&self) -> bool {
        matches!(self, CryptoError::ArithmeticInvariantViolation(_))
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ShareSetError {
    #[error("aucune part fournie")]
    Empty,
    /// Deux parts avec la même abscisse : division par zéro dans Lagrange
    #[error("abscisse x = {x} dupliquée")]
    DuplicateCoordinate { x: u32 },
    /// x = 0 : la part serait f(0), la clé privée elle-même
    #[error("abscisse x = 0 interdite")]
    ZeroCoordinate,
    #[error("abscisse x = {x} absente de l'ensemble")]
    UnknownCoordinate { x: u32 },
    #[error("quorum insuffisant : {provided} part(s) fournie(s), {required} requise(s)")]
    InsufficientQuorum { provided: usize, required: usize },
    /// Coefficient rationnel non entier et dénominateur non inversible
    #[error("coefficient de Lagrange non entier pour x = {x}")]
    NonIntegralLagrange { x: u32 },
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ProtocolError {
    #[error("message inattendu : attendu {expected:?}, reçu {found:?}")]
    UnexpectedMessage { expected: &'static str, found: String },
    #[error("message mal formé : {0}")]
    MalformedMessage(String),
    #[error("état de session {actual} alors que {expected} était attendu")]
    InvalidState { expected: &'static str, actual: &'static str },
    #[error("aucun message reçu après {0:?}")]
    Timeout(Duration),
    /// Verrou empoisonné (thread paniqué pendant un accès au canal)
    #[error("canal empoisonné")]
    ChannelPoisoned,
    /// Composante reçue hors de [0, p)
    #[error("élément hors du groupe")]
    ElementOutOfGroup,
}
