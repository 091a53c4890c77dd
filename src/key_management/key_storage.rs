use serde::{Serialize, Deserialize};
use std::fs;
use std::path::Path;
use std::io;
use num_bigint::BigUint;
use num_traits::{Num, Zero};
use tracing::info;
use zeroize::Zeroize;

use crate::crypto_error::CryptoError;
use crate::elgamal::eg_keygen::{KeyPair, PrivateKey, PublicKey};
use crate::elgamal::params::{Exponentiation, GroupParams};
use crate::threshold::Keyshare;

// ============================================================================
// Protection DoS parsing — limites de taille des entrées
//
// Vérifiées AVANT toute opération coûteuse : lecture du fichier entier en
// mémoire, puis BigUint::from_str_radix (quadratique en la longueur).
// Dimensionnées pour des modules jusqu'à 8192 bits (2048 caractères hex).
// ============================================================================

/// Taille maximale d'un fichier de clés JSON en octets (32 Ko)
pub const MAX_KEY_FILE_BYTES: u64 = 32_768;

/// Longueur maximale d'un champ hexadécimal en caractères.
pub const MAX_HEX_FIELD_LEN: usize = 3_072;

// ============================================================================
// Structures JSON
// ============================================================================

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct GroupParamsJson {
    pub p: String,
    pub g: String,
    /// Ordre du sous-groupe engendré par g, s'il est connu
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub q: Option<String>,
    #[serde(default)]
    pub exponentiation: Exponentiation,
}

#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct PublicKeyJson {
    pub g_a: String,
}

#[derive(Serialize, Deserialize, Clone)]
pub struct PrivateKeyJson {
    pub a: String,
}

#[derive(Serialize, Deserialize, Clone)]
pub struct KeyPairJson {
    pub params:      GroupParamsJson,
    pub public_key:  PublicKeyJson,
    pub private_key: PrivateKeyJson,
}

#[derive(Serialize, Deserialize, Clone)]
pub struct KeyshareJson {
    pub x: u32,
    pub y: String,
}

/// Matériel d'une partie du déchiffrement à seuil : paramètres, clé
/// publique commune et sa propre part.
#[derive(Serialize, Deserialize, Clone)]
pub struct ShareholderJson {
    pub params:     GroupParamsJson,
    pub public_key: PublicKeyJson,
    pub keyshare:   KeyshareJson,
}

impl Drop for PrivateKeyJson {
    fn drop(&mut self) {
        self.a.zeroize();
    }
}

impl Drop for KeyshareJson {
    fn drop(&mut self) {
        self.y.zeroize();
    }
}

// ============================================================================
// Conversion BigUint ↔ hexadécimal
// ============================================================================

pub fn biguint_to_hex(value: &BigUint) -> String {
    value.to_str_radix(16).to_uppercase()
}

/// Convertit une string hex en BigUint.
///
/// Retourne :
///   Err(FieldTooLong)  si len > MAX_HEX_FIELD_LEN
///   Err(HexParseError) si le contenu n'est pas un hex valide
pub fn hex_to_biguint(hex_str: &str) -> Result<BigUint, CryptoError> {
    if hex_str.len() > MAX_HEX_FIELD_LEN {
        return Err(CryptoError::FieldTooLong {
            actual:  hex_str.len(),
            maximum: MAX_HEX_FIELD_LEN,
        });
    }
    BigUint::from_str_radix(hex_str, 16)
        .map_err(|_| CryptoError::HexParseError)
}

// ============================================================================
// Conversion structures Rust → JSON
// ============================================================================

pub fn params_to_json(params: &GroupParams) -> GroupParamsJson {
    GroupParamsJson {
        p:              biguint_to_hex(params.p()),
        g:              biguint_to_hex(params.g()),
        q:              params.subgroup_order().map(biguint_to_hex),
        exponentiation: params.exponentiation(),
    }
}

pub fn public_key_to_json(pk: &PublicKey) -> PublicKeyJson {
    PublicKeyJson { g_a: biguint_to_hex(&pk.g_a) }
}

pub fn private_key_to_json(sk: &PrivateKey) -> PrivateKeyJson {
    PrivateKeyJson { a: biguint_to_hex(&sk.a) }
}

pub fn keypair_to_json(params: &GroupParams, kp: &KeyPair) -> KeyPairJson {
    KeyPairJson {
        params:      params_to_json(params),
        public_key:  public_key_to_json(&kp.public_key),
        private_key: private_key_to_json(&kp.private_key),
    }
}

pub fn keyshare_to_json(share: &Keyshare) -> KeyshareJson {
    KeyshareJson { x: share.x, y: biguint_to_hex(&share.y) }
}

// ============================================================================
// Conversion JSON → structures Rust
//
// Les paramètres repassent par GroupParams::new / with_subgroup_order :
// un fichier ne peut pas introduire un module composite ou un g invalide.
// Les clés et parts sont confrontées aux paramètres.
// ============================================================================

pub fn json_to_params(json: &GroupParamsJson) -> Result<GroupParams, CryptoError> {
    let p = hex_to_biguint(&json.p)?;
    let g = hex_to_biguint(&json.g)?;
    let params = match &json.q {
        Some(q) => GroupParams::with_subgroup_order(p, g, hex_to_biguint(q)?)?,
        None => GroupParams::new(p, g)?,
    };
    Ok(params.with_exponentiation(json.exponentiation))
}

/// A doit être un élément non nul de [0, p).
pub fn json_to_public_key(json: &PublicKeyJson, params: &GroupParams) -> Result<PublicKey, CryptoError> {
    let g_a = hex_to_biguint(&json.g_a)?;
    if g_a.is_zero() || !params.contains(&g_a) {
        return Err(CryptoError::KeyCoherenceError);
    }
    Ok(PublicKey { g_a })
}

/// a doit être dans [0, p-2].
pub fn json_to_private_key(json: &PrivateKeyJson, params: &GroupParams) -> Result<PrivateKey, CryptoError> {
    let mut a = hex_to_biguint(&json.a)?;
    if a >= params.p() - 1u32 {
        a.set_zero();
        return Err(CryptoError::KeyCoherenceError);
    }
    Ok(PrivateKey { a })
}

/// Vérifie en plus que A = g^a : une paire falsifiée est rejetée.
pub fn json_to_keypair(json: &KeyPairJson) -> Result<(GroupParams, KeyPair), CryptoError> {
    let params = json_to_params(&json.params)?;
    let public_key = json_to_public_key(&json.public_key, &params)?;
    let private_key = json_to_private_key(&json.private_key, &params)?;

    if params.mod_exp(params.g(), &private_key.a) != public_key.g_a {
        return Err(CryptoError::KeyCoherenceError);
    }
    Ok((params, KeyPair { private_key, public_key }))
}

/// x >= 1 et y dans [0, exponent_order).
pub fn json_to_keyshare(json: &KeyshareJson, params: &GroupParams) -> Result<Keyshare, CryptoError> {
    let share = Keyshare::new(json.x, hex_to_biguint(&json.y)?);
    if share.x == 0 || &share.y >= params.exponent_order() {
        return Err(CryptoError::KeyCoherenceError);
    }
    Ok(share)
}

// ============================================================================
// Vérification de taille de fichier (DoS protection)
//
// Appelée avant fs::read_to_string. La métadonnée est lue sans ouvrir le
// contenu.
// ============================================================================

fn check_file_size(filepath: &str) -> io::Result<()> {
    let meta = fs::metadata(filepath)?;
    if meta.len() > MAX_KEY_FILE_BYTES {
        return Err(io::Error::new(
            io::ErrorKind::InvalidData,
            format!(
                "Fichier de clés trop grand : {} octets (maximum autorisé : {} octets). \
                 Possible tentative DoS.",
                meta.len(),
                MAX_KEY_FILE_BYTES
            ),
        ));
    }
    Ok(())
}

fn invalid_data(e: CryptoError) -> io::Error {
    io::Error::new(io::ErrorKind::InvalidData, e.to_string())
}

// Lecture bornée ; le texte brut est effacé après désérialisation
fn read_json<T>(filepath: &str) -> io::Result<T>
where
    T: for<'de> Deserialize<'de>,
{
    check_file_size(filepath)?;
    let mut raw = fs::read_to_string(filepath)?;
    let parsed = serde_json::from_str(&raw);
    raw.zeroize();
    Ok(parsed?)
}

fn write_json<T: Serialize>(value: &T, filepath: &str) -> io::Result<()> {
    let mut json = serde_json::to_string_pretty(value)?;
    let written = fs::write(filepath, &json);
    json.zeroize();
    written
}

// ============================================================================
// Sauvegarde JSON sur disque
// ============================================================================

pub fn save_params_json(params: &GroupParams, filepath: &str) -> io::Result<()> {
    write_json(&params_to_json(params), filepath)?;
    info!(path = filepath, "paramètres de groupe sauvegardés");
    Ok(())
}

pub fn save_keypair_json(params: &GroupParams, kp: &KeyPair, filepath: &str) -> io::Result<()> {
    write_json(&keypair_to_json(params, kp), filepath)?;
    info!(path = filepath, "paire de clés sauvegardée");
    Ok(())
}

pub fn save_shareholder_json(
    params: &GroupParams,
    pk: &PublicKey,
    share: &Keyshare,
    filepath: &str,
) -> io::Result<()> {
    let json = ShareholderJson {
        params:     params_to_json(params),
        public_key: public_key_to_json(pk),
        keyshare:   keyshare_to_json(share),
    };
    write_json(&json, filepath)?;
    info!(path = filepath, x = share.x, "part de clé sauvegardée");
    Ok(())
}

// ============================================================================
// Chargement JSON depuis disque
// ============================================================================

pub fn load_params_json(filepath: &str) -> io::Result<GroupParams> {
    let json: GroupParamsJson = read_json(filepath)?;
    json_to_params(&json).map_err(invalid_data)
}

pub fn load_keypair_json(filepath: &str) -> io::Result<(GroupParams, KeyPair)> {
    let json: KeyPairJson = read_json(filepath)?;
    let loaded = json_to_keypair(&json).map_err(invalid_data)?;
    info!(path = filepath, "paire de clés chargée");
    Ok(loaded)
}

pub fn load_shareholder_json(filepath: &str) -> io::Result<(GroupParams, PublicKey, Keyshare)> {
    let json: ShareholderJson = read_json(filepath)?;
    let params = json_to_params(&json.params).map_err(invalid_data)?;
    let pk = json_to_public_key(&json.public_key, &params).map_err(invalid_data)?;
    let share = json_to_keyshare(&json.keyshare, &params).map_err(invalid_data)?;
    info!(path = filepath, x = share.x, "part de clé chargée");
    Ok((params, pk, share))
}

// ============================================================================
// Utilitaires
// ============================================================================

pub fn key_file_exists(filepath: &str) -> bool {
    Path::new(filepath).exists()
}

pub fn ensure_keys_directory(dir_path: &str) -> io::Result<()> {
    if !Path::new(dir_path).exists() {
        fs::create_dir_all(dir_path)?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::elgamal::eg_keygen::eg_keygen;
    use crate::threshold::generate_shares;
    use rand::rngs::StdRng;
    use rand::SeedableRng;
    use std::path::PathBuf;

    const P64: u64 = 9223372036854803519;
    const Q64: u64 = 4611686018427401759;

    fn params64() -> GroupParams {
        GroupParams::with_subgroup_order(P64.into(), 4u32.into(), Q64.into()).unwrap()
    }

    fn temp_path(name: &str) -> PathBuf {
        std::env::temp_dir().join(format!("elgamal_crypto_{}_{name}", std::process::id()))
    }

    #[test]
    fn test_hex_limits() {
        assert_eq!(hex_to_biguint("ff"), Ok(BigUint::from(255u32)));
        assert_eq!(hex_to_biguint("zz"), Err(CryptoError::HexParseError));
        let long = "F".repeat(MAX_HEX_FIELD_LEN + 1);
        assert!(matches!(hex_to_biguint(&long), Err(CryptoError::FieldTooLong { .. })));
    }

    #[test]
    fn test_params_revalidated_on_load() {
        let params = params64().with_exponentiation(Exponentiation::FixedSchedule);
        let json = params_to_json(&params);
        assert_eq!(json_to_params(&json).unwrap(), params);

        let mut composite = json.clone();
        composite.p = biguint_to_hex(&BigUint::from(P64 + 2));
        assert!(matches!(json_to_params(&composite), Err(CryptoError::InvalidParameters(_))));

        let mut wrong_order = json;
        wrong_order.g = "11".into();
        assert!(json_to_params(&wrong_order).is_err());
    }

    #[test]
    fn test_keypair_file_roundtrip() {
        let mut rng = StdRng::seed_from_u64(51);
        let params = params64();
        let kp = eg_keygen(&params, &mut rng);
        let path = temp_path("keypair.json");
        let path = path.to_str().unwrap();

        save_keypair_json(&params, &kp, path).unwrap();
        assert!(key_file_exists(path));
        let (loaded_params, loaded) = load_keypair_json(path).unwrap();
        fs::remove_file(path).unwrap();

        assert_eq!(loaded_params, params);
        assert_eq!(loaded.public_key, kp.public_key);
        assert_eq!(loaded.private_key.a, kp.private_key.a);
    }

    #[test]
    fn test_tampered_public_key_rejected() {
        let mut rng = StdRng::seed_from_u64(52);
        let params = params64();
        let kp = eg_keygen(&params, &mut rng);

        let mut json = keypair_to_json(&params, &kp);
        json.public_key.g_a = biguint_to_hex(&BigUint::from(P64));
        assert!(matches!(json_to_keypair(&json), Err(CryptoError::KeyCoherenceError)));

        let mut json = keypair_to_json(&params, &kp);
        json.public_key.g_a = biguint_to_hex(&((&kp.public_key.g_a * 4u32) % params.p()));
        assert!(matches!(json_to_keypair(&json), Err(CryptoError::KeyCoherenceError)));
    }

    #[test]
    fn test_shareholder_file_roundtrip() {
        let mut rng = StdRng::seed_from_u64(53);
        let params = params64();
        let kp = eg_keygen(&params, &mut rng);
        let shares = generate_shares(&kp.private_key, 2, 3, &params, &mut rng).unwrap();
        let path = temp_path("share2.json");
        let path = path.to_str().unwrap();

        save_shareholder_json(&params, &kp.public_key, &shares[1], path).unwrap();
        let (loaded_params, pk, share) = load_shareholder_json(path).unwrap();
        fs::remove_file(path).unwrap();

        assert_eq!(loaded_params, params);
        assert_eq!(pk, kp.public_key);
        assert_eq!(share.x, 2);
        assert_eq!(share.y, shares[1].y);
    }

    #[test]
    fn test_keyshare_outside_exponent_order_rejected() {
        let params = params64();
        let json = KeyshareJson { x: 1, y: biguint_to_hex(&BigUint::from(Q64)) };
        assert!(matches!(json_to_keyshare(&json, &params), Err(CryptoError::KeyCoherenceError)));
        let json = KeyshareJson { x: 0, y: "1".into() };
        assert!(matches!(json_to_keyshare(&json, &params), Err(CryptoError::KeyCoherenceError)));
    }

    #[test]
    fn test_oversized_file_rejected() {
        let path = temp_path("huge.json");
        fs::write(&path, vec![b' '; MAX_KEY_FILE_BYTES as usize + 1]).unwrap();
        let err = load_params_json(path.to_str().unwrap()).unwrap_err();
        fs::remove_file(&path).unwrap();
        assert_eq!(err.kind(), io::ErrorKind::InvalidData);
    }
}
