// =========================================================
// Démonstrations — ElGamal, variante exponentielle,
// déchiffrement à seuil et transfert inconscient 1 parmi 2
// (menu interactif, mesures de durée)
// =========================================================

// ── ElGamal ───────────────────────────────────────────────
use elgamal_crypto::elgamal::eg_keygen::eg_keygen;
use elgamal_crypto::elgamal::eg_encrypt::{eg_encrypt, eg_encrypt_exponent};
use elgamal_crypto::elgamal::eg_decrypt::{eg_decrypt, eg_decrypt_exponent};
use elgamal_crypto::elgamal::eg_homomorphic::{eg_mul, eg_pow};

// ── Seuil et transfert inconscient ────────────────────────
use elgamal_crypto::threshold::{generate_shares, reconstruct_from_shares, DecryptShare};
use elgamal_crypto::oblivious_transfer::{ObliviousTransfer, OtConfig, Transport};

// ── Gestion des clés ──────────────────────────────────────
use elgamal_crypto::key_management::{
    key_file_exists, ensure_keys_directory,
    save_keypair_json, save_shareholder_json,
    load_keypair_json,
};

// ── Types et erreurs ──────────────────────────────────────
use elgamal_crypto::{CryptoError, GroupParams, KeyPair};

// ── Stdlib & crates externes ──────────────────────────────
use num_bigint::{BigUint, RandBigInt};
use rand::Rng;
use rand_core::OsRng;
use std::io::{self, Write};
use std::thread;
use std::time::{Duration, Instant};
use tracing_subscriber::EnvFilter;

// ── Chemins des fichiers de clés ──────────────────────────
const KEYS_DIR:          &str = "keys";
const KEYPAIR_JSON_PATH: &str = "keys/keypair.json";

// Taille du module des démonstrations
const DEMO_MODULUS_BITS: u64 = 512;

// Indices proposés par l'émetteur dans la démonstration OT
const OT_INDICES: (u64, u64) = (10, 20);

// ─────────────────────────────────────────────────────────
// Erreur applicative centrale
// ─────────────────────────────────────────────────────────

#[derive(Debug)]
enum AppError {
    Crypto(CryptoError),
    Io(std::io::Error),
    Demo(&'static str),
}

impl std::fmt::Display for AppError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            AppError::Crypto(e) => write!(f, "Erreur cryptographique : {}", e),
            AppError::Io(e)     => write!(f, "Erreur I/O : {}", e),
            AppError::Demo(r)   => write!(f, "Démonstration interrompue : {}", r),
        }
    }
}

impl From<CryptoError> for AppError {
    fn from(e: CryptoError) -> Self { AppError::Crypto(e) }
}

impl From<std::io::Error> for AppError {
    fn from(e: std::io::Error) -> Self { AppError::Io(e) }
}

// ─────────────────────────────────────────────────────────
// Point d'entrée
// ─────────────────────────────────────────────────────────

fn main() {
    // RUST_LOG=debug pour suivre le protocole OT et le stockage des clés
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")))
        .init();

    if let Err(e) = ensure_keys_directory(KEYS_DIR) {
        eprintln!("[FATAL] Impossible de créer le répertoire keys/ : {}", e);
        std::process::exit(1);
    }

    loop {
        afficher_menu();
        let choix = lire_choix();

        let res = match choix.as_str() {
            "1" => demonstration_elgamal(),
            "2" => demonstration_exponentielle(),
            "3" => demonstration_seuil(),
            "4" => demonstration_transfert_inconscient(),
            "5" => { println!("\nAu revoir !\n"); break; }
            _   => { println!("\nChoix invalide. Veuillez choisir entre 1 et 5.\n"); continue; }
        };

        if let Err(e) = res {
            eprintln!("\n[ERREUR] {}\n", e);
        }

        println!("\nAppuyez sur Entrée pour continuer...");
        let mut pause = String::new();
        io::stdin().read_line(&mut pause).ok();
    }
}

// ─────────────────────────────────────────────────────────
// Menu
// ─────────────────────────────────────────────────────────

fn afficher_menu() {
    println!("\n╔═══════════════════════════════════════════════╗");
    println!("║   ELGAMAL — MENU DES DÉMONSTRATIONS           ║");
    println!("╚═══════════════════════════════════════════════╝");
    println!("\n  [1] ElGamal — homomorphisme multiplicatif");
    println!("  [2] ElGamal exponentiel — addition des exposants");
    println!("  [3] Déchiffrement à seuil (2 parmi 3)");
    println!("  [4] Transfert inconscient 1 parmi 2");
    println!("  [5] Quitter\n");
    print!("Votre choix : ");
    io::stdout().flush().ok();
}

fn lire_choix() -> String {
    let mut input = String::new();
    io::stdin().read_line(&mut input).ok();
    input.trim().to_string()
}

// ─────────────────────────────────────────────────────────
// Gestion des clés : chargement ou génération + sauvegarde
// ─────────────────────────────────────────────────────────

fn charger_ou_generer_cles() -> Result<(GroupParams, KeyPair, Option<Duration>), AppError> {
    if key_file_exists(KEYPAIR_JSON_PATH) {
        println!("\n  Clés existantes détectées — chargement...");
        let t = Instant::now();
        match load_keypair_json(KEYPAIR_JSON_PATH) {
            Ok((params, kp)) => {
                println!("  Clés chargées depuis le disque ({:.3?})\n", t.elapsed());
                return Ok((params, kp, None));
            }
            Err(e) => println!("  Erreur de chargement ({}) — regénération...", e),
        }
    } else {
        println!("\n  Aucune clé trouvée — génération ({} bits)...", DEMO_MODULUS_BITS);
    }

    let mut rng = OsRng;
    let t       = Instant::now();
    let params  = GroupParams::generate(DEMO_MODULUS_BITS, &mut rng)?;
    let keypair = eg_keygen(&params, &mut rng);
    let duree   = t.elapsed();
    println!("  Paramètres et clés générés ({} bits) — temps : {:.3?}\n", DEMO_MODULUS_BITS, duree);

    save_keypair_json(&params, &keypair, KEYPAIR_JSON_PATH)?;
    println!("  Clés sauvegardées dans {}/\n", KEYS_DIR);

    Ok((params, keypair, Some(duree)))
}

fn afficher_cles(params: &GroupParams, kp: &KeyPair) {
    println!("--- PARAMÈTRES ---");
    println!("  |p|         = {} bits", params.modulus_bits());
    println!("  g           = {}", params.g());
    println!("--- CLÉ PUBLIQUE ---");
    println!("  |A|         = {} bits", kp.public_key.g_a.bits());
    println!("--- CLÉ PRIVÉE ---");
    println!("  |a|         = {} bits", kp.private_key.a.bits());
}

fn afficher_keygen(duree_keygen: Option<Duration>) {
    match duree_keygen {
        Some(d) => println!("  Génération des clés    : {:.3?}  (nouvelle génération)", d),
        None    => println!("  Génération des clés    : —  (chargées depuis le disque)"),
    }
}

// ─────────────────────────────────────────────────────────
// [1] ElGamal — Enc(m1)·Enc(m2) = Enc(m1·m2), Enc(m)^k = Enc(m^k)
// ─────────────────────────────────────────────────────────

fn demonstration_elgamal() -> Result<(), AppError> {
    println!("\n==============================================");
    println!("    ElGamal — Démonstration");
    println!("==============================================");

    let (params, kp, duree_keygen) = charger_ou_generer_cles()?;
    afficher_cles(&params, &kp);

    // Messages dans [1, p)
    let mut rng = OsRng;
    let m1      = rng.gen_biguint_range(&BigUint::from(1u32), params.p());
    let m2      = rng.gen_biguint_range(&BigUint::from(1u32), params.p());
    let k       = BigUint::from(3u32);

    let t            = Instant::now();
    let c1           = eg_encrypt(&m1, &kp.public_key, &params, &mut rng)?;
    let duree_enc_m1 = t.elapsed();

    let t            = Instant::now();
    let c2           = eg_encrypt(&m2, &kp.public_key, &params, &mut rng)?;
    let duree_enc_m2 = t.elapsed();

    let t             = Instant::now();
    let c_produit     = eg_mul(&c1, &c2, &params);
    let duree_mul     = t.elapsed();

    let t             = Instant::now();
    let dec_produit   = eg_decrypt(&c_produit, &kp.private_key, &params)?;
    let duree_dec     = t.elapsed();

    if dec_produit == (&m1 * &m2) % params.p() {
        println!("\n Homomorphisme multiplicatif vérifié : D(E(m1)·E(m2)) = m1·m2 mod p");
    } else {
        println!("\n Erreur dans l'homomorphisme multiplicatif !");
    }

    let c_puissance = eg_pow(&c1, &k, &params);
    if eg_decrypt(&c_puissance, &kp.private_key, &params)? == m1.modpow(&k, params.p()) {
        println!(" Puissance vérifiée : D(E(m1)^3) = m1^3 mod p");
    } else {
        println!(" Erreur dans la mise à la puissance !");
    }

    println!("\n==============================================");
    println!("    RÉSUMÉ DES TEMPS — ElGamal");
    println!("==============================================");
    afficher_keygen(duree_keygen);
    println!("  Chiffrement m1         : {:.3?}", duree_enc_m1);
    println!("  Chiffrement m2         : {:.3?}", duree_enc_m2);
    println!("  Produit homomorphe     : {:.3?}", duree_mul);
    println!("  Déchiffrement          : {:.3?}", duree_dec);
    println!("==============================================");

    Ok(())
}

// ─────────────────────────────────────────────────────────
// [2] ElGamal exponentiel — E(2^x1)·E(2^x2) = E(2^(x1+x2))
// ─────────────────────────────────────────────────────────

fn demonstration_exponentielle() -> Result<(), AppError> {
    println!("\n==============================================");
    println!("  ElGamal exponentiel — Démonstration");
    println!("==============================================");

    let (params, kp, duree_keygen) = charger_ou_generer_cles()?;

    // x1 + x2 < modulus_bits pour rester décodable
    let mut rng = OsRng;
    let borne   = params.modulus_bits() / 2;
    let x1      = rng.gen_range(0..borne);
    let x2      = rng.gen_range(0..borne);
    println!("\n  x1 = {}, x2 = {}", x1, x2);

    let t         = Instant::now();
    let c1        = eg_encrypt_exponent(x1, &kp.public_key, &params, &mut rng)?;
    let c2        = eg_encrypt_exponent(x2, &kp.public_key, &params, &mut rng)?;
    let duree_enc = t.elapsed();

    let c_somme   = eg_mul(&c1, &c2, &params);

    let t         = Instant::now();
    let somme     = eg_decrypt_exponent(&c_somme, &kp.private_key, &params)?;
    let duree_dec = t.elapsed();

    if somme == x1 + x2 {
        println!("  Addition vérifiée : D(E(2^x1)·E(2^x2)) = 2^{}", somme);
    } else {
        println!("  Erreur dans l'addition des exposants !");
    }

    println!("\n==============================================");
    println!("    RÉSUMÉ DES TEMPS — ElGamal exponentiel");
    println!("==============================================");
    afficher_keygen(duree_keygen);
    println!("  Deux chiffrements      : {:.3?}", duree_enc);
    println!("  Déchiffrement + log    : {:.3?}", duree_dec);
    println!("==============================================");

    Ok(())
}

// ─────────────────────────────────────────────────────────
// [3] Déchiffrement à seuil — 2 parmi 3
// ─────────────────────────────────────────────────────────

fn demonstration_seuil() -> Result<(), AppError> {
    println!("\n==============================================");
    println!("  Déchiffrement à seuil (2 parmi 3)");
    println!("==============================================");

    let (params, kp, _) = charger_ou_generer_cles()?;
    let mut rng = OsRng;

    let t            = Instant::now();
    let keyshares    = generate_shares(&kp.private_key, 2, 3, &params, &mut rng)?;
    let duree_shares = t.elapsed();
    for share in &keyshares {
        save_shareholder_json(
            &params,
            &kp.public_key,
            share,
            &format!("{}/share_{}.json", KEYS_DIR, share.x),
        )?;
    }
    println!("\n  3 parts générées ({:.3?}) et sauvegardées dans {}/", duree_shares, KEYS_DIR);

    let m  = rng.gen_biguint_range(&BigUint::from(1u32), params.p());
    let ct = eg_encrypt(&m, &kp.public_key, &params, &mut rng)?;
    let decrypt_shares: Vec<DecryptShare> =
        keyshares.iter().map(|k| k.decrypt_share(&params, &ct)).collect();

    for (i, j) in [(0, 1), (0, 2), (1, 2)] {
        let quorum = [decrypt_shares[i].clone(), decrypt_shares[j].clone()];
        let t      = Instant::now();
        let dec    = reconstruct_from_shares(&ct, &quorum, 2, &params)?;
        let statut = if dec == m { "OK" } else { "ÉCHEC" };
        println!("  Parts {{{}, {}}} : {} ({:.3?})", quorum[0].x, quorum[1].x, statut, t.elapsed());
    }

    match reconstruct_from_shares(&ct, &decrypt_shares[..1], 2, &params) {
        Err(e) => println!("  Une seule part : refusée ({})", e),
        Ok(_)  => println!("  Une seule part : acceptée — anomalie !"),
    }

    Ok(())
}

// ─────────────────────────────────────────────────────────
// [4] Transfert inconscient — émetteur sur un thread dédié
// ─────────────────────────────────────────────────────────

fn demonstration_transfert_inconscient() -> Result<(), AppError> {
    println!("\n==============================================");
    println!("  Transfert inconscient 1 parmi 2");
    println!("==============================================");

    let (params, kp, _) = charger_ou_generer_cles()?;
    let mut rng = OsRng;
    let mut keyshares = generate_shares(&kp.private_key, 2, 2, &params, &mut rng)?;
    let (i0, i1) = OT_INDICES;

    print!("\n  Bit de sélection (1 → i0 = {}, 0 → i1 = {}) : ", i0, i1);
    io::stdout().flush().ok();
    let bit = lire_choix() != "0";

    let config = OtConfig::default();
    let (sender_end, receiver_end) = Transport::pair();
    let receiver_share = keyshares.pop().ok_or(AppError::Demo("part du receveur absente"))?;
    let sender_share = keyshares.pop().ok_or(AppError::Demo("part de l'émetteur absente"))?;

    let mut sender = ObliviousTransfer::new(
        params.clone(), kp.public_key.clone(), sender_share, sender_end, config,
    )?;
    let mut receiver = ObliviousTransfer::new(
        params, kp.public_key.clone(), receiver_share, receiver_end, config,
    )?;

    let t = Instant::now();
    let emetteur = thread::spawn(move || sender.send_1_of_2(i0, i1, &mut OsRng));
    let index = receiver.receive_1_of_2(bit, &mut rng)?;
    emetteur.join().map_err(|_| AppError::Demo("panique de l'émetteur"))??;

    println!("\n  Le receveur obtient l'indice {} ({:.3?})", index, t.elapsed());
    println!("  L'émetteur n'a vu qu'un chiffré de 2^0 ou 2^1.");

    Ok(())
}
