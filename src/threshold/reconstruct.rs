use num_bigint::BigUint;
use num_traits::One;

use crate::crypto_error::{CryptoError, ShareSetError};
use crate::elgamal::ciphertext::Ciphertext;
use crate::elgamal::params::GroupParams;
use crate::threshold::decrypt_share::DecryptShare;
use crate::threshold::lagrange::{check_coordinates, lagrange_factor};

// ============================================================================
// Déchiffrement à seuil
//
// AB = ∏ share_i^(L_i) = g^(ab) mod p, puis m = c · AB^(-1) mod p.
// Au moins `threshold` parts d'abscisses distinctes sont exigées.
// ============================================================================
pub fn reconstruct_from_shares(
    ct: &Ciphertext,
    shares: &[DecryptShare],
    threshold: u32,
    params: &GroupParams,
) -> Result<BigUint, CryptoError> {
    if shares.is_empty() {
        return Err(ShareSetError::Empty.into());
    }
    let xs: Vec<u32> = shares.iter().map(|s| s.x).collect();
    check_coordinates(&xs)?;
    if shares.len() < threshold as usize {
        return Err(ShareSetError::InsufficientQuorum {
            provided: shares.len(),
            required: threshold as usize,
        }
        .into());
    }

    let mut shared = BigUint::one();
    for share in shares {
        let factor = lagrange_factor(share.x, &xs, params)?;
        shared = (shared * params.mod_exp_signed(&share.share, &factor)?) % params.p();
    }

    let shared_inv = params.mod_inv(&shared)?;
    Ok((&ct.masked * shared_inv) % params.p())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::elgamal::eg_encrypt::{eg_encrypt, eg_encrypt_exponent};
    use crate::elgamal::eg_keygen::eg_keygen;
    use crate::threshold::keyshare::generate_shares;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    const P64: u64 = 9223372036854803519;
    const Q64: u64 = 4611686018427401759;

    fn params64() -> GroupParams {
        GroupParams::with_subgroup_order(P64.into(), 4u32.into(), Q64.into()).unwrap()
    }

    #[test]
    fn test_every_quorum_of_two_out_of_three() {
        let mut rng = StdRng::seed_from_u64(21);
        let params = params64();
        let kp = eg_keygen(&params, &mut rng);
        let keyshares = generate_shares(&kp.private_key, 2, 3, &params, &mut rng).unwrap();

        let m = BigUint::from(424242u32);
        let ct = eg_encrypt(&m, &kp.public_key, &params, &mut rng).unwrap();
        let shares: Vec<DecryptShare> =
            keyshares.iter().map(|k| k.decrypt_share(&params, &ct)).collect();

        for (i, j) in [(0, 1), (0, 2), (1, 2), (1, 0), (2, 0)] {
            let quorum = [shares[i].clone(), shares[j].clone()];
            assert_eq!(reconstruct_from_shares(&ct, &quorum, 2, &params), Ok(m.clone()));
        }
        assert_eq!(reconstruct_from_shares(&ct, &shares, 2, &params), Ok(m));
    }

    #[test]
    fn test_three_of_five_exponential() {
        let mut rng = StdRng::seed_from_u64(22);
        let params = params64();
        let kp = eg_keygen(&params, &mut rng);
        let keyshares = generate_shares(&kp.private_key, 3, 5, &params, &mut rng).unwrap();

        let ct = eg_encrypt_exponent(37, &kp.public_key, &params, &mut rng).unwrap();
        let shares: Vec<DecryptShare> = [4usize, 0, 2]
            .iter()
            .map(|&i| keyshares[i].decrypt_share(&params, &ct))
            .collect();
        let m = reconstruct_from_shares(&ct, &shares, 3, &params).unwrap();
        assert_eq!(params.decode_exponent(&m), Ok(37));
    }

    #[test]
    fn test_full_group_order_rejects_half_coefficient() {
        let mut rng = StdRng::seed_from_u64(23);
        let params = GroupParams::new(64151u32.into(), 11u32.into()).unwrap();
        let kp = eg_keygen(&params, &mut rng);
        let keyshares = generate_shares(&kp.private_key, 2, 3, &params, &mut rng).unwrap();

        let m = BigUint::from(42u32);
        let ct = eg_encrypt(&m, &kp.public_key, &params, &mut rng).unwrap();
        let share = |i: usize| keyshares[i].decrypt_share(&params, &ct);

        // coefficients entiers : {1, 2} et {2, 3}
        assert_eq!(reconstruct_from_shares(&ct, &[share(0), share(1)], 2, &params), Ok(m.clone()));
        assert_eq!(reconstruct_from_shares(&ct, &[share(1), share(2)], 2, &params), Ok(m));
        // {1, 3} : L_1 = 3/2 avec exponent_order pair
        assert_eq!(
            reconstruct_from_shares(&ct, &[share(0), share(2)], 2, &params),
            Err(CryptoError::InvalidShareSet(ShareSetError::NonIntegralLagrange { x: 1 }))
        );
    }

    #[test]
    fn test_rejects_bad_share_sets() {
        let mut rng = StdRng::seed_from_u64(24);
        let params = params64();
        let kp = eg_keygen(&params, &mut rng);
        let keyshares = generate_shares(&kp.private_key, 2, 3, &params, &mut rng).unwrap();
        let ct = eg_encrypt(&BigUint::from(5u32), &kp.public_key, &params, &mut rng).unwrap();
        let first = keyshares[0].decrypt_share(&params, &ct);

        assert_eq!(
            reconstruct_from_shares(&ct, &[], 2, &params),
            Err(CryptoError::InvalidShareSet(ShareSetError::Empty))
        );
        assert_eq!(
            reconstruct_from_shares(&ct, &[first.clone()], 2, &params),
            Err(CryptoError::InvalidShareSet(ShareSetError::InsufficientQuorum {
                provided: 1,
                required: 2,
            }))
        );
        assert_eq!(
            reconstruct_from_shares(&ct, &[first.clone(), first], 2, &params),
            Err(CryptoError::InvalidShareSet(ShareSetError::DuplicateCoordinate { x: 1 }))
        );
    }

    // Une part forgée en x = 0 ne doit jamais entrer dans la combinaison :
    // avec un seuil de 1 elle suffirait, seule, à déchiffrer.
    #[test]
    fn test_rejects_share_at_zero() {
        let mut rng = StdRng::seed_from_u64(25);
        let params = params64();
        let kp = eg_keygen(&params, &mut rng);
        let keyshares = generate_shares(&kp.private_key, 2, 3, &params, &mut rng).unwrap();
        let ct = eg_encrypt(&BigUint::from(5u32), &kp.public_key, &params, &mut rng).unwrap();

        let forged = DecryptShare::new(0, params.mod_exp(&ct.ephemeral, &kp.private_key.a));
        let honest = keyshares[1].decrypt_share(&params, &ct);
        for threshold in [1, 2] {
            assert_eq!(
                reconstruct_from_shares(&ct, &[forged.clone(), honest.clone()], threshold, &params),
                Err(CryptoError::InvalidShareSet(ShareSetError::ZeroCoordinate))
            );
        }
        assert_eq!(
            reconstruct_from_shares(&ct, &[forged], 1, &params),
            Err(CryptoError::InvalidShareSet(ShareSetError::ZeroCoordinate))
        );
    }
}
