use rand::rngs::OsRng;
use rsa::traits::{PrivateKeyParts, PublicKeyParts};
use rsa::{BigUint, Oaep, RsaPrivateKey, RsaPublicKey};
use sha2::Sha256;
use tracing::instrument;

use crate::crypto::{CryptoError, SymmetricKey};
use crate::jwk::{b64url_decode, b64url_encode, PrivateKeyJwk, PublicKeyJwk, SymmetricJwk};

const RSA_BITS: usize = 2048;
const RSA_EXPONENT: u32 = 65537;

fn biguint_field(raw: &str, name: &str) -> Result<BigUint, CryptoError> {
    let bytes = b64url_decode(raw)
        .map_err(|_| CryptoError::KeyFormat(format!("{name} is not base64url")))?;
    Ok(BigUint::from_bytes_be(&bytes))
}

/// Seal a payload under an account public key with RSA-OAEP over SHA-256.
/// Returns hex ciphertext. OAEP caps the payload at k - 2h - 2 bytes, which
/// holds a symmetric JWK with room to spare.
#[instrument(level = "debug", skip_all, fields(payload_len = payload.len()))]
pub fn wrap_with_public_jwk(jwk: &PublicKeyJwk, payload: &str) -> Result<String, CryptoError> {
    jwk.check_for_encrypt()?;

    let n = biguint_field(&jwk.n, "n")?;
    let e = biguint_field(&jwk.e, "e")?;
    let public_key =
        RsaPublicKey::new(n, e).map_err(|err| CryptoError::KeyFormat(err.to_string()))?;

    let sealed = public_key
        .encrypt(&mut OsRng, Oaep::new::<Sha256>(), payload.as_bytes())
        .map_err(|_| CryptoError::Encrypt)?;
    Ok(hex::encode(sealed))
}

/// Open an RSA-OAEP blob with the account private key.
#[instrument(level = "debug", skip_all)]
pub fn unwrap_with_private_jwk(jwk: &PrivateKeyJwk, blob: &str) -> Result<String, CryptoError> {
    jwk.check_for_decrypt()?;

    let n = biguint_field(&jwk.n, "n")?;
    let e = biguint_field(&jwk.e, "e")?;
    let d = biguint_field(&jwk.d, "d")?;
    let p = biguint_field(&jwk.p, "p")?;
    let q = biguint_field(&jwk.q, "q")?;
    let private_key = RsaPrivateKey::from_components(n, e, d, vec![p, q])
        .map_err(|err| CryptoError::KeyFormat(err.to_string()))?;

    let sealed =
        hex::decode(blob).map_err(|_| CryptoError::Envelope("blob is not hex".to_string()))?;
    let payload = private_key
        .decrypt(Oaep::new::<Sha256>(), &sealed)
        .map_err(|_| CryptoError::Authentication)?;
    String::from_utf8(payload)
        .map_err(|_| CryptoError::Envelope("wrapped payload is not utf-8".to_string()))
}

/// Wrap a group key for one account member.
pub fn wrap_symmetric_key(
    account_public: &PublicKeyJwk,
    key: &SymmetricKey,
) -> Result<String, CryptoError> {
    let jwk = SymmetricJwk::from_key(key);
    wrap_with_public_jwk(account_public, &jwk.to_json()?)
}

/// Recover a group key from its wrapped blob.
pub fn unwrap_symmetric_key(
    account_private: &PrivateKeyJwk,
    blob: &str,
) -> Result<SymmetricKey, CryptoError> {
    let raw = unwrap_with_private_jwk(account_private, blob)?;
    SymmetricJwk::from_json(&raw)?.to_key()
}

/// Generate a fresh RSA-OAEP-256 account key pair as JWKs.
#[instrument(level = "debug", skip_all)]
pub fn generate_account_key_pair() -> Result<(PublicKeyJwk, PrivateKeyJwk), CryptoError> {
    let mut private_key =
        RsaPrivateKey::new_with_exp(&mut OsRng, RSA_BITS, &BigUint::from(RSA_EXPONENT))
            .map_err(|err| CryptoError::KeyFormat(err.to_string()))?;
    private_key
        .precompute()
        .map_err(|err| CryptoError::KeyFormat(err.to_string()))?;

    let n = b64url_encode(&private_key.n().to_bytes_be());
    let e = b64url_encode(&private_key.e().to_bytes_be());

    let public = PublicKeyJwk {
        kty: "RSA".to_string(),
        alg: "RSA-OAEP-256".to_string(),
        key_ops: vec!["encrypt".to_string()],
        e: e.clone(),
        n: n.clone(),
    };

    let primes = private_key.primes();
    let dp = private_key
        .dp()
        .ok_or_else(|| CryptoError::KeyFormat("key pair is missing dp".to_string()))?;
    let dq = private_key
        .dq()
        .ok_or_else(|| CryptoError::KeyFormat("key pair is missing dq".to_string()))?;
    let qi = private_key
        .qinv()
        .and_then(|qi| qi.to_biguint())
        .ok_or_else(|| CryptoError::KeyFormat("key pair is missing qi".to_string()))?;

    let private = PrivateKeyJwk {
        kty: "RSA".to_string(),
        alg: "RSA-OAEP-256".to_string(),
        key_ops: vec!["decrypt".to_string()],
        d: b64url_encode(&private_key.d().to_bytes_be()),
        dp: b64url_encode(&dp.to_bytes_be()),
        dq: b64url_encode(&dq.to_bytes_be()),
        e,
        n,
        p: b64url_encode(&primes[0].to_bytes_be()),
        q: b64url_encode(&primes[1].to_bytes_be()),
        qi: b64url_encode(&qi.to_bytes_be()),
    };

    Ok((public, private))
}
