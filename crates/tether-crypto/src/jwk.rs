use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use base64::Engine;

use crate::crypto::{CryptoError, SymmetricKey};

pub(crate) fn b64url_encode(bytes: &[u8]) -> String {
    URL_SAFE_NO_PAD.encode(bytes)
}

pub(crate) fn b64url_decode(raw: &str) -> Result<Vec<u8>, CryptoError> {
    URL_SAFE_NO_PAD
        .decode(raw)
        .map_err(|_| CryptoError::KeyFormat("field is not base64url".to_string()))
}

/// JWK for a group's AES-256-GCM key, the form it takes inside a wrapped
/// `encSymmetricKey` blob.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct SymmetricJwk {
    pub kty: String,
    pub alg: String,
    pub ext: bool,
    pub key_ops: Vec<String>,
    pub k: String,
}

impl SymmetricJwk {
    #[must_use]
    pub fn from_key(key: &SymmetricKey) -> Self {
        Self {
            kty: "oct".to_string(),
            alg: "A256GCM".to_string(),
            ext: true,
            key_ops: vec!["encrypt".to_string(), "decrypt".to_string()],
            k: b64url_encode(key.as_bytes()),
        }
    }

    pub fn to_key(&self) -> Result<SymmetricKey, CryptoError> {
        if self.alg != "A256GCM" {
            return Err(CryptoError::KeyFormat(
                "symmetric key algorithm was not A256GCM".to_string(),
            ));
        }
        if self.kty != "oct" {
            return Err(CryptoError::KeyFormat(
                "symmetric key type was not oct".to_string(),
            ));
        }
        let bytes = b64url_decode(&self.k)?;
        let bytes: [u8; 32] = bytes
            .try_into()
            .map_err(|_| CryptoError::KeyFormat("symmetric key must be 256 bits".to_string()))?;
        Ok(SymmetricKey::from_bytes(bytes))
    }

    pub fn to_json(&self) -> Result<String, CryptoError> {
        serde_json::to_string(self).map_err(|err| CryptoError::KeyFormat(err.to_string()))
    }

    pub fn from_json(raw: &str) -> Result<Self, CryptoError> {
        serde_json::from_str(raw).map_err(|err| CryptoError::KeyFormat(err.to_string()))
    }
}

/// Public half of an account's RSA-OAEP-256 key pair.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct PublicKeyJwk {
    pub kty: String,
    pub alg: String,
    pub key_ops: Vec<String>,
    pub e: String,
    pub n: String,
}

impl PublicKeyJwk {
    pub(crate) fn check_for_encrypt(&self) -> Result<(), CryptoError> {
        if self.alg != "RSA-OAEP-256" {
            return Err(CryptoError::KeyFormat(
                "public key algorithm was not RSA-OAEP-256".to_string(),
            ));
        }
        if self.kty != "RSA" {
            return Err(CryptoError::KeyFormat(
                "public key type was not RSA".to_string(),
            ));
        }
        if !self.key_ops.iter().any(|op| op == "encrypt") {
            return Err(CryptoError::KeyFormat(
                "public key does not have the encrypt op".to_string(),
            ));
        }
        Ok(())
    }
}

/// Private half of an account's RSA-OAEP-256 key pair. Held only in memory
/// for the lifetime of a session.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct PrivateKeyJwk {
    pub kty: String,
    pub alg: String,
    pub key_ops: Vec<String>,
    pub d: String,
    pub dp: String,
    pub dq: String,
    pub e: String,
    pub n: String,
    pub p: String,
    pub q: String,
    pub qi: String,
}

impl PrivateKeyJwk {
    pub(crate) fn check_for_decrypt(&self) -> Result<(), CryptoError> {
        if self.alg != "RSA-OAEP-256" {
            return Err(CryptoError::KeyFormat(
                "private key algorithm was not RSA-OAEP-256".to_string(),
            ));
        }
        if self.kty != "RSA" {
            return Err(CryptoError::KeyFormat(
                "private key type was not RSA".to_string(),
            ));
        }
        if !self.key_ops.iter().any(|op| op == "decrypt") {
            return Err(CryptoError::KeyFormat(
                "private key does not have the decrypt op".to_string(),
            ));
        }
        Ok(())
    }
}
