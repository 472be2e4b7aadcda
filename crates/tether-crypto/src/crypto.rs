use aes_gcm::aead::{Aead, KeyInit, Payload};
use aes_gcm::{Aes256Gcm, Nonce};
use rand::rngs::OsRng;
use rand::RngCore;
use tracing::instrument;
use zeroize::{Zeroize, ZeroizeOnDrop};

const GCM_IV_LEN: usize = 12;
const GCM_TAG_LEN: usize = 16;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CryptoError {
    KeyFormat(String),
    Envelope(String),
    Encrypt,
    Authentication,
}

impl std::fmt::Display for CryptoError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::KeyFormat(detail) => write!(f, "bad key material: {detail}"),
            Self::Envelope(detail) => write!(f, "malformed envelope: {detail}"),
            Self::Encrypt => write!(f, "encryption failed"),
            Self::Authentication => write!(f, "failed to decrypt data"),
        }
    }
}

impl std::error::Error for CryptoError {}

/// Raw 256-bit group key. Wiped on drop, never printed.
#[derive(Clone, Zeroize, ZeroizeOnDrop)]
pub struct SymmetricKey([u8; 32]);

impl SymmetricKey {
    #[must_use]
    pub fn generate() -> Self {
        let mut bytes = [0u8; 32];
        OsRng.fill_bytes(&mut bytes);
        Self(bytes)
    }

    #[must_use]
    pub const fn from_bytes(bytes: [u8; 32]) -> Self {
        Self(bytes)
    }

    #[must_use]
    pub const fn as_bytes(&self) -> &[u8; 32] {
        &self.0
    }
}

impl std::fmt::Debug for SymmetricKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "SymmetricKey(REDACTED)")
    }
}

/// AES-256-GCM envelope as it travels on the wire: hex-encoded IV, tag,
/// ciphertext, and associated data.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct CipherEnvelope {
    pub iv: String,
    pub t: String,
    pub d: String,
    pub ad: String,
}

impl CipherEnvelope {
    pub fn to_json(&self) -> Result<String, CryptoError> {
        serde_json::to_string(self).map_err(|err| CryptoError::Envelope(err.to_string()))
    }

    pub fn from_json(raw: &str) -> Result<Self, CryptoError> {
        serde_json::from_str(raw).map_err(|err| CryptoError::Envelope(err.to_string()))
    }
}

/// Encrypt a document string under a group key.
///
/// The plaintext is percent-escaped first so arbitrary unicode survives the
/// round trip on every client, then sealed with a fresh 96-bit IV and a
/// 128-bit tag.
#[instrument(
    level = "debug",
    skip(key, plaintext, aad),
    fields(plaintext_len = plaintext.len(), aad_len = aad.len())
)]
pub fn encrypt(
    key: &SymmetricKey,
    plaintext: &str,
    aad: &str,
) -> Result<CipherEnvelope, CryptoError> {
    let cipher = Aes256Gcm::new(key.as_bytes().into());

    let mut iv = [0u8; GCM_IV_LEN];
    OsRng.fill_bytes(&mut iv);
    let nonce = Nonce::from(iv);

    let escaped = urlencoding::encode(plaintext);
    let sealed = cipher
        .encrypt(
            &nonce,
            Payload {
                msg: escaped.as_bytes(),
                aad: aad.as_bytes(),
            },
        )
        .map_err(|_| CryptoError::Encrypt)?;

    // The aead crate appends the tag to the ciphertext.
    if sealed.len() < GCM_TAG_LEN {
        return Err(CryptoError::Encrypt);
    }
    let tag_start = sealed.len() - GCM_TAG_LEN;

    Ok(CipherEnvelope {
        iv: hex::encode(iv),
        t: hex::encode(&sealed[tag_start..]),
        d: hex::encode(&sealed[..tag_start]),
        ad: hex::encode(aad.as_bytes()),
    })
}

/// Open an envelope. Tag mismatch is a hard `Authentication` failure and
/// never yields partial plaintext.
#[instrument(level = "debug", skip(key, envelope), fields(data_len = envelope.d.len()))]
pub fn decrypt(key: &SymmetricKey, envelope: &CipherEnvelope) -> Result<String, CryptoError> {
    let iv = hex::decode(&envelope.iv)
        .map_err(|_| CryptoError::Envelope("iv is not hex".to_string()))?;
    if iv.len() != GCM_IV_LEN {
        return Err(CryptoError::Envelope(format!(
            "iv must be {GCM_IV_LEN} bytes, got {}",
            iv.len()
        )));
    }
    let tag = hex::decode(&envelope.t)
        .map_err(|_| CryptoError::Envelope("tag is not hex".to_string()))?;
    if tag.len() != GCM_TAG_LEN {
        return Err(CryptoError::Envelope(format!(
            "tag must be {GCM_TAG_LEN} bytes, got {}",
            tag.len()
        )));
    }
    let data = hex::decode(&envelope.d)
        .map_err(|_| CryptoError::Envelope("data is not hex".to_string()))?;
    let aad = hex::decode(&envelope.ad)
        .map_err(|_| CryptoError::Envelope("ad is not hex".to_string()))?;

    let mut sealed = data;
    sealed.extend_from_slice(&tag);

    let cipher = Aes256Gcm::new(key.as_bytes().into());
    let nonce = Nonce::from_slice(&iv);
    let escaped = cipher
        .decrypt(
            nonce,
            Payload {
                msg: sealed.as_slice(),
                aad: &aad,
            },
        )
        .map_err(|_| CryptoError::Authentication)?;

    let escaped = String::from_utf8(escaped)
        .map_err(|_| CryptoError::Envelope("plaintext is not percent-escaped".to_string()))?;
    urlencoding::decode(&escaped)
        .map(|cow| cow.into_owned())
        .map_err(|_| CryptoError::Envelope("plaintext is not percent-escaped".to_string()))
}
