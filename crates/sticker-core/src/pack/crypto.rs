//! Cryptographic operations for sticker packs
//!
//! Every asset of a pack (manifest and stickers) is encrypted under keys
//! derived from a single random pack key, in the attachment format installing
//! clients expect:
//!
//! ```text
//! keys       = HKDF-SHA256(ikm = pack_key, salt = 0^32, info = "Sticker Pack", 64)
//! aes_key    = keys[0..32]
//! mac_key    = keys[32..64]
//! ciphertext = iv || AES-256-CBC-PKCS7(aes_key, iv, plaintext) || HMAC-SHA256(mac_key, iv || body)
//! ```

use aes::Aes256;
use aes::cipher::block_padding::Pkcs7;
use aes::cipher::{BlockDecryptMut, BlockEncryptMut, KeyIvInit};
use hkdf::Hkdf;
use hmac::{Hmac, Mac};
use sha2::{Digest, Sha256};
use zeroize::Zeroizing;

use crate::constant::{PACK_IV_LEN, PACK_KEY_INFO, PACK_KEY_LEN};
use crate::pack::types::PackError;
use crate::secret::Secret;

type Aes256CbcEnc = cbc::Encryptor<Aes256>;
type Aes256CbcDec = cbc::Decryptor<Aes256>;
type HmacSha256 = Hmac<Sha256>;

/// Length of the HMAC-SHA256 tag appended to every asset
pub const MAC_LEN: usize = 32;

/// Random 32-byte key a pack is shared with
pub type PackKey = Secret<[u8; PACK_KEY_LEN]>;

/// Keys derived from a [`PackKey`]
#[derive(Debug, Clone)]
pub struct PackKeys {
    /// AES-256 key
    aes_key: Secret<[u8; 32]>,
    /// HMAC-SHA256 key
    mac_key: Secret<[u8; 32]>,
}

/// One encrypted asset
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EncryptedAttachment {
    /// `iv || body || mac`
    pub ciphertext: Vec<u8>,
    /// SHA-256 of `ciphertext`
    pub digest: [u8; 32],
}

/// Generate a fresh pack key from the OS random source
pub fn generate_pack_key() -> Result<PackKey, PackError> {
    let mut key = [0u8; PACK_KEY_LEN];
    getrandom::fill(&mut key).map_err(|e| PackError::Encryption {
        reason: format!("Failed to generate pack key: {}", e),
    })?;
    Ok(Secret::new(key))
}

/// Generate a fresh CBC initialization vector
pub fn generate_iv() -> Result<[u8; PACK_IV_LEN], PackError> {
    let mut iv = [0u8; PACK_IV_LEN];
    getrandom::fill(&mut iv).map_err(|e| PackError::Encryption {
        reason: format!("Failed to generate IV: {}", e),
    })?;
    Ok(iv)
}

/// Parse a hex-encoded pack key (64 hex characters)
pub fn pack_key_from_hex(hex_key: &str) -> Result<PackKey, PackError> {
    let bytes = Zeroizing::new(hex::decode(hex_key.trim()).map_err(|e| {
        PackError::Decryption {
            reason: format!("Invalid pack key hex: {}", e),
        }
    })?);
    let key: [u8; PACK_KEY_LEN] =
        bytes
            .as_slice()
            .try_into()
            .map_err(|_| PackError::Decryption {
                reason: format!(
                    "Pack key must be {} bytes, got {}",
                    PACK_KEY_LEN,
                    bytes.len()
                ),
            })?;
    Ok(Secret::new(key))
}

/// Expand a pack key into its AES and MAC keys
pub fn derive_pack_keys(pack_key: &PackKey) -> Result<PackKeys, PackError> {
    let hk = Hkdf::<Sha256>::new(Some(&[0u8; 32]), pack_key.as_ref());
    let mut okm = Zeroizing::new([0u8; 64]);
    hk.expand(PACK_KEY_INFO, okm.as_mut_slice())
        .map_err(|e| PackError::Encryption {
            reason: format!("Key derivation failed: {}", e),
        })?;

    let mut aes_key = [0u8; 32];
    let mut mac_key = [0u8; 32];
    aes_key.copy_from_slice(&okm[..32]);
    mac_key.copy_from_slice(&okm[32..]);

    Ok(PackKeys {
        aes_key: Secret::new(aes_key),
        mac_key: Secret::new(mac_key),
    })
}

fn new_mac(keys: &PackKeys) -> Result<HmacSha256, String> {
    <HmacSha256 as Mac>::new_from_slice(keys.mac_key.as_ref())
        .map_err(|e| format!("Failed to create MAC: {}", e))
}

/// Encrypt one asset
///
/// The same `keys` and `iv` are used for every asset of a pack, so equal
/// plaintexts produce equal ciphertexts. Assets are deduplicated before this
/// is called.
pub fn encrypt_attachment(
    plaintext: &[u8],
    keys: &PackKeys,
    iv: &[u8; PACK_IV_LEN],
) -> Result<EncryptedAttachment, PackError> {
    let cipher = Aes256CbcEnc::new_from_slices(keys.aes_key.as_ref(), iv).map_err(|e| {
        PackError::Encryption {
            reason: format!("Failed to create cipher: {}", e),
        }
    })?;
    let body = cipher.encrypt_padded_vec_mut::<Pkcs7>(plaintext);

    let mut mac = new_mac(keys).map_err(|reason| PackError::Encryption { reason })?;
    mac.update(iv);
    mac.update(&body);
    let tag = mac.finalize().into_bytes();

    let mut ciphertext = Vec::with_capacity(PACK_IV_LEN + body.len() + MAC_LEN);
    ciphertext.extend_from_slice(iv);
    ciphertext.extend_from_slice(&body);
    ciphertext.extend_from_slice(&tag);

    let digest: [u8; 32] = Sha256::digest(&ciphertext).into();
    Ok(EncryptedAttachment { ciphertext, digest })
}

/// Verify and decrypt one asset produced by [`encrypt_attachment`]
pub fn decrypt_attachment(ciphertext: &[u8], keys: &PackKeys) -> Result<Vec<u8>, PackError> {
    // At least one padded block between the IV and the MAC
    if ciphertext.len() < PACK_IV_LEN + 16 + MAC_LEN
        || (ciphertext.len() - PACK_IV_LEN - MAC_LEN) % 16 != 0
    {
        return Err(PackError::Decryption {
            reason: format!("Malformed ciphertext of {} bytes", ciphertext.len()),
        });
    }

    let (iv, rest) = ciphertext.split_at(PACK_IV_LEN);
    let (body, tag) = rest.split_at(rest.len() - MAC_LEN);

    let mut mac = new_mac(keys).map_err(|reason| PackError::Decryption { reason })?;
    mac.update(iv);
    mac.update(body);
    mac.verify_slice(tag).map_err(|_| PackError::Decryption {
        reason: "MAC verification failed".to_string(),
    })?;

    let cipher = Aes256CbcDec::new_from_slices(keys.aes_key.as_ref(), iv).map_err(|e| {
        PackError::Decryption {
            reason: format!("Failed to create cipher: {}", e),
        }
    })?;
    cipher
        .decrypt_padded_vec_mut::<Pkcs7>(body)
        .map_err(|e| PackError::Decryption {
            reason: format!("Invalid padding: {}", e),
        })
}
