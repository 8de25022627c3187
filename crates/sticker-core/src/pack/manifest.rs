//! Pack manifest and asset layout
//!
//! A pack is uploaded as one encrypted manifest plus one encrypted blob per
//! unique image. The manifest is a protobuf `StickerPack` message that
//! references images by their position in the blob list:
//!
//! ```text
//! message StickerPack {
//!   message Sticker {
//!     optional uint32 id    = 1;
//!     optional string emoji = 2;
//!   }
//!   optional string  title    = 1;
//!   optional string  author   = 2;
//!   optional Sticker cover    = 3;
//!   repeated Sticker stickers = 4;
//! }
//! ```

use std::collections::HashMap;

use prost::Message;

use crate::normalize::NormalizedSticker;
use crate::pack::crypto::{PackKeys, encrypt_attachment};
use crate::pack::types::{ManifestInfo, PackError, StickerInput};

/// One entry of a pack manifest
#[derive(Clone, PartialEq, Eq, prost::Message)]
pub struct StickerEntry {
    /// Position of the image in the uploaded blob list
    #[prost(uint32, optional, tag = "1")]
    pub id: Option<u32>,
    /// Emoji the sticker is associated with
    #[prost(string, optional, tag = "2")]
    pub emoji: Option<String>,
}

/// Pack manifest as uploaded (before encryption)
#[derive(Clone, PartialEq, Eq, prost::Message)]
pub struct StickerPackManifest {
    /// Pack title
    #[prost(string, optional, tag = "1")]
    pub title: Option<String>,
    /// Pack author
    #[prost(string, optional, tag = "2")]
    pub author: Option<String>,
    /// Cover image reference
    #[prost(message, optional, tag = "3")]
    pub cover: Option<StickerEntry>,
    /// Sticker references, in display order
    #[prost(message, repeated, tag = "4")]
    pub stickers: Vec<StickerEntry>,
}

/// Serialize a manifest to protobuf bytes
pub fn encode_manifest(manifest: &StickerPackManifest) -> Vec<u8> {
    manifest.encode_to_vec()
}

/// Parse a decrypted manifest
pub fn decode_manifest(bytes: &[u8]) -> Result<StickerPackManifest, PackError> {
    StickerPackManifest::decode(bytes).map_err(|e| PackError::Decryption {
        reason: format!("Invalid manifest: {}", e),
    })
}

/// Manifest and the unique images it references
///
/// `assets[id]` is the image with manifest id `id`. Byte-identical images
/// appear once, in first-occurrence order, stickers before the cover.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PackLayout<'a> {
    /// Plaintext manifest
    pub manifest: StickerPackManifest,
    /// Unique image buffers, indexed by manifest id
    pub assets: Vec<&'a [u8]>,
    /// Manifest id of the cover image
    pub cover_id: u32,
}

/// A pack ready to upload
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EncryptedPack {
    /// Encrypted manifest
    pub manifest: Vec<u8>,
    /// Encrypted images, indexed by manifest id
    pub stickers: Vec<Vec<u8>>,
}

fn image_buffer(image: Option<&NormalizedSticker>, index: usize) -> Result<&[u8], PackError> {
    match image {
        Some(image) if !image.buffer.is_empty() => Ok(&image.buffer),
        _ => Err(PackError::MissingImageData { index }),
    }
}

/// Deduplicate images and build the manifest
///
/// Stickers are numbered by the position of their content in the unique
/// list. A slot whose bytes repeat an earlier slot is dropped from the
/// manifest, emoji included. The cover reuses a sticker's id when its bytes
/// match one; otherwise it is appended as the last asset. Empty emoji are
/// omitted.
///
/// # Errors
/// * `MissingImageData` - a slot has no image; the cover reports index
///   `stickers.len()`
pub fn assemble_pack<'a>(
    info: &ManifestInfo,
    stickers: &'a [StickerInput],
    cover: &'a NormalizedSticker,
) -> Result<PackLayout<'a>, PackError> {
    let mut assets: Vec<&'a [u8]> = Vec::with_capacity(stickers.len() + 1);
    let mut ids: HashMap<&'a [u8], u32> = HashMap::with_capacity(stickers.len() + 1);
    let mut entries = Vec::with_capacity(stickers.len());

    for (index, input) in stickers.iter().enumerate() {
        let buffer = image_buffer(input.image_data.as_ref(), index)?;
        if ids.contains_key(buffer) {
            continue;
        }
        let id = assets.len() as u32;
        ids.insert(buffer, id);
        assets.push(buffer);
        entries.push(StickerEntry {
            id: Some(id),
            emoji: input.emoji.clone().filter(|e| !e.is_empty()),
        });
    }

    let cover_buffer = image_buffer(Some(cover), stickers.len())?;
    let cover_id = match ids.get(cover_buffer) {
        Some(&id) => id,
        None => {
            let id = assets.len() as u32;
            assets.push(cover_buffer);
            id
        }
    };

    tracing::debug!(
        target: "sticker_core::pack::manifest",
        stickers = stickers.len(),
        unique = entries.len(),
        assets = assets.len(),
        cover_id,
        "Assembled pack layout"
    );

    let manifest = StickerPackManifest {
        title: Some(info.title.clone()),
        author: Some(info.author.clone()),
        cover: Some(StickerEntry {
            id: Some(cover_id),
            emoji: Some(String::new()),
        }),
        stickers: entries,
    };

    Ok(PackLayout {
        manifest,
        assets,
        cover_id,
    })
}

/// Encrypt the manifest and every asset of a layout under the same keys and IV
pub fn encrypt_pack(
    layout: &PackLayout<'_>,
    keys: &PackKeys,
    iv: &[u8; 16],
) -> Result<EncryptedPack, PackError> {
    let manifest = encrypt_attachment(&encode_manifest(&layout.manifest), keys, iv)?.ciphertext;
    let stickers = layout
        .assets
        .iter()
        .map(|asset| encrypt_attachment(asset, keys, iv).map(|e| e.ciphertext))
        .collect::<Result<Vec<_>, _>>()?;

    Ok(EncryptedPack { manifest, stickers })
}
