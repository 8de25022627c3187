//! Sticker normalization and encrypted sticker pack upload
//!
//! This crate turns user-selected images into stickers and publishes them as
//! an encrypted pack. Images are normalized to the canonical sticker formats,
//! deduplicated into a protobuf manifest, encrypted under a fresh per-pack key
//! and uploaded through a host-provided sticker service.

#![forbid(unsafe_code)]
#![warn(missing_docs)]
#![warn(rustdoc::bare_urls)]
#![doc = include_str!("../README.md")]

pub mod config;
pub mod constant;
pub mod error;
pub mod normalize;
pub mod pack;
pub mod prelude;
pub mod secret;
#[cfg(test)]
mod test_util;

pub use self::config::{StickerPackConfig, load_config};
pub use self::error::{Error, ErrorKind};
pub use self::secret::Secret;
