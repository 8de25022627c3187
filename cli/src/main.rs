use std::path::{Path, PathBuf};

use anyhow::{Context, anyhow};
use clap::{Parser, Subcommand};
use serde_json::json;
use sticker_core::constant::{ANIMATED_CONTENT_TYPE, PACK_KEY_LEN};
use sticker_core::normalize::{NormalizedSticker, StickerNormalizer};
use sticker_core::pack::{
    StickerEntry, StickerPackManifest, decode_manifest, decrypt_attachment, derive_pack_keys,
    pack_key_from_hex,
};
use sticker_core::{StickerPackConfig, load_config};

#[derive(Debug, Parser)]
#[command(name = "stickers")]
#[command(about = "Normalize sticker images and inspect encrypted sticker packs")]
struct Cli {
    /// JSON config file (missing file means defaults)
    #[arg(long, env = "STICKERS_CONFIG", default_value = "stickers.json")]
    config: PathBuf,

    #[command(subcommand)]
    cmd: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Normalize images into sticker files
    Normalize {
        /// Input images
        #[arg(required = true)]
        files: Vec<PathBuf>,

        /// Directory the stickers are written to
        #[arg(long)]
        out_dir: PathBuf,

        /// Lossy WebP quality (0-100), overrides the config
        #[arg(long)]
        quality: Option<f32>,
    },

    /// Decrypt a downloaded pack asset
    Decrypt {
        /// Pack key (64 hex characters)
        #[arg(long, env = "STICKERS_PACK_KEY")]
        key: String,

        /// Encrypted asset
        #[arg(long)]
        input: PathBuf,

        /// Where to write the plaintext
        #[arg(long, required_unless_present = "manifest")]
        output: Option<PathBuf>,

        /// The asset is the pack manifest; print it as JSON
        #[arg(long)]
        manifest: bool,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn")),
        )
        .with_target(false)
        .without_time()
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let config = load_config(&cli.config)
        .with_context(|| format!("load config {}", cli.config.display()))?;

    match &cli.cmd {
        Command::Normalize {
            files,
            out_dir,
            quality,
        } => cmd_normalize(&config, files, out_dir, *quality).await,
        Command::Decrypt {
            key,
            input,
            output,
            manifest,
        } => cmd_decrypt(key, input, output.as_deref(), *manifest),
    }
}

// ── Helpers ─────────────────────────────────────────────────────────────────

fn print(v: serde_json::Value) {
    match serde_json::to_string_pretty(&v) {
        Ok(s) => println!("{s}"),
        Err(e) => tracing::error!("json encode: {e}"),
    }
}

fn output_path(out_dir: &Path, input: &Path, sticker: &NormalizedSticker) -> PathBuf {
    let stem = input
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_else(|| "sticker".to_string());
    let ext = if sticker.content_type == ANIMATED_CONTENT_TYPE {
        "png"
    } else {
        "webp"
    };
    out_dir.join(format!("{stem}.{ext}"))
}

fn entry_json(entry: &StickerEntry) -> serde_json::Value {
    json!({
        "id": entry.id,
        "emoji": entry.emoji,
    })
}

fn manifest_json(manifest: &StickerPackManifest) -> serde_json::Value {
    json!({
        "title": manifest.title,
        "author": manifest.author,
        "cover": manifest.cover.as_ref().map(entry_json),
        "stickers": manifest.stickers.iter().map(entry_json).collect::<Vec<_>>(),
    })
}

// ── Commands ────────────────────────────────────────────────────────────────

async fn cmd_normalize(
    config: &StickerPackConfig,
    files: &[PathBuf],
    out_dir: &Path,
    quality: Option<f32>,
) -> anyhow::Result<()> {
    std::fs::create_dir_all(out_dir)
        .with_context(|| format!("create output dir {}", out_dir.display()))?;

    let mut options = config.normalize_options();
    if let Some(quality) = quality {
        options.webp_quality = quality;
    }
    let normalizer = StickerNormalizer::new(options);

    let mut results = Vec::with_capacity(files.len());
    let mut failed = 0usize;
    // One bad image does not stop the batch
    for file in files {
        let path = file.display().to_string();
        let data = match std::fs::read(file) {
            Ok(data) => data,
            Err(e) => {
                failed += 1;
                results.push(json!({ "path": path, "error": format!("read: {e}") }));
                continue;
            }
        };

        match normalizer.normalize_blocking(path.clone(), data).await {
            Ok(sticker) => {
                let out = output_path(out_dir, file, &sticker);
                std::fs::write(&out, &sticker.buffer)
                    .with_context(|| format!("write {}", out.display()))?;
                results.push(json!({
                    "path": path,
                    "output": out.display().to_string(),
                    "kind": format!("{:?}", sticker.kind),
                    "content_type": sticker.content_type,
                    "bytes": sticker.buffer.len(),
                    "source_width": sticker.meta.width,
                    "source_height": sticker.meta.height,
                }));
            }
            Err(e) => {
                failed += 1;
                tracing::warn!(path = %path, error = %e, "normalize failed");
                results.push(json!({
                    "path": path,
                    "error": e.to_string(),
                    "kind": e.kind().as_str(),
                    "message_key": e.message_key(),
                }));
            }
        }
    }

    print(json!({
        "normalized": files.len() - failed,
        "failed": failed,
        "results": results,
    }));
    Ok(())
}

fn cmd_decrypt(
    key_hex: &str,
    input: &Path,
    output: Option<&Path>,
    manifest: bool,
) -> anyhow::Result<()> {
    let pack_key = pack_key_from_hex(key_hex)
        .map_err(|e| anyhow!("pack key must be {} hex-encoded bytes: {e}", PACK_KEY_LEN))?;
    let keys = derive_pack_keys(&pack_key).context("derive pack keys")?;

    let ciphertext =
        std::fs::read(input).with_context(|| format!("read {}", input.display()))?;
    let plaintext = decrypt_attachment(&ciphertext, &keys).context("decrypt asset")?;

    if let Some(output) = output {
        std::fs::write(output, &plaintext)
            .with_context(|| format!("write {}", output.display()))?;
    }

    if manifest {
        let manifest = decode_manifest(&plaintext).context("decode manifest")?;
        print(manifest_json(&manifest));
    } else {
        print(json!({
            "input": input.display().to_string(),
            "bytes": plaintext.len(),
        }));
    }
    Ok(())
}
