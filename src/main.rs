// Copyright (c) 2026 Christoph Gaffga
// SPDX-License-Identifier: GPL-3.0-only
// https://github.com/cgaffga/stratagem

//! Command-line front end for the steganography engine.
//!
//! All pipeline work happens in the library; this binary only parses
//! arguments, collects the passphrase, moves file bytes around, and maps
//! each error kind to a stable exit code:
//!
//! ```text
//! 0  success             4  container format error
//! 1  I/O or refusal      5  authentication failure
//! 2  empty passphrase    6  archive failure
//! 3  capacity exceeded   7  cover image undecodable
//! ```
//!
//! Argument errors exit with the parser's own code (2), as usual for
//! clap binaries.

use std::fs;
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};
use tracing::{info, warn};

use stratagem::{CoverImage, StegoError};

#[derive(Parser, Debug)]
#[command(version, about = "Hide encrypted payloads in the low bits of PNG images")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Embed a message or file into a cover image
    Embed {
        /// Path to the cover image (any decodable format)
        #[arg(short, long, value_name = "IMAGE")]
        input: PathBuf,

        /// Path for the stego image (always written as PNG data)
        #[arg(short, long, value_name = "IMAGE")]
        output: PathBuf,

        /// Text message to embed
        #[arg(short, long, conflicts_with = "file", required_unless_present = "file")]
        message: Option<String>,

        /// File whose raw bytes to embed
        #[arg(short, long, value_name = "FILE")]
        file: Option<PathBuf>,

        /// Passphrase (prompted for when omitted)
        #[arg(short, long)]
        passphrase: Option<String>,

        /// Overwrite the output file if it already exists
        #[arg(long)]
        force: bool,
    },
    /// Extract a payload from a stego image
    Extract {
        /// Path to the stego image
        #[arg(short, long, value_name = "IMAGE")]
        input: PathBuf,

        /// Write the payload here instead of printing it
        #[arg(short, long, value_name = "FILE")]
        output: Option<PathBuf>,

        /// Passphrase (prompted for when omitted)
        #[arg(short, long)]
        passphrase: Option<String>,
    },
}

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(tracing::Level::INFO.into()),
        )
        .with_target(false)
        .init();

    match run() {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("error: {err:#}");
            ExitCode::from(exit_code(&err))
        }
    }
}

fn run() -> Result<()> {
    let cli = Cli::parse();
    match cli.command {
        Commands::Embed { input, output, message, file, passphrase, force } => {
            embed_cmd(&input, &output, message, file, passphrase, force)
        }
        Commands::Extract { input, output, passphrase } => {
            extract_cmd(&input, output, passphrase)
        }
    }
}

/// Map an error to its exit code. Stego failures get one code per kind so
/// scripts can tell "wrong passphrase" from "not a container" from "image
/// too small"; everything else is 1.
fn exit_code(err: &anyhow::Error) -> u8 {
    match err.downcast_ref::<StegoError>() {
        Some(StegoError::EmptyPassphrase) => 2,
        Some(StegoError::CapacityExceeded { .. }) => 3,
        Some(StegoError::InvalidContainer(_)) => 4,
        Some(StegoError::AuthenticationFailed) => 5,
        Some(StegoError::ArchiveFailed) => 6,
        Some(StegoError::InvalidImage(_)) => 7,
        None => 1,
    }
}

fn embed_cmd(
    input: &Path,
    output: &Path,
    message: Option<String>,
    file: Option<PathBuf>,
    passphrase: Option<String>,
    force: bool,
) -> Result<()> {
    if output.exists() && !force {
        bail!("output file {} already exists (use --force to overwrite)", output.display());
    }
    warn_if_not_png(output);

    let payload = match (message, file) {
        (Some(text), None) => text.into_bytes(),
        (None, Some(path)) => fs::read(&path)
            .with_context(|| format!("cannot read payload file {}", path.display()))?,
        // clap enforces exactly one of --message / --file.
        _ => bail!("exactly one of --message or --file is required"),
    };
    let passphrase = resolve_passphrase(passphrase)?;

    let cover_bytes =
        fs::read(input).with_context(|| format!("cannot read cover image {}", input.display()))?;
    let cover = CoverImage::from_bytes(&cover_bytes)?;

    info!(
        payload_len = payload.len(),
        capacity = cover.capacity(),
        "embedding payload"
    );
    let stego = stratagem::embed(&cover, &payload, &passphrase)?;

    let png = stego.to_png_bytes()?;
    fs::write(output, &png)
        .with_context(|| format!("cannot write stego image {}", output.display()))?;
    info!(output = %output.display(), bytes = png.len(), "stego image written");
    Ok(())
}

fn extract_cmd(input: &Path, output: Option<PathBuf>, passphrase: Option<String>) -> Result<()> {
    warn_if_not_png(input);
    let passphrase = resolve_passphrase(passphrase)?;

    let stego_bytes =
        fs::read(input).with_context(|| format!("cannot read stego image {}", input.display()))?;
    let stego = CoverImage::from_bytes(&stego_bytes)?;
    let payload = stratagem::extract(&stego, &passphrase)?;

    match output {
        Some(path) => {
            fs::write(&path, &payload)
                .with_context(|| format!("cannot write payload file {}", path.display()))?;
            info!(output = %path.display(), bytes = payload.len(), "payload written");
        }
        None => match String::from_utf8(payload) {
            Ok(text) => println!("{text}"),
            Err(not_utf8) => {
                let payload = not_utf8.into_bytes();
                println!("[binary payload] {} bytes", payload.len());
                println!("{}", hex_preview(&payload));
            }
        },
    }
    Ok(())
}

/// Hex of the first 64 payload bytes, with a `...` marker when truncated.
fn hex_preview(payload: &[u8]) -> String {
    let mut preview: String = payload.iter().take(64).map(|b| format!("{b:02x}")).collect();
    if payload.len() > 64 {
        preview.push_str("...");
    }
    preview
}

/// Take the passphrase from the flag or prompt for it without echo.
/// Empty passphrases are rejected here, before any file is touched.
fn resolve_passphrase(arg: Option<String>) -> Result<String> {
    let passphrase = match arg {
        Some(p) => p,
        None => rpassword::prompt_password("Passphrase: ").context("cannot read passphrase")?,
    };
    if passphrase.is_empty() {
        return Err(StegoError::EmptyPassphrase.into());
    }
    Ok(passphrase)
}

/// LSB data only survives lossless storage. Flag paths that look like they
/// will end up re-compressed.
fn warn_if_not_png(path: &Path) {
    let is_png = path
        .extension()
        .map_or(false, |ext| ext.eq_ignore_ascii_case("png"));
    if !is_png {
        warn!(
            path = %path.display(),
            "path does not end in .png; lossy formats destroy embedded data"
        );
    }
}
