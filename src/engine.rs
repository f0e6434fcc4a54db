// src/engine.rs
use std::path::{Path, PathBuf};

use anyhow::Context;
use clap::Subcommand;
use log::{debug, info};

use crate::bencode::{
    bvalue_to_json, decode_with, encode_bvalue, BValue, BencodeError, DecodeOptions, KeyOrder,
    Shape,
};
use crate::file_io::read_input;
use crate::infohash::info_hash;

#[derive(Debug, Clone, PartialEq, Eq, Subcommand)]
pub enum Command {
    /// Decode a bencoded string given as an argument and print it as JSON
    Decode { bencoded: String },
    /// Print the top-level keys of a bencoded dictionary file
    Keys { file: PathBuf },
    /// Report whether a file is already in canonical bencode form
    Check { file: PathBuf },
    /// Print the hex SHA-1 of the `info` dictionary of a .torrent file
    InfoHash { file: PathBuf },
}

/// Runs one command and returns what should be printed.
pub async fn use_command(command: &Command, options: &DecodeOptions) -> anyhow::Result<String> {
    debug!("Running {:?} with {:?}", command, options);

    match command {
        Command::Decode { bencoded } => {
            let value = decode_with(bencoded.as_bytes(), options)
                .context("Failed to decode argument")?;
            let json_val = bvalue_to_json(&value)?;
            Ok(serde_json::to_string(&json_val)?)
        }
        Command::Keys { file } => {
            let value = decode_file(file, options).await?;
            let found = value.shape();
            let dict = value.into_dict().ok_or(BencodeError::WrongTopLevelShape {
                expected: Shape::Dict,
                found,
            })?;
            let keys: Vec<String> = dict
                .keys()
                .map(|k| String::from_utf8_lossy(k).into_owned())
                .collect();
            Ok(keys.join("\n"))
        }
        Command::Check { file } => {
            let data = read_input(file)
                .await
                .with_context(|| format!("Failed to read {}", file.display()))?;
            // Accept any key order here so unsorted files are reported rather than rejected.
            let relaxed = DecodeOptions {
                key_order: KeyOrder::Relaxed,
                ..*options
            };
            let value = decode_with(&data, &relaxed)
                .with_context(|| format!("{} is not valid bencode", file.display()))?;
            let encoded = encode_bvalue(&value);
            match first_difference(&data, &encoded) {
                None => Ok(format!("{}: canonical", file.display())),
                Some(offset) => {
                    info!("{} differs from its canonical form at {}", file.display(), offset);
                    Ok(format!(
                        "{}: not canonical (first difference at offset {})",
                        file.display(),
                        offset
                    ))
                }
            }
        }
        Command::InfoHash { file } => {
            // The hash is taken over re-encoded bytes, which only match the
            // file when its keys were already sorted.
            let strict = DecodeOptions {
                key_order: KeyOrder::Strict,
                ..*options
            };
            let value = decode_file(file, &strict).await?;
            let hash = info_hash(&value)?;
            Ok(hex::encode(hash))
        }
    }
}

async fn decode_file(file: &Path, options: &DecodeOptions) -> anyhow::Result<BValue> {
    let data = read_input(file)
        .await
        .with_context(|| format!("Failed to read {}", file.display()))?;
    let value = decode_with(&data, options)
        .with_context(|| format!("Failed to decode {}", file.display()))?;
    Ok(value)
}

fn first_difference(a: &[u8], b: &[u8]) -> Option<usize> {
    match a.iter().zip(b).position(|(x, y)| x != y) {
        Some(offset) => Some(offset),
        None if a.len() != b.len() => Some(a.len().min(b.len())),
        None => None,
    }
}
