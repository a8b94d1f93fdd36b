// Shared helpers for loading inputs and printing output

use std::fs;
use std::path::Path;

use chrono::{DateTime, FixedOffset, Utc};
use serde::Serialize;
use staybook_config::Settings;
use staybook_core::{decode_all, documents_from_json, DocumentModel, MemoryStore};
use staybook_ledger::LoyaltyConfig;

use crate::CliError;

pub fn load_settings(path: Option<&Path>) -> Settings {
    match path {
        Some(path) => Settings::load_from(path),
        None => Settings::load(),
    }
}

pub fn read_file(path: &Path) -> Result<String, CliError> {
    fs::read_to_string(path).map_err(|e| {
        let err = CliError::io(format!("{}: {}", path.display(), e));
        if e.kind() == std::io::ErrorKind::NotFound {
            err.with_hint("check the path; relative paths start from the current directory")
        } else {
            err
        }
    })
}

/// Read a JSON array of documents and decode the well-formed ones.
pub fn load_documents<T: DocumentModel>(path: &Path) -> Result<Vec<T>, CliError> {
    let raw = read_file(path)?;
    let docs = documents_from_json(&raw)
        .map_err(|e| CliError::parse(format!("{}: {}", path.display(), e))
            .with_hint("expected a JSON array of documents"))?;
    Ok(decode_all(&docs))
}

pub fn load_store(path: &Path) -> Result<MemoryStore, CliError> {
    let raw = read_file(path)?;
    MemoryStore::from_json(&raw).map_err(|e| {
        CliError::parse(format!("{}: {}", path.display(), e))
            .with_hint("expected {\"collection\": {\"id\": document}}")
    })
}

/// Write the store back after a committed redemption.
pub fn save_store(path: &Path, store: &MemoryStore) -> Result<(), CliError> {
    let json = store
        .to_json()
        .map_err(|e| CliError::io(format!("cannot encode store: {e}")))?;
    fs::write(path, json).map_err(|e| CliError::io(format!("{}: {}", path.display(), e)))
}

/// `--loyalty`, then `loyalty.configPath`, then the built-in programme.
pub fn load_loyalty(flag: Option<&Path>, settings: &Settings) -> Result<LoyaltyConfig, CliError> {
    let path = match (flag, settings.loyalty_config_path.as_deref()) {
        (Some(path), _) => path.to_path_buf(),
        (None, Some(configured)) => configured.into(),
        (None, None) => return Ok(LoyaltyConfig::default()),
    };
    let raw = read_file(&path)?;
    let config = LoyaltyConfig::from_toml(&raw)
        .map_err(|e| CliError::from(e).with_hint(format!("in {}", path.display())))?;
    log::debug!("loyalty programme from {}", path.display());
    Ok(config)
}

/// Reference time for calendar buckets.
///
/// An explicit offset in `--now` is kept. Otherwise the time is shown in
/// the offset from settings.
pub fn resolve_now(flag: Option<&str>, settings: &Settings) -> Result<DateTime<FixedOffset>, CliError> {
    let offset = settings.utc_offset();
    let Some(raw) = flag else {
        return Ok(Utc::now().with_timezone(&offset));
    };
    if let Ok(dt) = DateTime::parse_from_rfc3339(raw.trim()) {
        return Ok(dt);
    }
    staybook_core::time::parse_datetime(raw)
        .map(|dt| dt.with_timezone(&offset))
        .ok_or_else(|| {
            CliError::args(format!("invalid --now value \"{raw}\""))
                .with_hint("use RFC 3339 (2026-03-15T12:00:00Z) or YYYY-MM-DD")
        })
}

pub fn print_json<T: Serialize>(value: &T) -> Result<(), CliError> {
    let out = serde_json::to_string_pretty(value)
        .map_err(|e| CliError::io(format!("cannot encode output: {e}")))?;
    println!("{out}");
    Ok(())
}

/// `+12.5%` / `-3.0%`.
pub fn signed_percent(value: f64) -> String {
    format!("{value:+.1}%")
}
