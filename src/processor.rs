use crate::config::Config;
use crate::decoder::decode;
use crate::error::SplitError;
use crate::filename::{date_from_file_name, is_candidate};
use anyhow::{Context, Result};
use chrono::{DateTime, Local};
use log::{debug, info};
use serde::Serialize;
use std::collections::HashSet;
use std::fs::{self, OpenOptions};
use std::io::{ErrorKind, Write};
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum FileStatus {
    Unchanged,
    Split,
    /// Split computed in dry-run mode, nothing written.
    WouldSplit,
}

#[derive(Debug, Clone, Serialize)]
pub struct OutputReport {
    pub path: PathBuf,
    pub entries: usize,
    pub first_entry_at: Option<DateTime<Local>>,
}

#[derive(Debug, Clone, Serialize)]
pub struct FileReport {
    pub source: PathBuf,
    pub entries: usize,
    pub status: FileStatus,
    pub outputs: Vec<OutputReport>,
    pub backup: Option<PathBuf>,
}

/// Splits every oversized `appLog-*.log` file in `dir`. The first failure
/// aborts the remaining files.
pub fn process_dir(dir: &Path, config: &Config, dry_run: bool) -> Result<Vec<FileReport>> {
    let mut names = Vec::new();
    for entry in fs::read_dir(dir).with_context(|| format!("Failed to list {:?}", dir))? {
        let entry = entry?;
        if entry.file_type()?.is_dir() {
            continue;
        }
        names.push(entry.file_name().to_string_lossy().into_owned());
    }
    names.sort();

    let mut reports = Vec::new();

    for name in names {
        if !is_candidate(&name) {
            debug!("Skipping {}", name);
            continue;
        }

        let report = process_file(dir, &name, config, dry_run)
            .with_context(|| format!("Failed to process {:?}", dir.join(&name)))?;
        reports.push(report);
    }

    Ok(reports)
}

fn process_file(dir: &Path, name: &str, config: &Config, dry_run: bool) -> Result<FileReport> {
    let file_created_at = date_from_file_name(name)?;
    let source = dir.join(name);

    let content = fs::read_to_string(&source)?;
    let log = decode(file_created_at, &content)?;
    let entries = log.len();

    if !log.needs_split(config.max_entries) {
        debug!("{} has {} entries, no split needed", name, entries);
        return Ok(FileReport {
            source,
            entries,
            status: FileStatus::Unchanged,
            outputs: Vec::new(),
            backup: None,
        });
    }

    let batches = log.split(config.max_entries);
    info!("Splitting {} ({} entries) into {} files", name, entries, batches.len());

    let mut backup_name = source.clone().into_os_string();
    backup_name.push(&config.backup_suffix);
    let backup = PathBuf::from(backup_name);

    // Every destination is checked before the first write, so a collision
    // leaves the directory untouched.
    ensure_absent(&backup)?;

    let mut planned = HashSet::with_capacity(batches.len());
    let mut encoded_batches = Vec::with_capacity(batches.len());
    let mut outputs = Vec::with_capacity(batches.len());
    for batch in &batches {
        let encoded = batch.encode();
        let path = dir.join(&encoded.file_name);

        if !planned.insert(path.clone()) {
            return Err(SplitError::DestinationExists(path).into());
        }
        ensure_absent(&path)?;

        outputs.push(OutputReport {
            path: path.clone(),
            entries: batch.len(),
            first_entry_at: batch.entries.first().map(|entry| entry.time),
        });
        encoded_batches.push((path, encoded.data));
    }

    if !dry_run {
        for (path, data) in &encoded_batches {
            write_new(path, data)?;
            debug!("Wrote {:?}", path);
        }

        fs::rename(&source, &backup)?;
        info!("Moved {:?} to {:?}", source, backup);
    }

    Ok(FileReport {
        source,
        entries,
        status: if dry_run {
            FileStatus::WouldSplit
        } else {
            FileStatus::Split
        },
        outputs,
        backup: Some(backup),
    })
}

fn ensure_absent(path: &Path) -> Result<(), SplitError> {
    if path.try_exists()? {
        return Err(SplitError::DestinationExists(path.to_path_buf()));
    }
    Ok(())
}

fn write_new(path: &Path, data: &str) -> Result<(), SplitError> {
    let mut file = OpenOptions::new()
        .write(true)
        .create_new(true)
        .open(path)
        .map_err(|e| match e.kind() {
            ErrorKind::AlreadyExists => SplitError::DestinationExists(path.to_path_buf()),
            _ => SplitError::Io(e),
        })?;

    file.write_all(data.as_bytes())?;
    Ok(())
}
