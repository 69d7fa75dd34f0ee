// src/snapshot.rs
//
// Write-only JSON snapshots of what a run fetched and produced, for auditing.

use crate::domain::DateWindow;
use crate::errors::ReportError;
use serde::Serialize;
use std::fs::{self, File};
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

pub const DUMP_FILENAME: &str = "parcel_dump.json";

pub fn modifications_filename(window: &DateWindow) -> String {
    format!("modifications_{}.json", window.file_stem())
}

pub fn report_filename(window: &DateWindow) -> String {
    format!("report_{}.json", window.file_stem())
}

/// Pretty-prints `value` to `dir/filename`, creating `dir` if needed.
pub fn write_json<T: Serialize + ?Sized>(
    dir: &Path,
    filename: &str,
    value: &T,
) -> Result<PathBuf, ReportError> {
    fs::create_dir_all(dir)?;
    let path = dir.join(filename);

    let mut writer = BufWriter::new(File::create(&path)?);
    serde_json::to_writer_pretty(&mut writer, value)?;
    writer.flush()?;

    tracing::info!(path = %path.display(), "wrote snapshot");
    Ok(path)
}
