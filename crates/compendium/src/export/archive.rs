//! Zip packaging of an export bundle.

use std::io::{Cursor, Write};

use tracing::trace;
use zip::write::SimpleFileOptions;
use zip::{CompressionMethod, ZipWriter};

use super::{ExportBundle, CSV_FILE_NAME, IMAGE_DIR, JSON_FILE_NAME};
use crate::error::Result;

/// Pack the bundle's three views into one zip archive held in memory.
///
/// Text entries are deflated; PNG entries are stored as-is since they are
/// already compressed. The `images/` directory entry is always present, even
/// when no record has an image.
///
/// # Errors
///
/// Returns an error if any entry cannot be written. Nothing is returned in
/// that case, so a caller never sees a partial archive.
pub fn write_archive(bundle: &ExportBundle) -> Result<Vec<u8>> {
    let text = SimpleFileOptions::default()
        .compression_method(CompressionMethod::Deflated)
        .unix_permissions(0o644);
    let stored = SimpleFileOptions::default()
        .compression_method(CompressionMethod::Stored)
        .unix_permissions(0o644);

    let mut zip = ZipWriter::new(Cursor::new(Vec::new()));

    zip.start_file(CSV_FILE_NAME, text)?;
    zip.write_all(bundle.csv.as_bytes())?;

    zip.start_file(JSON_FILE_NAME, text)?;
    zip.write_all(bundle.json.as_bytes())?;

    zip.add_directory(format!("{IMAGE_DIR}/"), stored)?;
    for image in &bundle.images {
        trace!(path = %image.path, bytes = image.bytes.len(), "adding image entry");
        zip.start_file(image.path.as_str(), stored)?;
        zip.write_all(&image.bytes)?;
    }

    Ok(zip.finish()?.into_inner())
}
