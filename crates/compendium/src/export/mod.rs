//! The export bundler.
//!
//! Turns the full record set into three synchronized views (CSV rows, a JSON
//! array and one PNG file per record image) and packs them into a dated zip
//! archive:
//!
//! ```text
//! compendium-2024-05-01.zip
//!   compendium.csv
//!   compendium.json
//!   images/<id>.png
//! ```
//!
//! [`build_bundle`] is pure and never fails on bad record data: a record whose
//! image cannot be decoded simply has no image. [`Exporter`] adds the
//! single-flight guard and the all-or-nothing archive write.

pub mod archive;
pub mod guard;

use std::collections::HashSet;
use std::path::{Path, PathBuf};

use chrono::{NaiveDate, Utc};
use csv::{QuoteStyle, WriterBuilder};
use serde::Serialize;
use tracing::{debug, info, warn};

use crate::config::ExportConfig;
use crate::error::{Error, Result};
use crate::record::{ObservationRecord, RecordSource};

pub use guard::{ExportGuard, ExportPermit};

/// CSV entry name inside the archive.
pub const CSV_FILE_NAME: &str = "compendium.csv";

/// JSON entry name inside the archive.
pub const JSON_FILE_NAME: &str = "compendium.json";

/// Directory holding one PNG per record image.
pub const IMAGE_DIR: &str = "images";

/// CSV columns, in order.
pub const CSV_HEADER: [&str; 9] = [
    "_id",
    "researcherName",
    "commonName",
    "scientificName",
    "habitat",
    "fieldNotes",
    "createdAt",
    "updatedAt",
    "imagePath",
];

/// One record as it appears in both the CSV and the JSON view.
///
/// Rows carry no image data field. The image lives only in the
/// `images/` directory.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ExportRow {
    /// Record id, or its 1-based position when the record has none.
    #[serde(rename = "_id")]
    pub id: String,
    /// Who made the observation.
    pub researcher_name: String,
    /// Common name.
    pub common_name: String,
    /// Scientific name.
    pub scientific_name: String,
    /// Habitat.
    pub habitat: String,
    /// Free-text notes.
    pub field_notes: String,
    /// Creation timestamp.
    pub created_at: String,
    /// Last update timestamp.
    pub updated_at: String,
    /// Archive-relative image path, or empty.
    pub image_path: String,
}

/// An image file registered in the bundle.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BundleImage {
    /// Archive-relative path, e.g. `images/65a1f0.png`.
    pub path: String,
    /// Raw encoded image bytes.
    pub bytes: Vec<u8>,
}

/// The three views over one record set.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ExportBundle {
    /// One row per input record, in input order.
    pub rows: Vec<ExportRow>,
    /// Image files, in input order.
    pub images: Vec<BundleImage>,
    /// Rendered CSV text, header included.
    pub csv: String,
    /// Rendered, pretty-printed JSON array.
    pub json: String,
    /// Records whose non-empty image could not be decoded.
    pub skipped_images: usize,
}

/// Build the bundle for `records`.
///
/// # Errors
///
/// Returns an error only if rendering the CSV or JSON text fails.
pub fn build_bundle(records: &[ObservationRecord]) -> Result<ExportBundle> {
    let mut bundle = ExportBundle::default();
    let mut used_names = HashSet::new();

    for (index, record) in records.iter().enumerate() {
        let id = record
            .id
            .as_deref()
            .filter(|id| !id.is_empty())
            .map_or_else(|| (index + 1).to_string(), str::to_string);

        let artifact = record.artifact();
        let mut image_path = String::new();
        if !artifact.is_empty() {
            match artifact.payload() {
                Some(bytes) => {
                    image_path = unique_image_path(&id, &mut used_names);
                    bundle.images.push(BundleImage {
                        path: image_path.clone(),
                        bytes,
                    });
                }
                None => {
                    warn!(id = %id, "record image is malformed; exporting without it");
                    bundle.skipped_images += 1;
                }
            }
        }

        bundle.rows.push(ExportRow {
            id,
            researcher_name: text(record.researcher_name.as_deref()),
            common_name: text(record.common_name.as_deref()),
            scientific_name: text(record.scientific_name.as_deref()),
            habitat: text(record.habitat.as_deref()),
            field_notes: text(record.field_notes.as_deref()),
            created_at: text(record.created_at.as_deref()),
            updated_at: text(record.updated_at.as_deref()),
            image_path,
        });
    }

    bundle.csv = render_csv(&bundle.rows)?;
    bundle.json = serde_json::to_string_pretty(&bundle.rows)?;

    debug!(
        rows = bundle.rows.len(),
        images = bundle.images.len(),
        skipped = bundle.skipped_images,
        "bundle built"
    );
    Ok(bundle)
}

fn text(value: Option<&str>) -> String {
    value.unwrap_or_default().to_string()
}

/// Render rows as CSV with a header line.
///
/// Fields containing a comma, a double quote or a line break are quoted with
/// inner quotes doubled.
fn render_csv(rows: &[ExportRow]) -> Result<String> {
    let mut writer = WriterBuilder::new()
        .has_headers(false)
        .quote_style(QuoteStyle::Necessary)
        .from_writer(Vec::new());

    writer.write_record(CSV_HEADER)?;
    for row in rows {
        writer.serialize(row)?;
    }

    let bytes = writer
        .into_inner()
        .map_err(|e| Error::Io(e.into_error()))?;
    String::from_utf8(bytes).map_err(|e| Error::internal(format!("CSV is not UTF-8: {e}")))
}

/// Map an id onto a file name that is safe inside the archive and not yet
/// taken.
fn unique_image_path(id: &str, used: &mut HashSet<String>) -> String {
    let stem: String = id
        .chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || matches!(c, '-' | '_' | '.') {
                c
            } else {
                '_'
            }
        })
        .collect();
    let stem = if stem.trim_matches('.').is_empty() {
        "image".to_string()
    } else {
        stem
    };

    let mut candidate = stem.clone();
    let mut n = 2;
    while !used.insert(candidate.clone()) {
        candidate = format!("{stem}-{n}");
        n += 1;
    }
    format!("{IMAGE_DIR}/{candidate}.png")
}

/// Archive file name for an export made on `date`.
#[must_use]
pub fn archive_file_name(prefix: &str, date: NaiveDate) -> String {
    format!("{prefix}-{}.zip", date.format("%Y-%m-%d"))
}

/// Result of a finished export.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExportReport {
    /// Where the archive was written.
    pub path: PathBuf,
    /// Records exported.
    pub records: usize,
    /// Image files written.
    pub images: usize,
    /// Records whose image was dropped as malformed.
    pub skipped_images: usize,
    /// Archive size in bytes.
    pub bytes: u64,
}

/// What an export call did.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ExportOutcome {
    /// The archive was written.
    Completed(ExportReport),
    /// Another export was already running; nothing was done.
    Busy,
}

/// Runs exports one at a time.
#[derive(Debug, Clone)]
pub struct Exporter {
    prefix: String,
    guard: ExportGuard,
}

impl Exporter {
    /// Create an exporter from configuration.
    #[must_use]
    pub fn new(config: &ExportConfig) -> Self {
        Self {
            prefix: config.archive_prefix.clone(),
            guard: ExportGuard::new(),
        }
    }

    /// The guard shared by every clone of this exporter.
    #[must_use]
    pub fn guard(&self) -> &ExportGuard {
        &self.guard
    }

    /// Export every record from `source` into `out_dir`, dated today (UTC).
    ///
    /// # Errors
    ///
    /// See [`Exporter::export_on`].
    pub async fn export(&self, source: &dyn RecordSource, out_dir: &Path) -> Result<ExportOutcome> {
        self.export_on(source, out_dir, Utc::now().date_naive()).await
    }

    /// Export every record from `source` into `out_dir`, dated `date`.
    ///
    /// Returns [`ExportOutcome::Busy`] without touching `source` if another
    /// export is in flight.
    ///
    /// # Errors
    ///
    /// Returns an error if the records cannot be fetched or the archive
    /// cannot be built or written. No archive file is left behind.
    pub async fn export_on(
        &self,
        source: &dyn RecordSource,
        out_dir: &Path,
        date: NaiveDate,
    ) -> Result<ExportOutcome> {
        let Some(_permit) = self.guard.try_acquire() else {
            info!("export already in progress");
            return Ok(ExportOutcome::Busy);
        };

        let records = source.fetch_all().await?;
        let record_count = records.len();
        info!(records = record_count, "starting export");

        let (bundle, bytes) = tokio::task::spawn_blocking(move || {
            let bundle = build_bundle(&records)?;
            let bytes = archive::write_archive(&bundle)?;
            Ok::<_, Error>((bundle, bytes))
        })
        .await
        .map_err(|e| Error::internal(format!("export task failed: {e}")))??;

        tokio::fs::create_dir_all(out_dir)
            .await
            .map_err(|source| Error::DirectoryCreate {
                path: out_dir.to_path_buf(),
                source,
            })?;

        let file_name = archive_file_name(&self.prefix, date);
        let path = out_dir.join(&file_name);
        write_atomically(&path, out_dir.join(format!(".{file_name}.partial")), &bytes).await?;

        let report = ExportReport {
            path,
            records: record_count,
            images: bundle.images.len(),
            skipped_images: bundle.skipped_images,
            bytes: bytes.len() as u64,
        };
        info!(
            path = %report.path.display(),
            images = report.images,
            bytes = report.bytes,
            "export complete"
        );
        Ok(ExportOutcome::Completed(report))
    }
}

async fn write_atomically(path: &Path, temp: PathBuf, bytes: &[u8]) -> Result<()> {
    if let Err(e) = tokio::fs::write(&temp, bytes).await {
        let _ = tokio::fs::remove_file(&temp).await;
        return Err(e.into());
    }
    if let Err(e) = tokio::fs::rename(&temp, path).await {
        let _ = tokio::fs::remove_file(&temp).await;
        return Err(e.into());
    }
    Ok(())
}
