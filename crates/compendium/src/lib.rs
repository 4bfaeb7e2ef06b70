//! `compendium` - Sketch canvas and export bundler for field-notes records
//!
//! This library provides the raster annotation canvas that produces a record's
//! image artifact, and the exporter that re-files every record and its image
//! into a portable CSV + JSON + PNG archive.

#![warn(missing_docs)]
#![warn(missing_debug_implementations)]
#![deny(unsafe_code)]

pub mod artifact;
pub mod canvas;
pub mod cli;
pub mod config;
pub mod error;
pub mod export;
pub mod form;
pub mod logging;
pub mod prefs;
pub mod record;

pub use artifact::Artifact;
pub use canvas::{CanvasSession, PhotoOutcome};
pub use config::Config;
pub use error::{Error, Result};
pub use export::{build_bundle, ExportBundle, ExportOutcome, ExportReport, Exporter};
pub use form::{ObservationForm, SubmitRequest};
pub use logging::init_logging;
pub use prefs::{MemoryPreferences, PreferenceStore, SqlitePreferences};
pub use record::{JsonFileSource, ObservationRecord, RecordSource};
