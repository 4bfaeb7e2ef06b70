//! The observation form that owns a canvas session.
//!
//! The form holds the editable fields of one record, pre-fills the researcher
//! name from the preference store and, on submit, captures the canvas into
//! the record's image field before validating. Persisting the result is left
//! to the caller's CRUD client.

use thiserror::Error;
use tracing::{debug, warn};

use crate::artifact::Artifact;
use crate::canvas::CanvasSession;
use crate::prefs::{PreferenceStore, LAST_RESEARCHER_KEY};
use crate::record::ObservationRecord;

/// Reasons a form cannot be submitted.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FormError {
    /// Required fields are empty after trimming.
    #[error("missing required fields: {}", .0.join(", "))]
    MissingFields(Vec<&'static str>),

    /// An existing record was opened for editing but carries no id.
    #[error("record has no id and cannot be edited")]
    MissingId,
}

/// The editable fields of an observation.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ObservationDraft {
    /// Who made the observation. Required.
    pub researcher_name: String,
    /// Common name. Required.
    pub common_name: String,
    /// Scientific name.
    pub scientific_name: String,
    /// Habitat.
    pub habitat: String,
    /// Free-text notes.
    pub field_notes: String,
    /// Canvas artifact; empty for no image.
    pub image_data: Artifact,
}

/// Whether the form creates a record or updates one.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FormMode {
    /// A new record.
    Create,
    /// An existing record with the given id.
    Edit {
        /// Id of the record being edited.
        id: String,
    },
}

/// What the CRUD layer should do with a submitted form.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SubmitRequest {
    /// Create a record from the draft.
    Create(ObservationDraft),
    /// Replace the fields of an existing record.
    Update {
        /// Id of the record to update.
        id: String,
        /// New field values.
        draft: ObservationDraft,
    },
}

/// One open observation form.
#[derive(Debug, Clone)]
pub struct ObservationForm {
    mode: FormMode,
    /// Current field values.
    pub draft: ObservationDraft,
}

impl ObservationForm {
    /// Open an empty form.
    ///
    /// The researcher name is pre-filled from `prefs` when a previous submit
    /// remembered one.
    #[must_use]
    pub fn new_entry(prefs: Option<&dyn PreferenceStore>) -> Self {
        let researcher_name = prefs
            .and_then(|store| match store.get(LAST_RESEARCHER_KEY) {
                Ok(value) => value,
                Err(e) => {
                    warn!(error = %e, "could not read remembered researcher name");
                    None
                }
            })
            .unwrap_or_default();

        Self {
            mode: FormMode::Create,
            draft: ObservationDraft {
                researcher_name,
                ..ObservationDraft::default()
            },
        }
    }

    /// Open an existing record for editing.
    ///
    /// # Errors
    ///
    /// Returns [`FormError::MissingId`] if the record has no id.
    pub fn edit(record: &ObservationRecord) -> Result<Self, FormError> {
        let id = record
            .id
            .clone()
            .filter(|id| !id.is_empty())
            .ok_or(FormError::MissingId)?;

        let field = |v: Option<&str>| v.unwrap_or_default().to_string();
        Ok(Self {
            mode: FormMode::Edit { id },
            draft: ObservationDraft {
                researcher_name: field(record.researcher_name.as_deref()),
                common_name: field(record.common_name.as_deref()),
                scientific_name: field(record.scientific_name.as_deref()),
                habitat: field(record.habitat.as_deref()),
                field_notes: field(record.field_notes.as_deref()),
                image_data: record.artifact(),
            },
        })
    }

    /// Create or edit.
    #[must_use]
    pub fn mode(&self) -> &FormMode {
        &self.mode
    }

    /// The artifact a canvas session for this form should be seeded with.
    #[must_use]
    pub fn seed_artifact(&self) -> Option<&Artifact> {
        Some(&self.draft.image_data).filter(|a| !a.is_empty())
    }

    /// Names of required fields that are blank.
    #[must_use]
    pub fn missing_fields(&self) -> Vec<&'static str> {
        let mut missing = Vec::new();
        if self.draft.researcher_name.trim().is_empty() {
            missing.push("researcherName");
        }
        if self.draft.common_name.trim().is_empty() {
            missing.push("commonName");
        }
        missing
    }

    /// Whether the form can be submitted.
    #[must_use]
    pub fn is_valid(&self) -> bool {
        self.missing_fields().is_empty()
    }

    /// Capture the canvas, validate and build the request for the CRUD layer.
    ///
    /// The canvas is snapshotted first so the latest strokes are included even
    /// if the final pointer-up has not been processed. An untouched blank
    /// canvas leaves the image empty. After a valid submit the researcher name
    /// is remembered in `prefs`.
    ///
    /// # Errors
    ///
    /// Returns [`FormError::MissingFields`] when required fields are blank.
    pub fn submit(
        &mut self,
        canvas: &mut CanvasSession,
        prefs: Option<&dyn PreferenceStore>,
    ) -> Result<SubmitRequest, FormError> {
        if canvas.is_stroking() {
            canvas.end_stroke();
        }
        self.draft.image_data = if canvas.artifact().is_empty() && canvas.is_blank() {
            Artifact::empty()
        } else {
            canvas.snapshot()
        };

        let missing = self.missing_fields();
        if !missing.is_empty() {
            debug!(?missing, "form submit rejected");
            return Err(FormError::MissingFields(missing));
        }

        if let Some(store) = prefs {
            if let Err(e) = store.set(LAST_RESEARCHER_KEY, self.draft.researcher_name.trim()) {
                warn!(error = %e, "could not remember researcher name");
            }
        }

        Ok(match &self.mode {
            FormMode::Create => SubmitRequest::Create(self.draft.clone()),
            FormMode::Edit { id } => SubmitRequest::Update {
                id: id.clone(),
                draft: self.draft.clone(),
            },
        })
    }
}
