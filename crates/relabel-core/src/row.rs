//! Annotation row model.
//!
//! One row is a single audio clip with the transcription the model produced,
//! the human correction, and a set of categorical tags. The schema matches
//! the server's table exactly; `PUT /rows/{id}` expects the full record, so
//! every column round-trips through the client unchanged.

use serde::{Deserialize, Serialize};

/// Stable server-assigned row identifier.
pub type RowId = i64;

/// Every string field of the row schema, in server column order.
///
/// `id` is deliberately absent: it is the row key, not an editable field.
pub const FIELDS: &[&str] = &[
    "audio_file_path",
    "human_output",
    "model_output_v1",
    "model_output_v2",
    "accuracy_v1",
    "accuracy_v2",
    "cdng",
    "date",
    "ngdu",
    "gu",
    "oiler_number",
    "rut",
    "ip_address",
    "isu",
];

/// The subset of fields a reviewer edits in the UI: the human transcription
/// plus the categorical tags.
pub const EDITABLE_FIELDS: &[&str] = &[
    "human_output",
    "cdng",
    "ngdu",
    "gu",
    "oiler_number",
    "rut",
    "ip_address",
    "isu",
];

/// A single annotation record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Row {
    /// Stable identifier, unique within a snapshot
    pub id: RowId,

    /// Path of the audio clip, relative to the server's static root
    pub audio_file_path: String,

    /// Human-corrected transcription
    pub human_output: String,

    /// Model transcription (first model version)
    pub model_output_v1: String,

    /// Model transcription (second model version)
    pub model_output_v2: String,

    /// Accuracy score of the v1 output, as reported by the server
    pub accuracy_v1: String,

    /// Accuracy score of the v2 output, as reported by the server
    pub accuracy_v2: String,

    /// Oil and gas production shop tag
    pub cdng: String,

    /// Recording date
    pub date: String,

    /// Production department tag
    pub ngdu: String,

    /// Metering station tag
    pub gu: String,

    /// Well number tag
    pub oiler_number: String,

    /// Route tag
    pub rut: String,

    /// Source device IP address
    pub ip_address: String,

    /// Measurement system tag
    pub isu: String,
}

impl Row {
    /// Check whether `name` is a field of the row schema.
    pub fn is_field(name: &str) -> bool {
        FIELDS.contains(&name)
    }

    /// Get a field value by schema name. Returns `None` for names outside
    /// the schema.
    pub fn field(&self, name: &str) -> Option<&str> {
        let value = match name {
            "audio_file_path" => &self.audio_file_path,
            "human_output" => &self.human_output,
            "model_output_v1" => &self.model_output_v1,
            "model_output_v2" => &self.model_output_v2,
            "accuracy_v1" => &self.accuracy_v1,
            "accuracy_v2" => &self.accuracy_v2,
            "cdng" => &self.cdng,
            "date" => &self.date,
            "ngdu" => &self.ngdu,
            "gu" => &self.gu,
            "oiler_number" => &self.oiler_number,
            "rut" => &self.rut,
            "ip_address" => &self.ip_address,
            "isu" => &self.isu,
            _ => return None,
        };
        Some(value.as_str())
    }

    /// Set a field value by schema name. Returns `false` (and leaves the row
    /// untouched) for names outside the schema.
    pub fn set_field(&mut self, name: &str, value: impl Into<String>) -> bool {
        let slot = match name {
            "audio_file_path" => &mut self.audio_file_path,
            "human_output" => &mut self.human_output,
            "model_output_v1" => &mut self.model_output_v1,
            "model_output_v2" => &mut self.model_output_v2,
            "accuracy_v1" => &mut self.accuracy_v1,
            "accuracy_v2" => &mut self.accuracy_v2,
            "cdng" => &mut self.cdng,
            "date" => &mut self.date,
            "ngdu" => &mut self.ngdu,
            "gu" => &mut self.gu,
            "oiler_number" => &mut self.oiler_number,
            "rut" => &mut self.rut,
            "ip_address" => &mut self.ip_address,
            "isu" => &mut self.isu,
            _ => return false,
        };
        *slot = value.into();
        true
    }
}

/// Test fixture shared by the in-crate unit tests.
#[cfg(test)]
pub(crate) fn sample_row(id: RowId) -> Row {
    Row {
        id,
        audio_file_path: format!("clips/{id}.wav"),
        human_output: String::new(),
        model_output_v1: "model says".to_string(),
        model_output_v2: String::new(),
        accuracy_v1: "0.9".to_string(),
        accuracy_v2: String::new(),
        cdng: "CDNG-1".to_string(),
        date: "2024-11-02".to_string(),
        ngdu: "NGDU-3".to_string(),
        gu: "GU-7".to_string(),
        oiler_number: "118".to_string(),
        rut: "R-2".to_string(),
        ip_address: "10.0.0.15".to_string(),
        isu: "ISU-A".to_string(),
    }
}
