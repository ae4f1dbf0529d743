//! Dataset types
//!
//! The parsed family records, the aggregates derived from them and the
//! write-once store that publishes the snapshot to the rest of the page.

use regex::Regex;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::cell::OnceCell;
use std::sync::OnceLock;

use super::dates::submission_year;

/// Key of the member's document file name
pub const PDF_FILENAME_KEY: &str = "pdfFilename";

/// Older spelling of [`PDF_FILENAME_KEY`] still found in some records
pub const LEGACY_PDF_FILENAME_KEY: &str = "pDFfilename";

/// Key of the submission date
pub const DATE_SUBMITTED_KEY: &str = "dateSubmitted";

/// One record of the family dataset
///
/// The element is kept exactly as parsed. Only the document file name and the
/// submission date are interpreted, and only when they are non-empty strings.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FamilyMember {
    raw: serde_json::Value,
    pdf_filename: Option<String>,
    date_submitted: Option<String>,
}

fn non_empty_string(fields: &serde_json::Map<String, serde_json::Value>, key: &str) -> Option<String> {
    match fields.get(key) {
        Some(serde_json::Value::String(s)) if !s.is_empty() => Some(s.clone()),
        _ => None,
    }
}

impl FamilyMember {
    /// Build a member from one element of the dataset list
    ///
    /// Elements that are not JSON objects are kept but carry no file or date.
    pub fn from_value(value: serde_json::Value) -> Self {
        let (pdf_filename, date_submitted) = match &value {
            serde_json::Value::Object(fields) => (
                non_empty_string(fields, PDF_FILENAME_KEY)
                    .or_else(|| non_empty_string(fields, LEGACY_PDF_FILENAME_KEY)),
                non_empty_string(fields, DATE_SUBMITTED_KEY),
            ),
            _ => (None, None),
        };

        Self {
            raw: value,
            pdf_filename,
            date_submitted,
        }
    }

    /// The element as it appeared in the dataset
    pub fn raw(&self) -> &serde_json::Value {
        &self.raw
    }

    /// Any field of the record, interpreted or not
    pub fn field(&self, key: &str) -> Option<&serde_json::Value> {
        self.raw.get(key)
    }

    /// The member's document file name, if present and non-empty
    pub fn pdf_filename(&self) -> Option<&str> {
        self.pdf_filename.as_deref()
    }

    pub fn date_submitted(&self) -> Option<&str> {
        self.date_submitted.as_deref()
    }

    /// Year the record was submitted, if the date can be read
    pub fn submitted_year(&self) -> Option<i32> {
        self.date_submitted.as_deref().and_then(submission_year)
    }
}

impl Serialize for FamilyMember {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        self.raw.serialize(serializer)
    }
}

impl<'de> Deserialize<'de> for FamilyMember {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        serde_json::Value::deserialize(deserializer).map(Self::from_value)
    }
}

/// Aggregates shown in the home stats block
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct DerivedStats {
    pub total_members: usize,
    pub generations: u32,
    pub new_members: usize,
}

impl DerivedStats {
    /// Stats shown before the dataset has loaded
    pub fn placeholder(generations: u32) -> Self {
        Self {
            total_members: 0,
            generations,
            new_members: 0,
        }
    }

    /// Compute stats for `entries`, counting submissions in `current_year`
    pub fn derive(entries: &[FamilyMember], generations: u32, current_year: i32) -> Self {
        let new_members = entries
            .iter()
            .filter(|m| m.submitted_year() == Some(current_year))
            .count();

        Self {
            total_members: entries.len(),
            generations,
            new_members,
        }
    }
}

/// Read-only representation of a loaded dataset
#[derive(Debug, Clone, PartialEq)]
pub struct DatasetSnapshot {
    /// Entries exactly as parsed
    pub entries: Vec<FamilyMember>,
    /// Document file names of entries that have one, in dataset order
    pub member_files: Vec<String>,
    pub stats: DerivedStats,
    /// Calendar year used for the "new this year" count
    pub year: i32,
}

impl DatasetSnapshot {
    pub fn new(entries: Vec<FamilyMember>, generations: u32, current_year: i32) -> Self {
        let member_files = entries
            .iter()
            .filter_map(|m| m.pdf_filename().map(str::to_string))
            .collect();
        let stats = DerivedStats::derive(&entries, generations, current_year);

        Self {
            entries,
            member_files,
            stats,
            year: current_year,
        }
    }
}

/// Write-once holder for the page session's snapshot
#[derive(Debug, Default)]
pub struct SnapshotStore {
    cell: OnceCell<DatasetSnapshot>,
}

impl SnapshotStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Publish the snapshot; a second publish is rejected and returns it back
    pub fn publish(&self, snapshot: DatasetSnapshot) -> Result<&DatasetSnapshot, DatasetSnapshot> {
        if self.cell.get().is_some() {
            return Err(snapshot);
        }
        Ok(self.cell.get_or_init(|| snapshot))
    }

    pub fn get(&self) -> Option<&DatasetSnapshot> {
        self.cell.get()
    }

    pub fn is_loaded(&self) -> bool {
        self.cell.get().is_some()
    }

    /// Member document file names, empty until loaded
    pub fn member_files(&self) -> &[String] {
        self.cell
            .get()
            .map(|s| s.member_files.as_slice())
            .unwrap_or_default()
    }
}

/// Dropdown label for a document file name
pub fn display_name(pdf_filename: &str) -> String {
    pdf_filename.replacen(".pdf", "", 1).replace('_', " ")
}

/// Canonical key for a member name: lower case, `_` for spaces, `[a-z0-9_]` only
pub fn normalize_name(name: &str) -> String {
    static WHITESPACE: OnceLock<Regex> = OnceLock::new();
    static DISALLOWED: OnceLock<Regex> = OnceLock::new();

    let whitespace = WHITESPACE.get_or_init(|| Regex::new(r"\s+").expect("valid regex"));
    let disallowed = DISALLOWED.get_or_init(|| Regex::new(r"[^a-z0-9_]").expect("valid regex"));

    let lowered = name.to_lowercase();
    let joined = whitespace.replace_all(&lowered, "_");
    disallowed.replace_all(&joined, "").into_owned()
}
