//! Core data model: student records and per-identifier scrape outcomes
//!
//! Wire names are camelCase to stay byte-compatible with the JSON the
//! original service emitted.

use serde::{Deserialize, Serialize};

/// One student's full academic history, as decoded from a result document.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StudentRecord {
    /// Roll number decoded from the identity table (unique key)
    pub roll_number: String,
    /// Student name
    pub name: String,
    /// Father's name
    pub fathers_name: String,
    /// Department name derived from the roll number shape
    pub branch: String,
    /// Programme name derived from the roll number shape
    pub programme: String,
    /// Enrollment year (2000 + two-digit prefix of the roll number)
    pub batch: i32,
    /// Cumulative grade index: the last semester's CGPI at decode time,
    /// raised to the maximum across merged extended paths
    pub cgpi: f64,
    /// Term results in term order; extended paths append to this
    pub semester_results: Vec<SemesterResult>,
}

impl StudentRecord {
    /// Merge an extended-path record into this one.
    ///
    /// Each extended term is relabeled `"Masters Sem NN"` (1-based within
    /// that path) and appended after the existing terms; the existing term
    /// labels are never touched. The cumulative CGPI is raised to the
    /// extended record's value when it is higher.
    pub fn merge_extended(&mut self, extended: StudentRecord) {
        for (i, mut semester) in extended.semester_results.into_iter().enumerate() {
            semester.semester_number = format!("Masters Sem {:02}", i + 1);
            self.semester_results.push(semester);
        }
        if extended.cgpi > self.cgpi {
            self.cgpi = extended.cgpi;
        }
    }
}

/// One academic term's outcome.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SemesterResult {
    /// Ordinary term index ("1", "2", ...) or a synthetic label for merged
    /// extended paths ("Masters Sem 01", ...)
    pub semester_number: String,
    /// Subjects taken in this term, in table row order
    pub subject_results: Vec<SubjectResult>,
    /// Term grade-point index
    pub sgpi: f64,
    /// Term credit-weighted total
    pub sgpi_total: i64,
    /// Cumulative grade-point index as of this term
    pub cgpi: f64,
    /// Cumulative credit-weighted total as of this term
    pub cgpi_total: i64,
}

/// One subject within a term.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SubjectResult {
    /// Subject title
    pub subject_name: String,
    /// Subject code
    pub subject_code: String,
    /// Credit count (unparseable cells decode as 0)
    pub credit: i64,
    /// Letter grade
    pub grade: String,
    /// Grade points earned (unparseable cells decode as 0)
    pub points: i64,
    /// `points / credit`; `None` when credit is zero
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cgpi: Option<f64>,
}

/// Per-identifier outcome of a bulk scrape.
///
/// Exactly one of `record` / `error` is populated.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScrapeOutcome {
    /// The identifier this outcome belongs to
    pub roll_number: String,
    /// The decoded record, on success
    #[serde(rename = "data", skip_serializing_if = "Option::is_none")]
    pub record: Option<StudentRecord>,
    /// Display form of the failure, on error
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl ScrapeOutcome {
    /// Successful outcome carrying a decoded record
    pub fn success(roll_number: impl Into<String>, record: StudentRecord) -> Self {
        Self {
            roll_number: roll_number.into(),
            record: Some(record),
            error: None,
        }
    }

    /// Failed outcome carrying the error's display form
    pub fn failure(roll_number: impl Into<String>, error: impl std::fmt::Display) -> Self {
        Self {
            roll_number: roll_number.into(),
            record: None,
            error: Some(error.to_string()),
        }
    }
}
