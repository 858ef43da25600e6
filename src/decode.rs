//! Document Decoder — positional HTML-table decoding into [`StudentRecord`]
//!
//! The result page carries no semantic markup; tables are addressed purely
//! by position. Instead of scattering index arithmetic, each table is first
//! classified into a [`TableRole`] and then decoded per role:
//!
//! - table 0: banner/title — ignored
//! - table 1: identity row (roll number, name, father's name)
//! - tables 2..n-2: alternating subject/summary pairs, one pair per term
//! - table n-1: decorative trailer — ignored
//!
//! Unparseable numeric cells decode as zero and are reported at warn level
//! rather than failing the document.

use crate::error::{Error, Result};
use crate::roll;
use crate::types::{SemesterResult, StudentRecord, SubjectResult};
use regex::Regex;
use scraper::{ElementRef, Html, Selector};
use std::sync::LazyLock;

static TABLE: LazyLock<Selector> = LazyLock::new(|| selector("table"));
static ROW: LazyLock<Selector> = LazyLock::new(|| selector("tr"));
static CELL: LazyLock<Selector> = LazyLock::new(|| selector("td"));
static HEADING: LazyLock<Selector> = LazyLock::new(|| selector("h2"));

/// Characters stripped from numeric cells before parsing
#[allow(clippy::expect_used)]
static NUMERIC_JUNK: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[^0-9.\-]").expect("static regex"));

/// Heading text the remote service shows for nonexistent roll numbers
const INVALID_ROLL_HEADING: &str = "Kindly Check the Roll Number";

/// Identity-cell label substrings stripped before reading the value
const IDENTITY_LABELS: [&str; 3] = ["ROLL NUMBER", "STUDENT NAME", "FATHER NAME"];

// css literals are compile-time constants; parse cannot fail
#[allow(clippy::expect_used)]
fn selector(css: &str) -> Selector {
    Selector::parse(css).expect("static selector")
}

/// Positional classification of one table in the document.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum TableRole {
    /// Banner/title table (index 0)
    Banner,
    /// Identity row: roll number, name, father's name (index 1)
    Identity,
    /// Subject rows for one term
    Subjects {
        /// 0-based term index
        term: usize,
    },
    /// Term summary (SGPI/CGPI and totals) for one term
    Summary {
        /// 0-based term index
        term: usize,
    },
    /// Decorative trailing table (last index)
    Trailer,
}

/// Classify every table by position, validating the overall count.
///
/// A well-formed document has `3 + 2T` tables for `T >= 1` terms.
fn classify_tables(count: usize) -> Result<Vec<TableRole>> {
    if count < 5 || (count - 3) % 2 != 0 {
        return Err(Error::InvalidHtmlStructure(format!(
            "expected 3 + 2T tables for T >= 1 terms, found {count}"
        )));
    }
    let mut roles = Vec::with_capacity(count);
    roles.push(TableRole::Banner);
    roles.push(TableRole::Identity);
    for k in 0..count - 3 {
        if k % 2 == 0 {
            roles.push(TableRole::Subjects { term: k / 2 });
        } else {
            roles.push(TableRole::Summary { term: k / 2 });
        }
    }
    roles.push(TableRole::Trailer);
    Ok(roles)
}

/// Decode a raw result document into a typed [`StudentRecord`].
///
/// The invalid-roll heading check takes precedence over all structural
/// validation: a document carrying the marker classifies as
/// [`Error::RollNumberNotFound`] regardless of its table contents.
pub fn decode(html: &str) -> Result<StudentRecord> {
    if html.trim().is_empty() {
        return Err(Error::UnknownParsing);
    }
    let document = Html::parse_document(html);

    for heading in document.select(&HEADING) {
        if element_text(heading).eq_ignore_ascii_case(INVALID_ROLL_HEADING) {
            return Err(Error::RollNumberNotFound);
        }
    }

    let tables: Vec<ElementRef<'_>> = document.select(&TABLE).collect();
    let roles = classify_tables(tables.len())?;
    let term_count = (tables.len() - 3) / 2;

    let mut roll_number = String::new();
    let mut name = String::new();
    let mut fathers_name = String::new();
    let mut semesters: Vec<SemesterResult> = (0..term_count)
        .map(|term| SemesterResult {
            semester_number: (term + 1).to_string(),
            subject_results: vec![],
            sgpi: 0.0,
            sgpi_total: 0,
            cgpi: 0.0,
            cgpi_total: 0,
        })
        .collect();

    for (table, role) in tables.iter().zip(roles) {
        match role {
            TableRole::Banner | TableRole::Trailer => {}
            TableRole::Identity => {
                let mut cells = table.select(&CELL).map(identity_cell_text);
                roll_number = cells.next().unwrap_or_default();
                name = cells.next().unwrap_or_default();
                fathers_name = cells.next().unwrap_or_default();
            }
            TableRole::Subjects { term } => {
                semesters[term].subject_results = decode_subjects(*table);
            }
            TableRole::Summary { term } => {
                decode_summary(*table, &mut semesters[term]);
            }
        }
    }

    let programme = roll::programme(&roll_number).ok_or_else(|| Error::UnknownProgramme {
        roll_number: roll_number.clone(),
    })?;
    let branch = roll::department(&roll_number).unwrap_or("Unknown").to_string();
    let batch = roll::batch_year(&roll_number).unwrap_or(0);

    // classify_tables guarantees at least one term
    let cgpi = semesters.last().map(|s| s.cgpi).unwrap_or(0.0);

    Ok(StudentRecord {
        roll_number,
        name,
        fathers_name,
        branch,
        programme: programme.to_string(),
        batch,
        cgpi,
        semester_results: semesters,
    })
}

/// Decode one subject table: the first two rows are headers, every further
/// row is one subject with cell index → field mapping.
fn decode_subjects(table: ElementRef<'_>) -> Vec<SubjectResult> {
    let mut subjects = Vec::new();
    for row in table.select(&ROW).skip(2) {
        let mut subject = SubjectResult {
            subject_name: String::new(),
            subject_code: String::new(),
            credit: 0,
            grade: String::new(),
            points: 0,
            cgpi: None,
        };
        for (index, cell) in row.select(&CELL).enumerate() {
            let text = element_text(cell);
            match index {
                1 => subject.subject_name = text,
                2 => subject.subject_code = text,
                3 => subject.credit = parse_int_cell(&text),
                4 => subject.grade = text,
                5 => subject.points = parse_int_cell(&text),
                _ => {}
            }
        }
        subject.cgpi = if subject.credit != 0 {
            Some(subject.points as f64 / subject.credit as f64)
        } else {
            None
        };
        subjects.push(subject);
    }
    subjects
}

/// Decode one summary table: each cell holds `LABEL = value`; the value is
/// whatever follows the first `=` (the whole cell when no `=` is present).
fn decode_summary(table: ElementRef<'_>, semester: &mut SemesterResult) {
    for (index, cell) in table.select(&CELL).enumerate() {
        let text = element_text(cell);
        let value = match text.find('=') {
            Some(pos) => text[pos + 1..].trim().to_string(),
            None => text,
        };
        match index {
            1 => semester.sgpi = parse_float_cell(&value),
            2 => semester.sgpi_total = parse_int_cell(&value),
            3 => semester.cgpi = parse_float_cell(&value),
            4 => semester.cgpi_total = parse_int_cell(&value),
            _ => {}
        }
    }
}

fn identity_cell_text(cell: ElementRef<'_>) -> String {
    let mut text: String = cell.text().collect();
    for label in IDENTITY_LABELS {
        text = text.replace(label, "");
    }
    text.trim().to_string()
}

fn element_text(element: ElementRef<'_>) -> String {
    element.text().collect::<String>().trim().to_string()
}

/// Tolerant integer parse: strip non-numeric characters, fall back through a
/// float parse, default to zero with a warning. Bad cells never abort the
/// decode.
fn parse_int_cell(text: &str) -> i64 {
    let cleaned = NUMERIC_JUNK.replace_all(text, "");
    if let Ok(value) = cleaned.parse::<i64>() {
        return value;
    }
    if let Ok(value) = cleaned.parse::<f64>() {
        return value as i64;
    }
    if !text.trim().is_empty() {
        tracing::warn!(cell = %text, "unparseable integer cell, defaulting to 0");
    }
    0
}

/// Tolerant float parse; same contract as [`parse_int_cell`].
fn parse_float_cell(text: &str) -> f64 {
    let cleaned = NUMERIC_JUNK.replace_all(text, "");
    match cleaned.parse::<f64>() {
        Ok(value) => value,
        Err(_) => {
            if !text.trim().is_empty() {
                tracing::warn!(cell = %text, "unparseable float cell, defaulting to 0");
            }
            0.0
        }
    }
}
