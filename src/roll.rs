//! Roll number classification and result-path resolution
//!
//! A roll number encodes everything needed to route and label a request:
//! two digits of enrollment year, a three-letter programme/department code,
//! and a serial (`21bcs001`). Classification is pure string work; path
//! resolution substitutes the batch code into the configured templates.

use crate::config::ScrapeConfig;
use crate::error::{Error, Result};
use url::Url;

/// Enrollment year from the two-digit prefix (`21bcs001` → 2021).
///
/// Returns `None` when the prefix is not two ASCII digits.
pub fn batch_year(roll_number: &str) -> Option<i32> {
    let code = batch_code(roll_number)?;
    code.parse::<i32>().ok().map(|y| 2000 + y)
}

/// Department name from the three-letter code at positions 2..5.
pub fn department(roll_number: &str) -> Option<&'static str> {
    let code = programme_code(roll_number)?;
    let name = match code.as_str() {
        "bar" => "Architecture",
        "bce" => "Civil Engineering",
        "bme" => "Mechanical Engineering",
        "bms" => "Materials Science and Engineering",
        "bma" => "Mathematics and Computing",
        "bph" => "Engineering Physics",
        "bcs" | "dcs" => "Computer Science and Engineering",
        "bec" | "dec" => "Electronics and Communication Engineering",
        "bee" => "Electrical Engineering",
        "bch" => "Chemical Engineering",
        _ => return None,
    };
    Some(name)
}

/// Programme name from the leading letter of the code.
///
/// `bar` is B.Arch, other `b..` codes are B.Tech, `d..` codes are the
/// Dual Degree continuation track. Unknown shapes return `None`.
pub fn programme(roll_number: &str) -> Option<&'static str> {
    // Only codes with a known department qualify
    department(roll_number)?;
    let code = programme_code(roll_number)?;
    match code.as_bytes().first() {
        _ if code == "bar" => Some("B.Arch"),
        Some(b'b') => Some("B.Tech"),
        Some(b'd') => Some("Dual Degree"),
        _ => None,
    }
}

/// Resolve the ordered result paths for an identifier.
///
/// The primary path always comes first. When `want_all_paths` is set and the
/// identifier belongs to a Dual Degree programme, the extended path (the
/// continuation track's result form) follows.
pub fn result_paths(
    config: &ScrapeConfig,
    roll_number: &str,
    want_all_paths: bool,
) -> Result<Vec<Url>> {
    let batch = batch_code(roll_number)
        .ok_or_else(|| Error::NoResultPath(roll_number.to_string()))?;
    let base = Url::parse(&config.base_url)?;

    let mut paths = vec![base.join(&config.result_path_template.replace("{batch}", &batch))?];
    if want_all_paths && programme(roll_number) == Some("Dual Degree") {
        paths.push(base.join(&config.extended_path_template.replace("{batch}", &batch))?);
    }
    Ok(paths)
}

fn batch_code(roll_number: &str) -> Option<String> {
    let prefix = roll_number.get(0..2)?;
    if prefix.bytes().all(|b| b.is_ascii_digit()) {
        Some(prefix.to_string())
    } else {
        None
    }
}

fn programme_code(roll_number: &str) -> Option<String> {
    Some(roll_number.get(2..5)?.to_ascii_lowercase())
}
