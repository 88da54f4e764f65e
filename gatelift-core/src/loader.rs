//! CSV Loader
//!
//! Reads experiment logs shaped like the Cookie Cats dataset:
//! `userid,version,sum_gamerounds,retention_1,retention_7`. Column names are
//! matched against a small alias table so exports with canonical names
//! (`user_id`, `group`, `rounds_played`) load without remapping.

use crate::dataset::{Dataset, Group, Observation};
use std::collections::{HashMap, HashSet};
use std::io::Read;
use std::path::Path;
use thiserror::Error;

/// Accepted header spellings, canonical name first
const USER_ALIASES: &[&str] = &["userid", "user_id"];
const GROUP_ALIASES: &[&str] = &["version", "group", "variant"];
const ROUNDS_ALIASES: &[&str] = &["sum_gamerounds", "rounds_played", "game_rounds"];
const RETENTION_1_ALIASES: &[&str] = &["retention_1"];
const RETENTION_7_ALIASES: &[&str] = &["retention_7"];

/// Errors raised while loading a dataset. All variants are data-format
/// problems surfaced to the uploader; none are fatal to the process.
#[derive(Debug, Error)]
pub enum LoadError {
    /// A required column is absent from the header row
    #[error("missing required column: {0} (accepted names: {1})")]
    MissingColumn(&'static str, String),
    /// A cell failed to parse
    #[error("row {row}: {message}")]
    MalformedRow {
        /// 1-based data row number
        row: usize,
        /// What failed to parse
        message: String,
    },
    /// The file has no data rows
    #[error("dataset contains no rows")]
    Empty,
    /// The user-id invariant is violated
    #[error("duplicate user id: {0}")]
    DuplicateUserId(String),
    /// The group column must carry exactly two distinct labels
    #[error("expected exactly 2 group labels, found {found}: {labels}")]
    GroupLabels {
        /// Number of distinct labels seen
        found: usize,
        /// The labels, comma-separated
        labels: String,
    },
    /// Underlying CSV syntax error
    #[error("csv error: {0}")]
    Csv(#[from] csv::Error),
}

/// Read a dataset from any CSV source with a header row.
pub fn read_csv<R: Read>(reader: R) -> Result<Dataset, LoadError> {
    let mut csv_reader = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .from_reader(reader);

    let headers = csv_reader.headers()?.clone();
    let user_idx = find_column(&headers, "user id", USER_ALIASES)?;
    let group_idx = find_column(&headers, "group label", GROUP_ALIASES)?;
    let rounds_idx = find_column(&headers, "rounds played", ROUNDS_ALIASES)?;
    let ret1_idx = find_column(&headers, "retention_1", RETENTION_1_ALIASES)?;
    let ret7_idx = find_column(&headers, "retention_7", RETENTION_7_ALIASES)?;

    // First pass: parse cells, keeping the raw group label until we know
    // which of the two labels is the control arm.
    struct RawRow {
        user_id: String,
        label: String,
        retention_1: bool,
        retention_7: bool,
        rounds_played: u32,
    }

    let mut rows: Vec<RawRow> = Vec::new();
    let mut seen_ids: HashSet<String> = HashSet::new();

    for (i, record) in csv_reader.records().enumerate() {
        let row = i + 1;
        let record = record?;

        let user_id = field(&record, user_idx, row, "user id")?.to_string();
        if !seen_ids.insert(user_id.clone()) {
            return Err(LoadError::DuplicateUserId(user_id));
        }

        let label = field(&record, group_idx, row, "group label")?.to_string();
        if label.is_empty() {
            return Err(LoadError::MalformedRow {
                row,
                message: "empty group label".to_string(),
            });
        }

        let rounds_raw = field(&record, rounds_idx, row, "rounds played")?;
        let rounds_played: u32 = rounds_raw.parse().map_err(|_| LoadError::MalformedRow {
            row,
            message: format!("invalid rounds played value: {rounds_raw:?}"),
        })?;

        rows.push(RawRow {
            user_id,
            label,
            retention_1: parse_bool(field(&record, ret1_idx, row, "retention_1")?, row)?,
            retention_7: parse_bool(field(&record, ret7_idx, row, "retention_7")?, row)?,
            rounds_played,
        });
    }

    if rows.is_empty() {
        return Err(LoadError::Empty);
    }

    // Second pass: resolve the two raw labels into control/test.
    let mut labels: Vec<&str> = Vec::new();
    for row in &rows {
        if !labels.contains(&row.label.as_str()) {
            labels.push(&row.label);
        }
    }
    if labels.len() != 2 {
        return Err(LoadError::GroupLabels {
            found: labels.len(),
            labels: labels.join(", "),
        });
    }
    let control_label = resolve_control_label(labels[0], labels[1]).to_string();

    let assignment: HashMap<String, Group> = rows
        .iter()
        .map(|r| {
            let group = if r.label == control_label {
                Group::Control
            } else {
                Group::Test
            };
            (r.label.clone(), group)
        })
        .collect();

    let observations = rows
        .into_iter()
        .map(|r| Observation {
            group: assignment[&r.label],
            user_id: r.user_id,
            retention_1: r.retention_1,
            retention_7: r.retention_7,
            rounds_played: r.rounds_played,
        })
        .collect();

    Ok(Dataset::new(observations))
}

/// Read a dataset from a file path.
pub fn read_csv_path(path: impl AsRef<Path>) -> Result<Dataset, LoadError> {
    let file = std::fs::File::open(path.as_ref()).map_err(|e| {
        LoadError::Csv(csv::Error::from(e))
    })?;
    read_csv(file)
}

/// Decide which of two raw labels is the control arm: a literal `control`
/// wins, then the dataset default `gate_30`, then lexicographic order.
fn resolve_control_label<'a>(a: &'a str, b: &'a str) -> &'a str {
    for label in [a, b] {
        if label.eq_ignore_ascii_case("control") {
            return label;
        }
    }
    for label in [a, b] {
        if label.eq_ignore_ascii_case("gate_30") {
            return label;
        }
    }
    a.min(b)
}

fn find_column(
    headers: &csv::StringRecord,
    name: &'static str,
    aliases: &[&str],
) -> Result<usize, LoadError> {
    headers
        .iter()
        .position(|h| aliases.iter().any(|a| h.eq_ignore_ascii_case(a)))
        .ok_or_else(|| LoadError::MissingColumn(name, aliases.join(", ")))
}

fn field<'r>(
    record: &'r csv::StringRecord,
    idx: usize,
    row: usize,
    name: &str,
) -> Result<&'r str, LoadError> {
    record.get(idx).ok_or_else(|| LoadError::MalformedRow {
        row,
        message: format!("missing {name} cell"),
    })
}

fn parse_bool(raw: &str, row: usize) -> Result<bool, LoadError> {
    match raw.to_ascii_lowercase().as_str() {
        "true" | "t" | "1" | "yes" => Ok(true),
        "false" | "f" | "0" | "no" => Ok(false),
        other => Err(LoadError::MalformedRow {
            row,
            message: format!("invalid boolean value: {other:?}"),
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const COOKIE_CATS_SAMPLE: &str = "\
userid,version,sum_gamerounds,retention_1,retention_7
116,gate_30,3,FALSE,FALSE
337,gate_30,38,TRUE,FALSE
377,gate_40,165,TRUE,FALSE
483,gate_40,1,FALSE,FALSE
";

    #[test]
    fn test_load_cookie_cats_shape() {
        let ds = read_csv(COOKIE_CATS_SAMPLE.as_bytes()).unwrap();

        assert_eq!(ds.len(), 4);
        // gate_30 is the control arm by dataset convention.
        assert_eq!(ds.rounds_played(Group::Control), vec![3.0, 38.0]);
        assert_eq!(ds.rounds_played(Group::Test), vec![165.0, 1.0]);
        assert_eq!(ds.retention_1(Group::Control), vec![false, true]);
    }

    #[test]
    fn test_canonical_headers_and_numeric_bools() {
        let csv = "\
user_id,group,rounds_played,retention_1,retention_7
a,control,10,1,0
b,treatment,20,0,1
";
        let ds = read_csv(csv.as_bytes()).unwrap();

        assert_eq!(ds.rounds_played(Group::Control), vec![10.0]);
        assert_eq!(ds.rounds_played(Group::Test), vec![20.0]);
        assert_eq!(ds.retention_7(Group::Test), vec![true]);
    }

    #[test]
    fn test_arbitrary_labels_resolve_lexicographically() {
        let csv = "\
userid,version,sum_gamerounds,retention_1,retention_7
1,variant_b,10,1,0
2,variant_a,20,0,1
";
        let ds = read_csv(csv.as_bytes()).unwrap();

        // variant_a sorts first, so it becomes control.
        assert_eq!(ds.rounds_played(Group::Control), vec![20.0]);
        assert_eq!(ds.rounds_played(Group::Test), vec![10.0]);
    }

    #[test]
    fn test_missing_column() {
        let csv = "userid,version,retention_1,retention_7\n1,gate_30,1,0\n";
        let err = read_csv(csv.as_bytes()).unwrap_err();
        assert!(matches!(err, LoadError::MissingColumn("rounds played", _)));
    }

    #[test]
    fn test_empty_file() {
        let err = read_csv("".as_bytes()).unwrap_err();
        // No header at all parses as an empty header row; the first required
        // column lookup fails.
        assert!(matches!(err, LoadError::MissingColumn(..)));
    }

    #[test]
    fn test_header_only_file() {
        let csv = "userid,version,sum_gamerounds,retention_1,retention_7\n";
        let err = read_csv(csv.as_bytes()).unwrap_err();
        assert!(matches!(err, LoadError::Empty));
    }

    #[test]
    fn test_duplicate_user_id() {
        let csv = "\
userid,version,sum_gamerounds,retention_1,retention_7
1,gate_30,3,0,0
1,gate_40,5,1,0
";
        let err = read_csv(csv.as_bytes()).unwrap_err();
        assert!(matches!(err, LoadError::DuplicateUserId(id) if id == "1"));
    }

    #[test]
    fn test_wrong_label_count() {
        let csv = "\
userid,version,sum_gamerounds,retention_1,retention_7
1,gate_30,3,0,0
2,gate_40,5,1,0
3,gate_50,8,1,1
";
        let err = read_csv(csv.as_bytes()).unwrap_err();
        assert!(matches!(err, LoadError::GroupLabels { found: 3, .. }));
    }

    #[test]
    fn test_malformed_rounds() {
        let csv = "\
userid,version,sum_gamerounds,retention_1,retention_7
1,gate_30,lots,0,0
2,gate_40,5,1,0
";
        let err = read_csv(csv.as_bytes()).unwrap_err();
        assert!(matches!(err, LoadError::MalformedRow { row: 1, .. }));
    }

    #[test]
    fn test_malformed_bool() {
        let csv = "\
userid,version,sum_gamerounds,retention_1,retention_7
1,gate_30,3,maybe,0
";
        let err = read_csv(csv.as_bytes()).unwrap_err();
        assert!(matches!(err, LoadError::MalformedRow { row: 1, .. }));
    }
}
