//! Header row detection and column-to-field mapping

use super::reader::{Cell, RawSheet};
use regex::Regex;

/// Required column labels, in canonical order
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HeaderSpec {
    labels: Vec<String>,
}

impl HeaderSpec {
    pub fn new<S: Into<String>>(labels: impl IntoIterator<Item = S>) -> Self {
        Self {
            labels: labels
                .into_iter()
                .map(Into::into)
                .filter(|label: &String| !label.trim().is_empty())
                .collect(),
        }
    }

    pub fn labels(&self) -> &[String] {
        &self.labels
    }

    /// Matchers used to recognise the header row, one per label
    fn matchers(&self) -> Vec<LabelMatcher> {
        self.labels.iter().map(|l| LabelMatcher::new(l)).collect()
    }
}

/// Case-insensitive containment test for one label.
///
/// The lowercased label is searched as a regular expression; labels that
/// are not valid patterns fall back to plain substring search.
#[derive(Debug)]
enum LabelMatcher {
    Pattern(Regex),
    Literal(String),
}

impl LabelMatcher {
    fn new(label: &str) -> Self {
        let lowered = label.trim().to_lowercase();
        match Regex::new(&lowered) {
            Ok(re) => LabelMatcher::Pattern(re),
            Err(e) => {
                log::debug!("Label '{}' is not a valid pattern ({}), matching literally", label, e);
                LabelMatcher::Literal(lowered)
            }
        }
    }

    /// `cell` must already be trimmed and lowercased
    fn matches(&self, cell: &str) -> bool {
        match self {
            LabelMatcher::Pattern(re) => re.is_match(cell),
            LabelMatcher::Literal(s) => cell.contains(s.as_str()),
        }
    }
}

/// Index of the first row holding every required label, if any
pub fn locate_header(sheet: &RawSheet, spec: &HeaderSpec) -> Option<usize> {
    let matchers = spec.matchers();
    if matchers.is_empty() {
        return None;
    }

    sheet.rows.iter().position(|row| {
        let cells: Vec<String> = row.iter().map(Cell::normalized).collect();
        matchers
            .iter()
            .all(|m| cells.iter().any(|cell| m.matches(cell)))
    })
}

/// The row that came closest to being a header, for error reporting
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PartialHeader {
    pub row: usize,
    pub found: Vec<String>,
    pub missing: Vec<String>,
}

/// Row matching the most labels when no row matches all of them.
///
/// Ties go to the earliest row. Returns `None` when no row matches any
/// label at all.
pub fn closest_header(sheet: &RawSheet, spec: &HeaderSpec) -> Option<PartialHeader> {
    let matchers = spec.matchers();
    let mut best: Option<(usize, Vec<bool>)> = None;

    for (index, row) in sheet.rows.iter().enumerate() {
        let cells: Vec<String> = row.iter().map(Cell::normalized).collect();
        let hits: Vec<bool> = matchers
            .iter()
            .map(|m| cells.iter().any(|cell| m.matches(cell)))
            .collect();
        let count = hits.iter().filter(|h| **h).count();
        let best_count = best
            .as_ref()
            .map(|(_, h)| h.iter().filter(|h| **h).count())
            .unwrap_or(0);
        if count > best_count {
            best = Some((index, hits));
        }
    }

    best.map(|(row, hits)| {
        let (found, missing): (Vec<_>, Vec<_>) = spec
            .labels()
            .iter()
            .zip(hits)
            .partition(|(_, hit)| *hit);
        PartialHeader {
            row,
            found: found.into_iter().map(|(l, _)| l.clone()).collect(),
            missing: missing.into_iter().map(|(l, _)| l.clone()).collect(),
        }
    })
}

/// One actual column bound to a canonical label
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ColumnBinding {
    pub column: usize,
    pub name: String,
    pub label: String,
}

/// Bindings of sheet columns to every required label, in column order
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ColumnMapping {
    bindings: Vec<ColumnBinding>,
}

impl ColumnMapping {
    pub fn bindings(&self) -> &[ColumnBinding] {
        &self.bindings
    }

    /// Column index bound to a label
    pub fn column_for(&self, label: &str) -> Option<usize> {
        self.bindings
            .iter()
            .find(|b| b.label == label)
            .map(|b| b.column)
    }

    /// Bindings rearranged into the header spec's label order
    pub fn in_spec_order(&self, spec: &HeaderSpec) -> Vec<&ColumnBinding> {
        spec.labels()
            .iter()
            .filter_map(|label| self.bindings.iter().find(|b| &b.label == label))
            .collect()
    }
}

/// Labels that could not be bound to any column
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MappingError {
    /// Labels that were bound, in binding order
    pub found: Vec<String>,
    /// Labels left without a column, in label order
    pub missing: Vec<String>,
}

/// Map header cells onto the required labels.
///
/// Columns are scanned left to right; each column binds to the first
/// unconsumed label it contains (case-insensitive substring). The first
/// column to claim a label wins, so two columns containing "Name" resolve
/// to whichever comes first.
pub fn map_columns(header: &[Cell], spec: &HeaderSpec) -> Result<ColumnMapping, MappingError> {
    let labels = spec.labels();
    let mut consumed = vec![false; labels.len()];
    let mut bindings = Vec::new();

    for (column, cell) in header.iter().enumerate() {
        let name = cell.text();
        let name_lower = name.to_lowercase();

        let hit = labels
            .iter()
            .enumerate()
            .find(|(i, label)| !consumed[*i] && name_lower.contains(&label.to_lowercase()));

        if let Some((i, label)) = hit {
            consumed[i] = true;
            log::debug!("Column {} '{}' -> {}", column, name, label);
            bindings.push(ColumnBinding {
                column,
                name,
                label: label.clone(),
            });
        }
    }

    if consumed.iter().all(|c| *c) {
        Ok(ColumnMapping { bindings })
    } else {
        Err(MappingError {
            found: bindings.iter().map(|b| b.label.clone()).collect(),
            missing: labels
                .iter()
                .zip(&consumed)
                .filter(|(_, c)| !**c)
                .map(|(l, _)| l.clone())
                .collect(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn spec() -> HeaderSpec {
        HeaderSpec::new(["Rank", "Name", "Club"])
    }

    fn header(names: &[&str]) -> Vec<Cell> {
        names
            .iter()
            .map(|n| {
                if n.is_empty() {
                    Cell::Empty
                } else {
                    Cell::Text(n.to_string())
                }
            })
            .collect()
    }

    #[test]
    fn test_locate_header_after_title_rows() {
        let sheet = RawSheet::from_strings(&[
            vec!["Kejohanan Catur MSSPK 2025", "", ""],
            vec!["", "", ""],
            vec!["Final Ranking after 7 Rounds", "", ""],
            vec!["Rank", "SNo.", "Name", "Rtg", "Club/City", "Pts."],
            vec!["1", "4", "Aiman", "1650", "SMK Ipoh", "6.5"],
        ]);
        assert_eq!(locate_header(&sheet, &spec()), Some(3));
    }

    #[test]
    fn test_locate_header_is_case_insensitive() {
        let sheet = RawSheet::from_strings(&[vec!["  RANK ", "player name", "CLUB"]]);
        assert_eq!(locate_header(&sheet, &spec()), Some(0));
    }

    #[test]
    fn test_locate_header_first_match_wins() {
        let sheet = RawSheet::from_strings(&[
            vec!["Rank", "Name", "Club"],
            vec!["Rank", "Name", "Club"],
        ]);
        assert_eq!(locate_header(&sheet, &spec()), Some(0));
    }

    #[test]
    fn test_locate_header_requires_all_labels_in_one_row() {
        // "Name" and "Club" appear but never together with "Rank"
        let sheet = RawSheet::from_strings(&[
            vec!["Name", "Club"],
            vec!["Rank", ""],
        ]);
        assert_eq!(locate_header(&sheet, &spec()), None);
    }

    #[test]
    fn test_locate_header_not_found() {
        let sheet = RawSheet::from_strings(&[vec!["Player", "Team", "Score"]]);
        assert_eq!(locate_header(&sheet, &spec()), None);
        assert_eq!(locate_header(&RawSheet::default(), &spec()), None);
    }

    #[test]
    fn test_locate_header_regex_label() {
        let spec = HeaderSpec::new(["^no\\.?$", "name"]);
        let sheet = RawSheet::from_strings(&[
            vec!["Notes", "Name"],
            vec!["No.", "Name"],
        ]);
        assert_eq!(locate_header(&sheet, &spec), Some(1));
    }

    #[test]
    fn test_locate_header_invalid_pattern_matches_literally() {
        let spec = HeaderSpec::new(["Pts(", "Name"]);
        let sheet = RawSheet::from_strings(&[vec!["pts(total)", "name"]]);
        assert_eq!(locate_header(&sheet, &spec), Some(0));
    }

    #[test]
    fn test_closest_header_reports_missing_labels() {
        let sheet = RawSheet::from_strings(&[
            vec!["Junior Open", "", ""],
            vec!["Rank", "Name", "Rating"],
            vec!["1", "Aiman", "1500"],
        ]);
        assert_eq!(locate_header(&sheet, &spec()), None);

        let partial = closest_header(&sheet, &spec()).unwrap();
        assert_eq!(partial.row, 1);
        assert_eq!(partial.found, vec!["Rank", "Name"]);
        assert_eq!(partial.missing, vec!["Club"]);
    }

    #[test]
    fn test_closest_header_none_when_nothing_matches() {
        let sheet = RawSheet::from_strings(&[vec!["Player", "Team"]]);
        assert_eq!(closest_header(&sheet, &spec()), None);
    }

    #[test]
    fn test_map_columns_fuzzy() {
        let mapping = map_columns(
            &header(&["Rank", "SNo.", "Player Name", "Rtg", "Club/City", "Pts."]),
            &spec(),
        )
        .unwrap();

        assert_eq!(mapping.column_for("Rank"), Some(0));
        assert_eq!(mapping.column_for("Name"), Some(2));
        assert_eq!(mapping.column_for("Club"), Some(4));
        assert_eq!(mapping.bindings()[1].name, "Player Name");
    }

    #[test]
    fn test_map_columns_first_column_wins() {
        let mapping = map_columns(
            &header(&["Rank", "Name", "Club Name", "Club"]),
            &spec(),
        )
        .unwrap();
        // "Club Name" contains "Name" but Name is already consumed, so it binds to Club
        assert_eq!(mapping.column_for("Name"), Some(1));
        assert_eq!(mapping.column_for("Club"), Some(2));
    }

    #[test]
    fn test_map_columns_one_binding_per_column() {
        // "Name Club" could satisfy two labels but binds only the first in spec order
        let err = map_columns(&header(&["Rank", "Name Club"]), &spec()).unwrap_err();
        assert_eq!(err.found, vec!["Rank", "Name"]);
        assert_eq!(err.missing, vec!["Club"]);
    }

    #[test]
    fn test_map_columns_trims_names() {
        let mapping = map_columns(&header(&["  Rank  ", "Name", " Club "]), &spec()).unwrap();
        assert_eq!(mapping.bindings()[0].name, "Rank");
        assert_eq!(mapping.bindings()[2].name, "Club");
    }

    #[test]
    fn test_map_columns_missing_club() {
        let err = map_columns(&header(&["Rank", "Name", "Rating", ""]), &spec()).unwrap_err();
        assert_eq!(err.found, vec!["Rank", "Name"]);
        assert_eq!(err.missing, vec!["Club"]);
    }

    #[test]
    fn test_map_columns_idempotent() {
        let row = header(&["Club", "Name", "Rank"]);
        let first = map_columns(&row, &spec()).unwrap();
        let second = map_columns(&row, &spec()).unwrap();
        assert_eq!(first, second);

        let ordered: Vec<&str> = first
            .in_spec_order(&spec())
            .into_iter()
            .map(|b| b.label.as_str())
            .collect();
        assert_eq!(ordered, vec!["Rank", "Name", "Club"]);
    }

    #[test]
    fn test_header_spec_drops_blank_labels() {
        let spec = HeaderSpec::new(["Rank", " ", "Club"]);
        assert_eq!(spec.labels(), ["Rank".to_string(), "Club".to_string()]);
    }
}
