//! Normalizing one category's standings export into player records

use crate::error::{Result, StandingsError};
use crate::model::{CategoryStandings, PlayerRecord};
use crate::sheet::{
    category_name, closest_header, locate_header, map_columns, read_raw_sheet, HeaderSpec, RawSheet,
};
use std::path::Path;

/// Header labels for the three columns a standings sheet must provide
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ColumnLabels {
    pub rank: String,
    pub name: String,
    pub club: String,
}

impl Default for ColumnLabels {
    fn default() -> Self {
        Self {
            rank: "Rank".to_string(),
            name: "Name".to_string(),
            club: "Club".to_string(),
        }
    }
}

impl ColumnLabels {
    /// Every label must have visible text; a blank one would match any cell
    pub fn validate(&self) -> Result<()> {
        for (field, label) in [("rank", &self.rank), ("name", &self.name), ("club", &self.club)] {
            if label.trim().is_empty() {
                return Err(StandingsError::BlankLabel { field });
            }
        }
        Ok(())
    }

    pub fn header_spec(&self) -> HeaderSpec {
        HeaderSpec::new([self.rank.as_str(), self.name.as_str(), self.club.as_str()])
    }
}

/// Normalize a raw sheet that belongs to `category`
pub fn process_sheet(sheet: &RawSheet, category: &str, labels: &ColumnLabels) -> Result<CategoryStandings> {
    labels.validate()?;
    let spec = labels.header_spec();

    let header_row = match locate_header(sheet, &spec) {
        Some(row) => row,
        None => return Err(header_error(sheet, &spec, category)),
    };
    log::debug!("{}: header found on row {}", category, header_row + 1);

    let header = sheet.row(header_row).unwrap_or_default();
    let mapping = map_columns(header, &spec).map_err(|e| StandingsError::MissingColumns {
        category: category.to_string(),
        found: e.found,
        missing: e.missing,
    })?;

    // Every label was mapped, so these lookups cannot miss
    let (Some(rank_col), Some(name_col), Some(club_col)) = (
        mapping.column_for(&labels.rank),
        mapping.column_for(&labels.name),
        mapping.column_for(&labels.club),
    ) else {
        return Err(StandingsError::MissingColumns {
            category: category.to_string(),
            found: mapping.bindings().iter().map(|b| b.label.clone()).collect(),
            missing: spec.labels().to_vec(),
        });
    };

    let mut records = Vec::new();
    for row in (header_row + 1)..sheet.len() {
        let rank_cell = sheet.cell(row, rank_col);
        let name_cell = sheet.cell(row, name_col);
        let club_cell = sheet.cell(row, club_col);

        if rank_cell.is_empty() && name_cell.is_empty() && club_cell.is_empty() {
            continue;
        }

        let rank = rank_cell
            .as_integer()
            .filter(|r| *r > 0)
            .and_then(|r| u32::try_from(r).ok());
        if rank.is_none() {
            log::debug!("{}: row {} has no usable rank ('{}')", category, row + 1, rank_cell);
        }

        records.push(PlayerRecord::new(
            rank,
            &name_cell.text(),
            &club_cell.text(),
            category,
        ));
    }

    log::info!("{}: {} players", category, records.len());
    Ok(CategoryStandings {
        category: category.to_string(),
        header_row,
        records,
    })
}

/// Explain a missing header: name the absent labels when some row came close
fn header_error(sheet: &RawSheet, spec: &HeaderSpec, category: &str) -> StandingsError {
    match closest_header(sheet, spec) {
        Some(partial) => {
            log::debug!(
                "{}: closest header candidate on row {} lacks {:?}",
                category,
                partial.row + 1,
                partial.missing
            );
            StandingsError::MissingColumns {
                category: category.to_string(),
                found: partial.found,
                missing: partial.missing,
            }
        }
        None => StandingsError::HeaderNotFound {
            category: category.to_string(),
            labels: spec.labels().to_vec(),
        },
    }
}

/// Read and normalize one standings file; the category is the file stem
pub fn process_file(path: &Path, labels: &ColumnLabels) -> Result<CategoryStandings> {
    let category = category_name(path);
    let sheet = read_raw_sheet(path)?;
    process_sheet(&sheet, &category, labels)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sheet::Cell;

    fn sheet(rows: &[Vec<&str>]) -> RawSheet {
        RawSheet::from_strings(rows)
    }

    #[test]
    fn test_process_sheet_basic() {
        let raw = sheet(&[
            vec!["Rank", "Name", "Club"],
            vec!["1", "A", "ClubX"],
            vec!["2", "B", "ClubY"],
        ]);
        let standings = process_sheet(&raw, "U12", &ColumnLabels::default()).unwrap();

        assert_eq!(standings.category, "U12");
        assert_eq!(standings.header_row, 0);
        assert_eq!(
            standings.records,
            vec![
                PlayerRecord::new(Some(1), "A", "ClubX", "U12"),
                PlayerRecord::new(Some(2), "B", "ClubY", "U12"),
            ]
        );
        assert_eq!(standings.records[0].points, 30);
        assert_eq!(standings.records[1].points, 23);
    }

    #[test]
    fn test_process_sheet_header_on_row_three() {
        let raw = sheet(&[
            vec!["Chess Championship 2025"],
            vec![""],
            vec!["Category: Boys Under 12"],
            vec!["Rk.", "SNo", "Rank", "Player Name", "FED", "Club/School", "Pts."],
            vec!["", "7", "1", "Aiman", "MAS", "SK Taman", "6"],
            vec!["", "3", "2", "Badrul", "MAS", "SK Bukit", "5.5"],
        ]);
        let standings = process_sheet(&raw, "L12", &ColumnLabels::default()).unwrap();

        assert_eq!(standings.header_row, 3);
        assert_eq!(standings.len(), 2);
        assert_eq!(standings.records[0].name, "Aiman");
        assert_eq!(standings.records[0].club, "SK Taman");
        assert_eq!(standings.records[1].rank, Some(2));
    }

    #[test]
    fn test_process_sheet_missing_club() {
        let raw = sheet(&[vec!["Rank", "Name", "Rating"], vec!["1", "A", "1500"]]);
        let err = process_sheet(&raw, "P15", &ColumnLabels::default()).unwrap_err();

        match err {
            StandingsError::MissingColumns { found, missing, .. } => {
                assert_eq!(found, vec!["Rank", "Name"]);
                assert_eq!(missing, vec!["Club"]);
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_process_sheet_no_header_at_all() {
        let raw = sheet(&[vec!["Player", "Team"], vec!["A", "X"]]);
        let err = process_sheet(&raw, "P15", &ColumnLabels::default()).unwrap_err();
        assert!(matches!(err, StandingsError::HeaderNotFound { .. }));
    }

    #[test]
    fn test_process_sheet_mapping_failure_names_missing_field() {
        // Header row contains "club" only inside the same column as "name"
        let raw = sheet(&[vec!["Rank", "Name (Club)", "Rating"], vec!["1", "A", "1500"]]);
        let err = process_sheet(&raw, "P15", &ColumnLabels::default()).unwrap_err();

        match err {
            StandingsError::MissingColumns { category, found, missing } => {
                assert_eq!(category, "P15");
                assert_eq!(found, vec!["Rank", "Name"]);
                assert_eq!(missing, vec!["Club"]);
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_process_sheet_unranked_and_blank_rows() {
        let raw = RawSheet::new(vec![
            vec![
                Cell::Text("Rank".to_string()),
                Cell::Text("Name".to_string()),
                Cell::Text("Club".to_string()),
            ],
            vec![Cell::Float(1.0), Cell::Text("A".to_string()), Cell::Text("X".to_string())],
            vec![Cell::Empty, Cell::Empty, Cell::Empty],
            vec![Cell::Text("DQ".to_string()), Cell::Text("B".to_string()), Cell::Text("Y".to_string())],
            vec![Cell::Int(17), Cell::Text("C".to_string()), Cell::Text(" Z ".to_string())],
            vec![Cell::Int(0), Cell::Text("D".to_string()), Cell::Text("Z".to_string())],
        ]);
        let standings = process_sheet(&raw, "L18", &ColumnLabels::default()).unwrap();

        assert_eq!(standings.len(), 4);
        assert_eq!(standings.records[0].points, 30);
        assert_eq!(standings.records[1].rank, None);
        assert_eq!(standings.records[1].points, 0);
        assert_eq!(standings.records[2].rank, Some(17));
        assert_eq!(standings.records[2].points, 0);
        assert_eq!(standings.records[2].club, "Z");
        assert_eq!(standings.records[3].rank, None);
    }

    #[test]
    fn test_process_sheet_custom_labels() {
        let labels = ColumnLabels {
            rank: "Kedudukan".to_string(),
            name: "Nama".to_string(),
            club: "Sekolah".to_string(),
        };
        let raw = sheet(&[
            vec!["Kedudukan", "Nama Pemain", "Sekolah"],
            vec!["3", "Siti", "SMK Anderson"],
        ]);
        let standings = process_sheet(&raw, "P12", &labels).unwrap();
        assert_eq!(standings.records[0].points, 18);
        assert_eq!(standings.records[0].club, "SMK Anderson");
    }

    #[test]
    fn test_blank_label_is_rejected() {
        let labels = ColumnLabels {
            club: "  ".to_string(),
            ..ColumnLabels::default()
        };
        let raw = sheet(&[vec!["Rank", "Name", "Club"], vec!["1", "A", "X"]]);
        let err = process_sheet(&raw, "U12", &labels).unwrap_err();

        assert!(matches!(err, StandingsError::BlankLabel { field: "club" }));
        assert_eq!(err.to_string(), "The club column label must not be blank");
        assert!(ColumnLabels::default().validate().is_ok());
    }
}
