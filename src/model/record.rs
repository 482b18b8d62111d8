use serde::Serialize;

use super::scoring::points_for_rank;

/// One player's finish in one category, with the club points it earns
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct PlayerRecord {
    pub rank: Option<u32>,
    pub name: String,
    pub club: String,
    pub points: u32,
    pub category: String,
}

impl PlayerRecord {
    /// Build a record, deriving points from the rank
    pub fn new(rank: Option<u32>, name: &str, club: &str, category: &str) -> Self {
        Self {
            rank,
            name: name.to_string(),
            club: club.to_string(),
            points: points_for_rank(rank),
            category: category.to_string(),
        }
    }
}

/// Normalized standings of a single category (one input file)
#[derive(Debug, Clone, Default)]
pub struct CategoryStandings {
    pub category: String,
    /// Sheet row (0-based) holding the column headers
    pub header_row: usize,
    pub records: Vec<PlayerRecord>,
}

impl CategoryStandings {
    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Records ordered by points, highest first; equal points keep sheet order
    pub fn by_points(&self) -> Vec<&PlayerRecord> {
        let mut records: Vec<&PlayerRecord> = self.records.iter().collect();
        records.sort_by(|a, b| b.points.cmp(&a.points));
        records
    }

    pub fn total_points(&self) -> u32 {
        self.records.iter().map(|r| r.points).sum()
    }
}

/// Combined points of one club across every category
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct ClubTotal {
    pub club: String,
    pub points: u32,
}
