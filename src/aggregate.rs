//! Club totals across all categories

use crate::model::{CategoryStandings, ClubTotal};
use std::collections::HashMap;

/// Sum points per club over every category.
///
/// Clubs are grouped on the exact club string, so "SMK Ipoh" and
/// "SMK Ipoh " stay separate. Records with a blank club (unaffiliated
/// players, footer lines) belong to no club and are left out. Results are
/// ordered by points, highest first; clubs with equal points keep the
/// order in which they were first seen.
pub fn aggregate(categories: &[CategoryStandings]) -> Vec<ClubTotal> {
    let mut totals: Vec<ClubTotal> = Vec::new();
    let mut index: HashMap<&str, usize> = HashMap::new();

    for record in categories.iter().flat_map(|c| c.records.iter()) {
        if record.club.trim().is_empty() {
            continue;
        }
        match index.get(record.club.as_str()) {
            Some(&i) => totals[i].points += record.points,
            None => {
                index.insert(record.club.as_str(), totals.len());
                totals.push(ClubTotal {
                    club: record.club.clone(),
                    points: record.points,
                });
            }
        }
    }

    // sort_by is stable, which keeps first-seen order among ties
    totals.sort_by(|a, b| b.points.cmp(&a.points));
    totals
}

/// Points a single club earned in each category, in category order
pub fn club_breakdown<'a>(categories: &'a [CategoryStandings], club: &str) -> Vec<(&'a str, u32)> {
    categories
        .iter()
        .map(|c| {
            let points = c
                .records
                .iter()
                .filter(|r| r.club == club)
                .map(|r| r.points)
                .sum();
            (c.category.as_str(), points)
        })
        .collect()
}
