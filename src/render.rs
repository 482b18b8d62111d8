//! Terminal rendering of standings, club totals and the podium

use crate::model::{CategoryStandings, ClubTotal};
use crate::podium::{wrap_label, Podium, PodiumEntry};
use comfy_table::modifiers::UTF8_ROUND_CORNERS;
use comfy_table::presets::UTF8_FULL;
use comfy_table::{Attribute, Cell, CellAlignment, ContentArrangement, Table};

const BAR_WIDTH: usize = 12;
const LABEL_WIDTH: usize = 10;

fn new_table(headers: &[&str]) -> Table {
    let mut table = Table::new();
    table
        .load_preset(UTF8_FULL)
        .apply_modifier(UTF8_ROUND_CORNERS)
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_header(
            headers
                .iter()
                .map(|h| Cell::new(h).add_attribute(Attribute::Bold))
                .collect::<Vec<_>>(),
        );
    table
}

fn align_right(table: &mut Table, column: usize) {
    if let Some(col) = table.column_mut(column) {
        col.set_cell_alignment(CellAlignment::Right);
    }
}

/// Category standings, highest points first
pub fn category_table(standings: &CategoryStandings) -> Table {
    let mut table = new_table(&["Rank", "Name", "Club", "Points"]);
    for record in standings.by_points() {
        table.add_row(vec![
            record.rank.map(|r| r.to_string()).unwrap_or_default(),
            record.name.clone(),
            record.club.clone(),
            record.points.to_string(),
        ]);
    }
    align_right(&mut table, 0);
    align_right(&mut table, 3);
    table
}

/// Combined club leaderboard
pub fn totals_table(totals: &[ClubTotal]) -> Table {
    let mut table = new_table(&["#", "Club", "Points"]);
    for (i, total) in totals.iter().enumerate() {
        table.add_row(vec![
            (i + 1).to_string(),
            total.club.clone(),
            total.points.to_string(),
        ]);
    }
    align_right(&mut table, 0);
    align_right(&mut table, 2);
    table
}

/// Lines of one podium column, top to bottom: name, points, bar
fn column_lines(entry: &PodiumEntry) -> Vec<String> {
    let mut lines = wrap_label(&entry.club, LABEL_WIDTH);
    lines.push(format!("{} pts", entry.points));

    let bar_rows = ((entry.tier.height() + 5) / 10) as usize;
    let block = "█".repeat(BAR_WIDTH - 2);
    lines.extend(std::iter::repeat(block).take(bar_rows));
    lines
}

fn centered(text: &str) -> String {
    format!("{:^width$}", text, width = BAR_WIDTH)
}

/// Text podium: bars bottom-aligned in visual order with tier labels below
pub fn podium_chart(podium: &Podium) -> String {
    if podium.is_empty() {
        return String::new();
    }

    let columns: Vec<Vec<String>> = podium.entries.iter().map(column_lines).collect();
    let height = columns.iter().map(Vec::len).max().unwrap_or(0);

    let mut out = String::new();
    for row in 0..height {
        let cells: Vec<String> = columns
            .iter()
            .map(|col| {
                let offset = height - col.len();
                if row >= offset {
                    centered(&col[row - offset])
                } else {
                    centered("")
                }
            })
            .collect();
        out.push_str(cells.join(" ").trim_end());
        out.push('\n');
    }

    let labels: Vec<String> = podium.entries.iter().map(|e| centered(e.tier.label())).collect();
    out.push_str(labels.join(" ").trim_end());
    out.push('\n');

    let medals: Vec<String> = podium
        .entries
        .iter()
        .map(|e| centered(e.tier.medal().unwrap_or("")))
        .collect();
    let medals = medals.join(" ");
    if !medals.trim().is_empty() {
        out.push_str(medals.trim_end());
        out.push('\n');
    }
    out
}
