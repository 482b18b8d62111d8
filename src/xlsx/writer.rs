use crate::batch::BatchReport;
use crate::error::Result;
use crate::model::{CategoryStandings, ClubTotal};
use crate::podium::Podium;
use rust_xlsxwriter::{Color, Format, FormatAlign, FormatBorder, Workbook, Worksheet};
use std::collections::HashSet;
use std::path::Path;

const TOTALS_SHEET: &str = "Club Totals";
const PODIUM_SHEET: &str = "Podium";
const MAX_SHEET_NAME: usize = 31;

fn header_format() -> Format {
    Format::new()
        .set_bold()
        .set_align(FormatAlign::Center)
        .set_border_bottom(FormatBorder::Thin)
}

/// Write the batch to an Excel file: one sheet per category, then club totals and the podium
pub fn write_report_to_xlsx(report: &BatchReport, path: &Path) -> Result<()> {
    let mut workbook = Workbook::new();
    let mut used_names: HashSet<String> = [TOTALS_SHEET, PODIUM_SHEET]
        .iter()
        .map(|n| n.to_lowercase())
        .collect();

    for standings in report.categories() {
        let name = unique_sheet_name(&standings.category, &mut used_names);
        let sheet = workbook.add_worksheet();
        sheet.set_name(&name)?;
        write_category_sheet(sheet, standings)?;
    }

    let totals_sheet = workbook.add_worksheet();
    totals_sheet.set_name(TOTALS_SHEET)?;
    write_totals_sheet(totals_sheet, &report.totals)?;

    if let Some(podium) = report.podium.podium() {
        let podium_sheet = workbook.add_worksheet();
        podium_sheet.set_name(PODIUM_SHEET)?;
        write_podium_sheet(podium_sheet, podium)?;
    }

    workbook.save(path)?;
    log::info!("Wrote report to {}", path.display());
    Ok(())
}

/// Make a category name usable as a worksheet name.
///
/// Excel forbids `[]:*?/\`, limits names to 31 characters and compares
/// them case-insensitively.
fn unique_sheet_name(category: &str, used: &mut HashSet<String>) -> String {
    let cleaned: String = category
        .chars()
        .map(|c| if "[]:*?/\\".contains(c) { '_' } else { c })
        .collect();
    let cleaned = cleaned.trim().trim_matches('\'').to_string();
    let base: String = if cleaned.is_empty() {
        "Category".to_string()
    } else {
        cleaned.chars().take(MAX_SHEET_NAME).collect()
    };

    let mut candidate = base.clone();
    let mut n = 2;
    while used.contains(&candidate.to_lowercase()) {
        let suffix = format!(" ({})", n);
        let keep = MAX_SHEET_NAME - suffix.chars().count();
        candidate = format!("{}{}", base.chars().take(keep).collect::<String>(), suffix);
        n += 1;
    }
    used.insert(candidate.to_lowercase());
    candidate
}

/// Write one category's standings, highest points first
fn write_category_sheet(sheet: &mut Worksheet, standings: &CategoryStandings) -> Result<()> {
    sheet.set_column_width(0, 8)?;   // Rank
    sheet.set_column_width(1, 30)?;  // Name
    sheet.set_column_width(2, 30)?;  // Club
    sheet.set_column_width(3, 8)?;   // Points

    let header_format = header_format();
    for (col, header) in ["Rank", "Name", "Club", "Points", "Category"].iter().enumerate() {
        sheet.write_string_with_format(0, col as u16, *header, &header_format)?;
    }

    let center_format = Format::new().set_align(FormatAlign::Center);

    for (row_idx, record) in standings.by_points().iter().enumerate() {
        let row = (row_idx + 1) as u32;

        if let Some(rank) = record.rank {
            sheet.write_number_with_format(row, 0, rank as f64, &center_format)?;
        }
        sheet.write_string(row, 1, &record.name)?;
        sheet.write_string(row, 2, &record.club)?;
        sheet.write_number_with_format(row, 3, record.points as f64, &center_format)?;
        sheet.write_string(row, 4, &record.category)?;
    }

    Ok(())
}

fn write_totals_sheet(sheet: &mut Worksheet, totals: &[ClubTotal]) -> Result<()> {
    sheet.set_column_width(0, 6)?;
    sheet.set_column_width(1, 36)?;
    sheet.set_column_width(2, 10)?;

    let header_format = header_format();
    sheet.write_string_with_format(0, 0, "#", &header_format)?;
    sheet.write_string_with_format(0, 1, "Club", &header_format)?;
    sheet.write_string_with_format(0, 2, "Points", &header_format)?;

    let center_format = Format::new().set_align(FormatAlign::Center);
    for (row_idx, total) in totals.iter().enumerate() {
        let row = (row_idx + 1) as u32;
        sheet.write_number_with_format(row, 0, (row_idx + 1) as f64, &center_format)?;
        sheet.write_string(row, 1, &total.club)?;
        sheet.write_number_with_format(row, 2, total.points as f64, &center_format)?;
    }

    if !totals.is_empty() {
        sheet.autofilter(0, 0, totals.len() as u32, 2)?;
    }
    Ok(())
}

/// Podium in visual order; the tier cell is filled with the bar colour
fn write_podium_sheet(sheet: &mut Worksheet, podium: &Podium) -> Result<()> {
    sheet.set_column_width(0, 10)?;  // Position
    sheet.set_column_width(1, 14)?;  // Tier
    sheet.set_column_width(2, 36)?;  // Club
    sheet.set_column_width(3, 10)?;  // Points
    sheet.set_column_width(4, 10)?;  // Height

    let header_format = header_format();
    for (col, header) in ["Position", "Tier", "Club", "Points", "Height"].iter().enumerate() {
        sheet.write_string_with_format(0, col as u16, *header, &header_format)?;
    }

    let center_format = Format::new().set_align(FormatAlign::Center);
    for (row_idx, entry) in podium.entries.iter().enumerate() {
        let row = (row_idx + 1) as u32;
        let tier_format = Format::new()
            .set_align(FormatAlign::Center)
            .set_bold()
            .set_background_color(Color::RGB(hex_color(entry.tier.color())));

        sheet.write_number_with_format(row, 0, entry.position as f64, &center_format)?;
        sheet.write_string_with_format(row, 1, entry.tier.label(), &tier_format)?;
        sheet.write_string(row, 2, &entry.club)?;
        sheet.write_number_with_format(row, 3, entry.points as f64, &center_format)?;
        sheet.write_number_with_format(row, 4, entry.tier.height() as f64, &center_format)?;
    }

    Ok(())
}

/// "#RRGGBB" to 0xRRGGBB; malformed input gives black
fn hex_color(hex: &str) -> u32 {
    u32::from_str_radix(hex.trim_start_matches('#'), 16).unwrap_or(0)
}
