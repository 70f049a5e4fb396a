//! Table formatting using comfy-table.

use comfy_table::modifiers::UTF8_ROUND_CORNERS;
use comfy_table::presets::UTF8_FULL;
use comfy_table::{Attribute, Cell, Color, ContentArrangement, Table};

use super::colors::SemanticStyle;

/// Creates a styled table with a bold header row.
pub fn styled_table(columns: &[&str]) -> Table {
    let mut table = Table::new();

    table
        .load_preset(UTF8_FULL)
        .apply_modifier(UTF8_ROUND_CORNERS)
        .set_content_arrangement(ContentArrangement::Dynamic);

    let header_cells: Vec<Cell> = columns
        .iter()
        .map(|col| {
            if super::no_color() {
                Cell::new(col)
            } else {
                Cell::new(col)
                    .add_attribute(Attribute::Bold)
                    .fg(Color::Cyan)
            }
        })
        .collect();
    table.set_header(header_cells);

    table
}

/// Returns a green "allow" or red "deny" cell.
pub fn verdict_cell(allowed: bool) -> Cell {
    let (text, color) = if allowed {
        ("allow", Color::Green)
    } else {
        ("deny", Color::Red)
    };

    if super::no_color() {
        Cell::new(text)
    } else {
        Cell::new(text).fg(color)
    }
}

/// Prints a table followed by a muted row count.
pub fn print_table(table: &Table, count: usize, noun: &str) {
    println!("{table}");

    let suffix = if count == 1 { "" } else { "s" };
    println!("{}", format!("({count} {noun}{suffix})").muted());
}
