//! Forecast tables using comfy-table.

use comfy_table::modifiers::UTF8_ROUND_CORNERS;
use comfy_table::presets::UTF8_FULL;
use comfy_table::{Attribute, Cell, Color, ContentArrangement, Table};
use stookwijzer_kernel::view::{AdviceBadge, BlockRow, SegmentView};
use stookwijzer_types::AdviceCode;

fn base_table(columns: &[&str]) -> Table {
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
                Cell::new(col).add_attribute(Attribute::Bold)
            }
        })
        .collect();
    table.set_header(header_cells);

    table
}

fn badge_cell(badge: &AdviceBadge) -> Cell {
    let cell = Cell::new(badge.label);
    if super::no_color() {
        return cell;
    }
    let color = match badge.advice {
        AdviceCode::Yellow => Color::Yellow,
        AdviceCode::Orange => Color::Rgb {
            r: 255,
            g: 140,
            b: 0,
        },
        AdviceCode::Red => Color::Red,
        AdviceCode::None => Color::DarkGrey,
    };
    cell.fg(color).add_attribute(Attribute::Bold)
}

/// The upcoming slots, with the one in effect marked.
pub fn segments_table(segments: &[SegmentView], current: Option<usize>) -> Table {
    let mut table = base_table(&["", "Periode", "Advies", "Status"]);

    for (index, segment) in segments.iter().enumerate() {
        let marker = if current == Some(index) { "▶" } else { "" };
        table.add_row(vec![
            Cell::new(marker),
            Cell::new(&segment.range.display),
            badge_cell(&segment.badge),
            Cell::new(segment.finality_label),
        ]);
    }

    table
}

/// The raw forecast blocks as published.
pub fn blocks_table(blocks: &[BlockRow]) -> Table {
    let mut table = base_table(&["Blok", "Advies", "Definitief"]);

    for block in blocks {
        table.add_row(vec![
            Cell::new(&block.period),
            badge_cell(&block.badge),
            Cell::new(block.final_text),
        ]);
    }

    table
}
