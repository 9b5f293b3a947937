//! Terminal and JSON rendering of match results.

use comfy_table::modifiers::{UTF8_ROUND_CORNERS, UTF8_SOLID_INNER_BORDERS};
use comfy_table::presets::{UTF8_FULL, UTF8_FULL_CONDENSED};
use comfy_table::{
    Attribute, Cell, CellAlignment, Color, ColumnConstraint, ContentArrangement, Table, Width,
};

use listmatch_map::Strategy;
use listmatch_model::{DemoPreset, Match, MatchResult, ScoreBand, ScoreBands};

/// Prints the match table, the unmatched items and a summary line.
pub fn print_result(result: &MatchResult, bands: &ScoreBands) {
    if result.matches.is_empty() {
        println!("No matches.");
    } else {
        println!("{}", result_table(result, bands));
    }
    if let Some(legend) = band_legend(result, bands) {
        println!("{legend}");
    }
    if let Some(table) = unmatched_table(result) {
        println!("{table}");
    }
    println!("{}", summary_line(result));
}

pub fn result_table(result: &MatchResult, bands: &ScoreBands) -> Table {
    let mut table = Table::new();
    table.set_header(vec![
        header_cell("#"),
        header_cell("List A"),
        header_cell("List B"),
        header_cell("Score"),
        header_cell("Type"),
    ]);
    apply_result_table_style(&mut table);
    align_column(&mut table, 0, CellAlignment::Right);
    align_column(&mut table, 3, CellAlignment::Right);
    align_column(&mut table, 4, CellAlignment::Center);
    for (index, m) in result.matches.iter().enumerate() {
        table.add_row(vec![
            dim_cell(index + 1),
            Cell::new(&m.source),
            Cell::new(&m.target),
            score_cell(m, bands),
            kind_cell(m),
        ]);
    }
    table
}

/// Side-by-side unmatched items, or `None` when both sides are fully matched.
pub fn unmatched_table(result: &MatchResult) -> Option<Table> {
    if result.is_complete() {
        return None;
    }
    let mut table = Table::new();
    table.set_header(vec![
        header_cell("Unmatched in list A"),
        header_cell("Unmatched in list B"),
    ]);
    apply_table_style(&mut table);
    let rows = result
        .unmatched_source
        .len()
        .max(result.unmatched_target.len());
    for index in 0..rows {
        table.add_row(vec![
            unmatched_cell(result.unmatched_source.get(index)),
            unmatched_cell(result.unmatched_target.get(index)),
        ]);
    }
    Some(table)
}

pub fn summary_line(result: &MatchResult) -> String {
    let mean = result
        .mean_score()
        .map_or_else(|| "-".to_string(), |mean| format!("{mean:.1}"));
    format!(
        "{} matches ({} locked, {} automatic, mean score {mean}); \
         {} unmatched in list A, {} unmatched in list B",
        result.matches.len(),
        result.manual_count(),
        result.automatic_count(),
        result.unmatched_source.len(),
        result.unmatched_target.len(),
    )
}

/// Automatic matches per score band, or `None` when there are none.
pub fn band_legend(result: &MatchResult, bands: &ScoreBands) -> Option<String> {
    if result.automatic_count() == 0 {
        return None;
    }
    let counts = result.count_by_band(bands);
    let parts: Vec<String> = [ScoreBand::High, ScoreBand::Medium, ScoreBand::Low]
        .into_iter()
        .map(|band| {
            let range = match band {
                ScoreBand::High => format!("{}+", bands.high),
                ScoreBand::Medium => {
                    format!("{}-{}", bands.medium, bands.high.saturating_sub(1))
                }
                ScoreBand::Low => format!("<{}", bands.medium),
            };
            let count = counts.get(&band).copied().unwrap_or(0);
            format!("{count} {} ({range})", band.description())
        })
        .collect();
    Some(format!("Score bands: {}", parts.join(" | ")))
}

/// Pretty JSON with the field names of the browser tool.
pub fn result_json(result: &MatchResult) -> serde_json::Result<String> {
    serde_json::to_string_pretty(result)
}

pub fn strategies_table() -> Table {
    let mut table = Table::new();
    table.set_header(vec![header_cell("Strategy"), header_cell("Description")]);
    apply_table_style(&mut table);
    let default = Strategy::default();
    for strategy in Strategy::ALL {
        let name = if strategy == default {
            Cell::new(format!("{strategy} (default)"))
                .fg(Color::Blue)
                .add_attribute(Attribute::Bold)
        } else {
            Cell::new(strategy.name())
        };
        table.add_row(vec![name, Cell::new(strategy.description())]);
    }
    table
}

pub fn demos_table(demos: &[DemoPreset]) -> Table {
    let mut table = Table::new();
    table.set_header(vec![
        header_cell("#"),
        header_cell("Title"),
        header_cell("Description"),
        header_cell("List A"),
        header_cell("List B"),
        header_cell("Locks"),
    ]);
    apply_table_style(&mut table);
    align_column(&mut table, 0, CellAlignment::Right);
    for column in 3..6 {
        align_column(&mut table, column, CellAlignment::Right);
    }
    for (index, demo) in demos.iter().enumerate() {
        let title = match &demo.icon {
            Some(icon) => format!("{icon} {}", demo.title),
            None => demo.title.clone(),
        };
        table.add_row(vec![
            Cell::new(index),
            Cell::new(title).add_attribute(Attribute::Bold),
            Cell::new(&demo.body),
            Cell::new(demo.list_a.len()),
            Cell::new(demo.list_b.len()),
            count_cell(demo.locks.len()),
        ]);
    }
    table
}

pub fn apply_table_style(table: &mut Table) {
    table
        .load_preset(UTF8_FULL_CONDENSED)
        .apply_modifier(UTF8_ROUND_CORNERS)
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_width(120);
}

fn apply_result_table_style(table: &mut Table) {
    table
        .load_preset(UTF8_FULL)
        .apply_modifier(UTF8_ROUND_CORNERS)
        .apply_modifier(UTF8_SOLID_INNER_BORDERS)
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_width(140);
    if table.column_count() >= 5 {
        table.set_constraints(vec![
            ColumnConstraint::LowerBoundary(Width::Fixed(4)),
            ColumnConstraint::UpperBoundary(Width::Percentage(40)),
            ColumnConstraint::UpperBoundary(Width::Percentage(40)),
            ColumnConstraint::LowerBoundary(Width::Fixed(7)),
            ColumnConstraint::LowerBoundary(Width::Fixed(8)),
        ]);
    }
}

fn align_column(table: &mut Table, index: usize, alignment: CellAlignment) {
    if let Some(column) = table.column_mut(index) {
        column.set_cell_alignment(alignment);
    }
}

fn score_cell(m: &Match, bands: &ScoreBands) -> Cell {
    if m.is_manual {
        return Cell::new(m.score)
            .fg(Color::Cyan)
            .add_attribute(Attribute::Bold);
    }
    Cell::new(m.score).fg(band_color(bands.categorize(m.score)))
}

fn band_color(band: ScoreBand) -> Color {
    match band {
        ScoreBand::High => Color::Green,
        ScoreBand::Medium => Color::Yellow,
        ScoreBand::Low => Color::Red,
    }
}

fn kind_cell(m: &Match) -> Cell {
    if m.is_manual {
        Cell::new("Locked").fg(Color::Cyan)
    } else {
        Cell::new("Auto")
    }
}

fn unmatched_cell(value: Option<&String>) -> Cell {
    match value {
        Some(value) => Cell::new(value).fg(Color::Yellow),
        None => Cell::new(""),
    }
}

fn count_cell(count: usize) -> Cell {
    if count == 0 {
        dim_cell("-")
    } else {
        Cell::new(count)
    }
}

fn header_cell(label: &str) -> Cell {
    Cell::new(label)
        .fg(Color::Cyan)
        .add_attribute(Attribute::Bold)
}

fn dim_cell<T: ToString>(value: T) -> Cell {
    Cell::new(value.to_string()).fg(Color::DarkGrey)
}
