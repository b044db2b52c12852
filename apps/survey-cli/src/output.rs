//! Terminal tables for group means and correlations

use comfy_table::{presets::UTF8_FULL, Cell, Table};
use survey_core::{GroupMeans, NumericColumn, PointBiserialResults};

pub fn group_means_table(groups: &GroupMeans, precision: usize) -> Table {
    let mut table = new_table();

    let mut header = vec![Cell::new(groups.group.name()), Cell::new("Count")];
    header.extend(NumericColumn::ALL.iter().map(|c| Cell::new(c.label())));
    table.set_header(header);

    for group in &groups.groups {
        let mut row = vec![Cell::new(&group.label), Cell::new(group.count)];
        row.extend(NumericColumn::ALL.iter().map(|c| {
            Cell::new(
                group
                    .means
                    .get(c)
                    .map(|m| format!("{:.*}", precision, m))
                    .unwrap_or_else(|| "-".to_string()),
            )
        }));
        table.add_row(row);
    }

    table
}

pub fn point_biserial_table(results: &PointBiserialResults, precision: usize) -> Table {
    let mut table = new_table();
    table.set_header(vec!["Column", "r", "p-value", "n"]);

    for (column, correlation) in results {
        table.add_row(vec![
            Cell::new(column.label()),
            Cell::new(format!("{:.*}", precision, correlation.r)),
            Cell::new(format_p_value(correlation.p_value, precision)),
            Cell::new(correlation.n),
        ]);
    }

    table
}

/// Tiny p-values would print as zero at the report precision
fn format_p_value(p: f64, precision: usize) -> String {
    let floor = 10f64.powi(-(precision as i32));
    if p > 0.0 && p < floor {
        format!("< {:.*}", precision, floor)
    } else {
        format!("{:.*}", precision, p)
    }
}

fn new_table() -> Table {
    let mut table = Table::new();
    table.load_preset(UTF8_FULL);
    table
}
