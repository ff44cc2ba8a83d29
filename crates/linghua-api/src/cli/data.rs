//! Data page: the monthly revenue chart drawn as a table with bars.

use anyhow::Result;
use comfy_table::{Cell, CellAlignment, Color, ContentArrangement, Table, presets};
use console::style;

use linghua_core::stats::{RevenueSeries, monthly_revenue};

/// Width of the longest bar, in cells.
const BAR_WIDTH: usize = 30;

/// Print the revenue series.
pub fn show_revenue(json: bool) -> Result<()> {
    let series = monthly_revenue();

    if json {
        let result = serde_json::json!({
            "label": series.label,
            "points": series.points,
            "total": series.total(),
        });
        println!("{}", serde_json::to_string_pretty(&result)?);
        return Ok(());
    }

    println!();
    println!("  {}", style(series.label).bold());
    println!();
    println!("{}", revenue_table(&series));
    println!();
    if let Some(peak) = series.peak() {
        println!(
            "  {} {}  {} {}",
            style("合计:").bold(),
            style(series.total()).cyan(),
            style("峰值:").bold(),
            style(format!("{} ({})", peak.month, peak.revenue)).cyan(),
        );
    }
    println!();
    Ok(())
}

fn revenue_table(series: &RevenueSeries) -> Table {
    let max = series.max_revenue().max(1);

    let mut table = Table::new();
    table
        .load_preset(presets::UTF8_FULL_CONDENSED)
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_header(vec![
            Cell::new("月份").fg(Color::Cyan),
            Cell::new("营收（元）").fg(Color::Cyan),
            Cell::new("环比").fg(Color::Cyan),
            Cell::new("").fg(Color::Cyan),
        ]);

    for point in &series.points {
        let change = match point.change {
            None => Cell::new("-"),
            Some(delta) if delta >= 0 => Cell::new(format!("+{delta}")).fg(Color::Green),
            Some(delta) => Cell::new(delta.to_string()).fg(Color::Red),
        };
        table.add_row(vec![
            Cell::new(point.month),
            Cell::new(point.revenue).set_alignment(CellAlignment::Right),
            change.set_alignment(CellAlignment::Right),
            Cell::new(bar(point.revenue, max)).fg(Color::Red),
        ]);
    }

    table
}

/// A bar proportional to `value / max`, at least one cell for non-zero values.
fn bar(value: u32, max: u32) -> String {
    let cells = (value as usize * BAR_WIDTH) / max as usize;
    let cells = if value > 0 { cells.max(1) } else { 0 };
    "█".repeat(cells)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bar_scales_to_max() {
        assert_eq!(bar(24_000, 24_000).chars().count(), BAR_WIDTH);
        assert_eq!(bar(12_000, 24_000).chars().count(), BAR_WIDTH / 2);
        assert_eq!(bar(0, 24_000), "");
        assert_eq!(bar(1, 24_000).chars().count(), 1);
    }

    #[test]
    fn test_table_has_row_per_month() {
        let series = monthly_revenue();
        let rendered = revenue_table(&series).to_string();
        for point in &series.points {
            assert!(rendered.contains(point.month));
        }
        assert!(rendered.contains("-1500"));
    }
}
