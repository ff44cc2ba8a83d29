//! The static monthly revenue series shown on the data page.

use serde::Serialize;

/// Series label.
pub const REVENUE_LABEL: &str = "洗车店月营收（元）";

const MONTHS: [&str; 6] = ["1月", "2月", "3月", "4月", "5月", "6月"];
const VALUES: [u32; 6] = [12_000, 15_000, 18_000, 16_500, 21_000, 24_000];

/// One point of the series.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RevenuePoint {
    pub month: &'static str,
    pub revenue: u32,
    /// Change from the previous month; `None` for the first point.
    pub change: Option<i64>,
}

/// The full series plus derived figures.
#[derive(Debug, Clone, Serialize)]
pub struct RevenueSeries {
    pub label: &'static str,
    pub points: Vec<RevenuePoint>,
}

impl RevenueSeries {
    pub fn total(&self) -> u64 {
        self.points.iter().map(|p| u64::from(p.revenue)).sum()
    }

    pub fn peak(&self) -> Option<&RevenuePoint> {
        self.points.iter().max_by_key(|p| p.revenue)
    }

    pub fn max_revenue(&self) -> u32 {
        self.points.iter().map(|p| p.revenue).max().unwrap_or(0)
    }
}

/// The monthly revenue series for January through June.
pub fn monthly_revenue() -> RevenueSeries {
    let mut previous: Option<u32> = None;
    let points = MONTHS
        .into_iter()
        .zip(VALUES)
        .map(|(month, revenue)| {
            let change = previous.map(|p| i64::from(revenue) - i64::from(p));
            previous = Some(revenue);
            RevenuePoint {
                month,
                revenue,
                change,
            }
        })
        .collect();

    RevenueSeries {
        label: REVENUE_LABEL,
        points,
    }
}
