use crate::core::aggregate::{group_sum, pct_change};
use crate::core::filters::FilterSet;
use crate::domain::chart::{Axis, Chart, ChartData, ChartId, ChartKind, Series};
use crate::domain::model::Snapshot;
use crate::utils::datetime::month_key;

pub const TITLE: &str = "Monthly Revenue Analysis";

/// 每月營收長條圖 + 月成長率折線
pub fn monthly_revenue(snapshot: &Snapshot, filters: &FilterSet) -> Chart {
    let rows = filters.apply(&snapshot.transactions);

    let monthly = group_sum(
        rows.iter()
            .filter_map(|row| row.order_date.map(|ts| (month_key(&ts), row.amount))),
    );
    tracing::debug!(
        "monthly-revenue: {} rows -> {} months",
        rows.len(),
        monthly.len()
    );

    if monthly.is_empty() {
        return Chart::no_data(ChartId::MonthlyRevenue, TITLE);
    }

    let (months, amounts): (Vec<String>, Vec<f64>) = monthly.into_iter().unzip();
    let growth = pct_change(&amounts);

    let mut revenue = Series::new("Monthly Revenue", ChartKind::Bar);
    for (month, amount) in months.iter().zip(&amounts) {
        revenue.push(month.clone(), Some(*amount));
    }

    let mut growth_line = Series::new("Growth Rate (%)", ChartKind::Line).on_axis(Axis::Secondary);
    for (month, change) in months.iter().zip(&growth) {
        growth_line.push(month.clone(), *change);
        growth_line
            .text
            .push(change.map(|c| format!("{:.1}%", c)).unwrap_or_default());
    }

    let mut chart = Chart::new(
        ChartId::MonthlyRevenue,
        TITLE,
        ChartData::Series {
            series: vec![revenue, growth_line],
        },
    )
    .with_axes("Month", "Revenue");
    chart.y2_title = Some("Growth Rate (%)".to_string());
    chart
}
