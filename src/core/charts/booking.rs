use crate::core::aggregate::PivotTable;
use crate::core::filters::FilterSet;
use crate::domain::chart::{Chart, ChartData, ChartId, Matrix};
use crate::domain::model::Snapshot;
use crate::utils::datetime::{month_key, weekday_name, weekday_of, WEEKDAYS};

pub const TITLE: &str = "Student Order Timing Analysis";

/// 星期 × 月份的交易金額熱力圖
pub fn booking_heatmap(snapshot: &Snapshot, filters: &FilterSet) -> Chart {
    let rows = filters.apply(&snapshot.transactions);

    let cells: Vec<(String, String, f64)> = rows
        .iter()
        .filter_map(|row| {
            row.order_date.map(|ts| {
                (
                    weekday_name(weekday_of(&ts)).to_string(),
                    month_key(&ts),
                    row.amount,
                )
            })
        })
        .collect();

    if cells.is_empty() {
        return Chart::no_data(ChartId::BookingHeatmap, TITLE);
    }

    // 七天固定出現，即使某天沒有訂單
    let days: Vec<&str> = WEEKDAYS.iter().map(|d| weekday_name(*d)).collect();
    let pivot = PivotTable::from_cells(cells).reindex_rows(&days);
    tracing::debug!(
        "booking-heatmap: {} rows -> {} months",
        rows.len(),
        pivot.col_labels.len()
    );

    let matrix = Matrix {
        z: pivot.to_grid(),
        x_labels: pivot.col_labels,
        y_labels: pivot.row_labels,
    };

    Chart::new(ChartId::BookingHeatmap, TITLE, ChartData::Heatmap { matrix })
        .with_axes("Month", "Day of Week")
}
