use crate::domain::chart::{Chart, ChartData};
use crate::utils::error::{DashError, Result};
use serde::Serialize;

/// 圖表的表格形式，供 CSV/TSV 匯出
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Table {
    pub headers: Vec<String>,
    pub rows: Vec<Vec<String>>,
}

fn format_number(value: f64) -> String {
    if value.fract() == 0.0 && value.abs() < 1e15 {
        format!("{:.0}", value)
    } else {
        format!("{:.2}", value)
    }
}

impl Table {
    pub fn from_chart(chart: &Chart) -> Self {
        match &chart.data {
            ChartData::Series { series } => {
                let mut headers = vec![chart.x_title.clone().unwrap_or_else(|| "label".to_string())];
                headers.extend(series.iter().map(|s| s.name.clone()));

                // 所有序列標籤的聯集，保留首次出現順序
                let mut labels: Vec<&String> = Vec::new();
                for s in series {
                    for label in &s.labels {
                        if !labels.contains(&label) {
                            labels.push(label);
                        }
                    }
                }

                let rows = labels
                    .into_iter()
                    .map(|label| {
                        let mut row = vec![label.clone()];
                        row.extend(
                            series
                                .iter()
                                .map(|s| s.value_at(label).map(format_number).unwrap_or_default()),
                        );
                        row
                    })
                    .collect();

                Table { headers, rows }
            }
            ChartData::Heatmap { matrix } => {
                let mut headers = vec![chart.y_title.clone().unwrap_or_default()];
                headers.extend(matrix.x_labels.iter().cloned());

                let rows = matrix
                    .y_labels
                    .iter()
                    .zip(&matrix.z)
                    .map(|(label, values)| {
                        let mut row = vec![label.clone()];
                        row.extend(values.iter().copied().map(format_number));
                        row
                    })
                    .collect();

                Table { headers, rows }
            }
            ChartData::Empty => Table {
                headers: vec!["message".to_string()],
                rows: vec![vec![chart.annotation.clone().unwrap_or_default()]],
            },
        }
    }

    fn write_delimited(&self, delimiter: u8) -> Result<String> {
        let mut writer = csv::WriterBuilder::new()
            .delimiter(delimiter)
            .from_writer(Vec::new());

        writer.write_record(&self.headers)?;
        for row in &self.rows {
            writer.write_record(row)?;
        }

        let bytes = writer.into_inner().map_err(|e| DashError::ProcessingError {
            message: format!("Failed to flush table writer: {}", e),
        })?;
        String::from_utf8(bytes).map_err(|e| DashError::ProcessingError {
            message: format!("Table output is not UTF-8: {}", e),
        })
    }

    pub fn to_csv(&self) -> Result<String> {
        self.write_delimited(b',')
    }

    pub fn to_tsv(&self) -> Result<String> {
        self.write_delimited(b'\t')
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::chart::{Axis, ChartId, ChartKind, Matrix, Series};

    #[test]
    fn test_series_table_aligns_by_label() {
        let mut revenue = Series::new("Monthly Revenue", ChartKind::Bar);
        revenue.push("2024-01", Some(1000.0));
        revenue.push("2024-02", Some(1500.0));
        let mut growth = Series::new("Growth Rate (%)", ChartKind::Line).on_axis(Axis::Secondary);
        growth.push("2024-01", None);
        growth.push("2024-02", Some(50.0));

        let chart = Chart::new(
            ChartId::MonthlyRevenue,
            "Monthly Revenue Analysis",
            ChartData::Series {
                series: vec![revenue, growth],
            },
        )
        .with_axes("Month", "Revenue");

        let table = Table::from_chart(&chart);
        assert_eq!(table.headers, vec!["Month", "Monthly Revenue", "Growth Rate (%)"]);
        assert_eq!(table.rows[0], vec!["2024-01", "1000", ""]);
        assert_eq!(table.rows[1], vec!["2024-02", "1500", "50"]);

        let csv = table.to_csv().unwrap();
        assert_eq!(
            csv,
            "Month,Monthly Revenue,Growth Rate (%)\n2024-01,1000,\n2024-02,1500,50\n"
        );
    }

    #[test]
    fn test_heatmap_table_and_tsv() {
        let chart = Chart::new(
            ChartId::BookingHeatmap,
            "Student Order Timing Analysis",
            ChartData::Heatmap {
                matrix: Matrix {
                    x_labels: vec!["2024-01".to_string()],
                    y_labels: vec!["Monday".to_string(), "Tuesday".to_string()],
                    z: vec![vec![12.5], vec![0.0]],
                },
            },
        )
        .with_axes("Month", "Day of Week");

        let tsv = Table::from_chart(&chart).to_tsv().unwrap();
        assert_eq!(tsv, "Day of Week\t2024-01\nMonday\t12.50\nTuesday\t0\n");
    }

    #[test]
    fn test_empty_chart_table_carries_annotation() {
        let chart = Chart::no_data(ChartId::Demographics, "Gender Distribution by Selected Region");
        let table = Table::from_chart(&chart);
        assert_eq!(table.rows, vec![vec![crate::domain::chart::NO_DATA_MESSAGE.to_string()]]);
    }
}
