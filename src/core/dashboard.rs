use crate::core::aggregate::unique_in_order;
use crate::core::charts;
use crate::core::filters::FilterSet;
use crate::domain::chart::{Chart, ChartId, DemographicView};
use crate::domain::model::{ChartSettings, RowCounts, Snapshot};
use crate::domain::report::{FilterOptions, Summary};
use std::collections::HashSet;
use std::sync::Arc;

/// 唯讀快照加上圖表設定，所有請求共用
#[derive(Debug, Clone)]
pub struct Dashboard {
    snapshot: Arc<Snapshot>,
    settings: ChartSettings,
}

impl Dashboard {
    pub fn new(snapshot: Snapshot, settings: ChartSettings) -> Self {
        Self {
            snapshot: Arc::new(snapshot),
            settings,
        }
    }

    pub fn snapshot(&self) -> &Snapshot {
        &self.snapshot
    }

    pub fn settings(&self) -> &ChartSettings {
        &self.settings
    }

    pub fn row_counts(&self) -> RowCounts {
        self.snapshot.row_counts()
    }

    pub fn render(&self, id: ChartId, filters: &FilterSet) -> Chart {
        charts::render(id, &self.snapshot, filters, &self.settings)
    }

    pub fn render_all(&self, filters: &FilterSet) -> Vec<Chart> {
        ChartId::ALL
            .into_iter()
            .map(|id| self.render(id, filters))
            .collect()
    }

    /// 每個圖表一份，人口統計圖展開成全部視圖
    pub fn render_every_view(&self, filters: &FilterSet) -> Vec<Chart> {
        let mut rendered = Vec::new();
        for id in ChartId::ALL {
            if id == ChartId::Demographics {
                for view in DemographicView::ALL {
                    rendered.push(self.render(id, &filters.clone().with_view(view)));
                }
            } else {
                rendered.push(self.render(id, filters));
            }
        }
        rendered
    }

    pub fn filter_options(&self) -> FilterOptions {
        let transactions = &self.snapshot.transactions;
        let demographics = &self.snapshot.demographics;

        let dates = transactions.iter().filter_map(|row| row.order_date.map(|ts| ts.date()));
        let date_min = dates.clone().min();
        let date_max = dates.max();

        let ages = demographics.iter().filter_map(|row| row.age);
        let age_min = ages.clone().min();
        let age_max = ages.max();
        let age_marks = match (age_min, age_max) {
            (Some(min), Some(max)) => (min..=max).step_by(5).collect(),
            _ => Vec::new(),
        };

        FilterOptions {
            date_min,
            date_max,
            age_min,
            age_max,
            age_marks,
            course_types: unique_in_order(
                transactions
                    .iter()
                    .filter_map(|row| row.course_type_name.as_deref()),
            ),
            cities: unique_in_order(demographics.iter().filter_map(|row| row.city.as_deref())),
            genders: unique_in_order(
                transactions
                    .iter()
                    .filter_map(|row| row.customer_gender.as_deref()),
            ),
        }
    }

    pub fn summary(&self, filters: &FilterSet) -> Summary {
        let rows = filters.apply(&self.snapshot.transactions);

        let total_revenue: f64 = rows.iter().map(|row| row.amount).sum();
        let student_count = rows
            .iter()
            .filter_map(|row| row.student_id.as_deref())
            .collect::<HashSet<_>>()
            .len();
        let dates = rows.iter().filter_map(|row| row.order_date.map(|ts| ts.date()));

        let teacher_count = charts::teachers::known_sessions(&self.snapshot, filters)
            .into_iter()
            .map(|row| row.teacher_name.as_str())
            .collect::<HashSet<_>>()
            .len();

        Summary {
            transaction_count: rows.len(),
            student_count,
            teacher_count,
            total_revenue,
            average_transaction: (!rows.is_empty()).then(|| total_revenue / rows.len() as f64),
            first_order: dates.clone().min(),
            last_order: dates.max(),
        }
    }
}
