use crate::core::aggregate::{histogram, unique_in_order, value_counts, PivotTable};
use crate::core::filters::FilterSet;
use crate::domain::chart::{Chart, ChartData, ChartId, ChartKind, DemographicView, Series};
use crate::domain::model::{DemographicRow, Snapshot};
use std::collections::HashSet;

pub fn title(view: DemographicView) -> &'static str {
    match view {
        DemographicView::Gender => "Gender Distribution by Selected Region",
        DemographicView::Age => "Age Distribution by Selected Region",
        DemographicView::Course => "Course Type Distribution by Selected Region",
        DemographicView::Region => "Region Distribution (Sorted by Count)",
        DemographicView::AgeCourse => "Age Distribution by Course Type in Selected Region",
    }
}

/// 選取期間內有交易的學生，再依年齡、課程、城市縮小
pub fn filter_students<'a>(snapshot: &'a Snapshot, filters: &FilterSet) -> Vec<&'a DemographicRow> {
    let date_only = FilterSet {
        dates: filters.dates,
        ..FilterSet::default()
    };
    let relevant: HashSet<&str> = date_only
        .apply(&snapshot.transactions)
        .into_iter()
        .filter_map(|row| row.student_id.as_deref())
        .collect();

    // 性別下拉選單不作用於人口統計圖
    let narrowing = filters.without_dates().without_genders();
    snapshot
        .demographics
        .iter()
        .filter(|row| relevant.contains(row.student_id.as_str()))
        .filter(|row| narrowing.matches(*row))
        .collect()
}

pub fn demographics(snapshot: &Snapshot, filters: &FilterSet, age_bins: usize) -> Chart {
    let view = filters.view;
    let rows = filter_students(snapshot, filters);
    tracing::debug!("demographics[{}]: {} student rows", view.as_str(), rows.len());

    if rows.is_empty() {
        return Chart::no_data(ChartId::Demographics, title(view)).with_view(view);
    }

    let chart = match view {
        DemographicView::Gender => gender_chart(&rows),
        DemographicView::Age => age_chart(&rows, age_bins),
        DemographicView::Course => course_chart(&rows),
        DemographicView::Region => region_chart(&rows),
        DemographicView::AgeCourse => age_course_chart(&rows),
    };

    chart.with_view(view)
}

fn counts_series(name: &str, kind: ChartKind, counts: Vec<(String, usize)>) -> Series {
    let mut series = Series::new(name, kind);
    for (label, count) in counts {
        series.text.push(count.to_string());
        series.push(label, Some(count as f64));
    }
    series
}

fn series_chart(view: DemographicView, series: Vec<Series>) -> Chart {
    if series.iter().all(|s| s.labels.is_empty()) {
        return Chart::no_data(ChartId::Demographics, title(view));
    }
    Chart::new(ChartId::Demographics, title(view), ChartData::Series { series })
}

fn gender_chart(rows: &[&DemographicRow]) -> Chart {
    let counts = value_counts(rows.iter().map(|row| row.gender.as_str()));
    let mut series = counts_series("Gender", ChartKind::Pie, counts);

    // 圓餅圖文字顯示百分比
    let total: f64 = series.values.iter().flatten().sum();
    series.text = series
        .values
        .iter()
        .flatten()
        .map(|v| format!("{:.1}%", v / total * 100.0))
        .collect();

    series_chart(DemographicView::Gender, vec![series])
}

fn age_chart(rows: &[&DemographicRow], age_bins: usize) -> Chart {
    let ages: Vec<u32> = rows.iter().filter_map(|row| row.age).collect();
    let bins = histogram(&ages, age_bins);
    let series = counts_series("Age Distribution", ChartKind::Histogram, bins);

    series_chart(DemographicView::Age, vec![series]).with_axes("Age", "Count")
}

fn course_chart(rows: &[&DemographicRow]) -> Chart {
    let counts = value_counts(rows.iter().filter_map(|row| row.course_type_name()));
    let series = counts_series("Course Distribution", ChartKind::Bar, counts);

    series_chart(DemographicView::Course, vec![series]).with_axes("Course Type", "Count")
}

fn region_chart(rows: &[&DemographicRow]) -> Chart {
    let counts = value_counts(rows.iter().map(|row| row.learning_area.as_str()));
    let series = counts_series("Region Distribution", ChartKind::Bar, counts);

    let mut chart = series_chart(DemographicView::Region, vec![series]).with_axes("Region", "Count");
    chart.legend = unique_in_order(rows.iter().filter_map(|row| row.city.as_deref()));
    chart
}

fn age_course_chart(rows: &[&DemographicRow]) -> Chart {
    let cells = rows.iter().filter_map(|row| {
        let age = row.age?;
        let course = row.course_type_name()?;
        Some((age, course.to_string(), 1.0))
    });

    // 年齡以數值排序，不用字串排序
    let mut ages: Vec<u32> = Vec::new();
    let mut pivot_cells = Vec::new();
    for (age, course, count) in cells {
        ages.push(age);
        pivot_cells.push((age.to_string(), course, count));
    }
    ages.sort_unstable();
    ages.dedup();
    let age_labels: Vec<String> = ages.iter().map(u32::to_string).collect();

    let pivot = PivotTable::from_cells(pivot_cells).reindex_rows(&age_labels);

    let series = pivot
        .col_labels
        .iter()
        .map(|course| {
            let mut series = Series::new(course.clone(), ChartKind::StackedArea);
            for age in &pivot.row_labels {
                series.push(age.clone(), Some(pivot.get(age, course)));
            }
            series
        })
        .collect();

    series_chart(DemographicView::AgeCourse, series).with_axes("Age", "Count")
}
