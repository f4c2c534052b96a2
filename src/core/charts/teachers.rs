use crate::core::aggregate::{count_distinct, sort_counts, top_n, value_counts, PivotTable};
use crate::core::filters::FilterSet;
use crate::domain::chart::{Chart, ChartData, ChartId, ChartKind, Matrix, Series};
use crate::domain::model::{ChartSettings, Snapshot, TeacherSessionRow};
use crate::utils::datetime::month_key;
use std::collections::HashSet;

pub const TREND_TITLE: &str = "Sales Volume by Teacher (Sorted by Total Sales)";
pub const HEATMAP_TITLE: &str = "Teacher-Student Age Distribution (Unique Students)";

/// 學生年齡分組，對應區間 (0,20] (20,30] (30,40] (40,50] (50,100]
pub const AGE_GROUPS: [&str; 5] = ["0-20", "21-30", "31-40", "41-50", "50+"];

pub fn age_group(age: u32) -> Option<&'static str> {
    match age {
        1..=20 => Some(AGE_GROUPS[0]),
        21..=30 => Some(AGE_GROUPS[1]),
        31..=40 => Some(AGE_GROUPS[2]),
        41..=50 => Some(AGE_GROUPS[3]),
        51..=100 => Some(AGE_GROUPS[4]),
        _ => None,
    }
}

/// 已知教師的上課紀錄，課程類型條件不適用
pub fn known_sessions<'a>(snapshot: &'a Snapshot, filters: &FilterSet) -> Vec<&'a TeacherSessionRow> {
    let narrowing = filters.without_course_types();
    snapshot
        .teacher_sessions
        .iter()
        .filter(|row| row.has_known_teacher())
        .filter(|row| narrowing.matches(*row))
        .collect()
}

/// 教師過多時只留課堂數最多的幾位
fn preselect<'a>(rows: Vec<&'a TeacherSessionRow>, settings: &ChartSettings) -> Vec<&'a TeacherSessionRow> {
    let counts = value_counts(rows.iter().map(|row| row.teacher_name.as_str()));
    if counts.len() <= settings.teacher_trend_threshold {
        return rows;
    }

    let keep: HashSet<String> = top_n(&counts, settings.teacher_trend_top).into_iter().collect();
    tracing::debug!(
        "Keeping top {} of {} teachers",
        keep.len(),
        counts.len()
    );
    rows.into_iter()
        .filter(|row| keep.contains(&row.teacher_name))
        .collect()
}

pub fn teacher_class_trend(snapshot: &Snapshot, filters: &FilterSet, settings: &ChartSettings) -> Chart {
    let rows = preselect(known_sessions(snapshot, filters), settings);

    let cells: Vec<(String, String, f64)> = rows
        .iter()
        .filter_map(|row| {
            row.course_date
                .map(|ts| (row.teacher_name.clone(), month_key(&ts), 1.0))
        })
        .collect();

    if cells.is_empty() {
        return Chart::no_data(ChartId::TeacherClassTrend, TREND_TITLE);
    }

    let totals = value_counts(cells.iter().map(|(teacher, _, _)| teacher.as_str()));
    let teacher_order = top_n(&totals, totals.len());
    let pivot = PivotTable::from_cells(cells).reindex_rows(&teacher_order);
    tracing::debug!(
        "teacher-class-trend: {} teachers x {} months",
        pivot.row_labels.len(),
        pivot.col_labels.len()
    );

    // 每個月份一條堆疊序列
    let series = pivot
        .col_labels
        .iter()
        .map(|month| {
            let mut series = Series::new(month.clone(), ChartKind::StackedBar);
            for teacher in &pivot.row_labels {
                series.push(teacher.clone(), Some(pivot.get(teacher, month)));
            }
            series
        })
        .collect();

    Chart::new(
        ChartId::TeacherClassTrend,
        TREND_TITLE,
        ChartData::Series { series },
    )
    .with_axes("Teacher", "Sales Volume")
}

pub fn teacher_student_heatmap(snapshot: &Snapshot, filters: &FilterSet, settings: &ChartSettings) -> Chart {
    let rows = preselect(known_sessions(snapshot, filters), settings);
    if rows.is_empty() {
        return Chart::no_data(ChartId::TeacherStudentHeatmap, HEATMAP_TITLE);
    }

    let distinct = count_distinct(rows.iter().filter_map(|row| {
        row.student_id
            .as_deref()
            .map(|student| (row.teacher_name.as_str(), student))
    }));

    let mut teachers: Vec<&str> = rows.iter().map(|row| row.teacher_name.as_str()).collect();
    teachers.sort_unstable();
    teachers.dedup();
    let totals = sort_counts(
        teachers
            .into_iter()
            .map(|t| (t.to_string(), distinct.get(t).copied().unwrap_or(0)))
            .collect(),
    );

    let truncated = totals.len() > settings.heatmap_top_teachers;
    let selected = top_n(&totals, settings.heatmap_top_teachers);

    let per_group = count_distinct(rows.iter().filter_map(|row| {
        let group = age_group(row.student_age?)?;
        let student = row.student_id.as_deref()?;
        Some(((row.teacher_name.as_str(), group), student))
    }));
    let pivot = PivotTable::from_cells(
        per_group
            .into_iter()
            .map(|((teacher, group), count)| (teacher.to_string(), group.to_string(), count as f64)),
    )
    .reindex_rows(&selected)
    .reindex_cols(&AGE_GROUPS);

    let title = if truncated {
        format!("{} (Top {} Teachers)", HEATMAP_TITLE, settings.heatmap_top_teachers)
    } else {
        HEATMAP_TITLE.to_string()
    };

    let matrix = Matrix {
        z: pivot.to_grid(),
        x_labels: pivot.col_labels,
        y_labels: pivot.row_labels,
    };

    Chart::new(ChartId::TeacherStudentHeatmap, title, ChartData::Heatmap { matrix })
        .with_axes("Student Age Group", "Teacher (Unique Students)")
}
