//! Chart builders. Each one filters the snapshot with the dimensions it
//! honours, aggregates, and returns a chart-ready [`Chart`].
//!
//! | chart                     | dates | ages | course | city | gender |
//! |---------------------------|-------|------|--------|------|--------|
//! | `monthly-revenue`         | ✓     | ✓    | ✓      | ✓    | ✓      |
//! | `booking-heatmap`         | ✓     | ✓    | ✓      | ✓    | ✓      |
//! | `demographics`            | ✓ (1) | ✓    | ✓      | ✓    |        |
//! | `teacher-class-trend`     | ✓     | ✓    |        | ✓    | ✓      |
//! | `teacher-student-heatmap` | ✓     | ✓    |        | ✓    | ✓      |
//!
//! (1) through the students who have a transaction in the range.

pub mod booking;
pub mod demographics;
pub mod revenue;
pub mod teachers;

use crate::core::filters::FilterSet;
use crate::domain::chart::{Chart, ChartId};
use crate::domain::model::{ChartSettings, Snapshot};

pub fn render(id: ChartId, snapshot: &Snapshot, filters: &FilterSet, settings: &ChartSettings) -> Chart {
    match id {
        ChartId::MonthlyRevenue => revenue::monthly_revenue(snapshot, filters),
        ChartId::BookingHeatmap => booking::booking_heatmap(snapshot, filters),
        ChartId::Demographics => {
            demographics::demographics(snapshot, filters, settings.age_histogram_bins)
        }
        ChartId::TeacherClassTrend => teachers::teacher_class_trend(snapshot, filters, settings),
        ChartId::TeacherStudentHeatmap => {
            teachers::teacher_student_heatmap(snapshot, filters, settings)
        }
    }
}
