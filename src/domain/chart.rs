use crate::utils::error::DashError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

pub const NO_DATA_MESSAGE: &str = "No data available for the selected filters";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ChartId {
    MonthlyRevenue,
    BookingHeatmap,
    Demographics,
    TeacherClassTrend,
    TeacherStudentHeatmap,
}

impl ChartId {
    pub const ALL: [ChartId; 5] = [
        ChartId::MonthlyRevenue,
        ChartId::BookingHeatmap,
        ChartId::Demographics,
        ChartId::TeacherClassTrend,
        ChartId::TeacherStudentHeatmap,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            ChartId::MonthlyRevenue => "monthly-revenue",
            ChartId::BookingHeatmap => "booking-heatmap",
            ChartId::Demographics => "demographics",
            ChartId::TeacherClassTrend => "teacher-class-trend",
            ChartId::TeacherStudentHeatmap => "teacher-student-heatmap",
        }
    }
}

impl fmt::Display for ChartId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ChartId {
    type Err = DashError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        ChartId::ALL
            .into_iter()
            .find(|id| id.as_str() == s)
            .ok_or_else(|| DashError::UnknownChartError { name: s.to_string() })
    }
}

/// 人口統計圖的切換按鈕
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum DemographicView {
    #[default]
    Gender,
    Age,
    Course,
    Region,
    AgeCourse,
}

impl DemographicView {
    pub const ALL: [DemographicView; 5] = [
        DemographicView::Gender,
        DemographicView::Age,
        DemographicView::Course,
        DemographicView::Region,
        DemographicView::AgeCourse,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            DemographicView::Gender => "gender",
            DemographicView::Age => "age",
            DemographicView::Course => "course",
            DemographicView::Region => "region",
            DemographicView::AgeCourse => "age-course",
        }
    }
}

impl FromStr for DemographicView {
    type Err = DashError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        DemographicView::ALL
            .into_iter()
            .find(|view| view.as_str() == s)
            .ok_or_else(|| DashError::invalid_filter("view", format!("unknown view '{}'", s)))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ChartKind {
    Bar,
    StackedBar,
    Line,
    Pie,
    Histogram,
    StackedArea,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Axis {
    #[default]
    Primary,
    Secondary,
}

/// 一條資料序列，`labels` 與 `values` 一一對應
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Series {
    pub name: String,
    pub kind: ChartKind,
    #[serde(default)]
    pub axis: Axis,
    pub labels: Vec<String>,
    pub values: Vec<Option<f64>>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub text: Vec<String>,
}

impl Series {
    pub fn new(name: impl Into<String>, kind: ChartKind) -> Self {
        Self {
            name: name.into(),
            kind,
            axis: Axis::Primary,
            labels: Vec::new(),
            values: Vec::new(),
            text: Vec::new(),
        }
    }

    pub fn on_axis(mut self, axis: Axis) -> Self {
        self.axis = axis;
        self
    }

    pub fn push(&mut self, label: impl Into<String>, value: Option<f64>) {
        self.labels.push(label.into());
        self.values.push(value);
    }

    pub fn value_at(&self, label: &str) -> Option<f64> {
        self.labels
            .iter()
            .position(|l| l == label)
            .and_then(|idx| self.values[idx])
    }
}

/// 熱力圖矩陣：`z[row][col]`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Matrix {
    pub x_labels: Vec<String>,
    pub y_labels: Vec<String>,
    pub z: Vec<Vec<f64>>,
}

impl Matrix {
    pub fn cell(&self, row: &str, col: &str) -> Option<f64> {
        let r = self.y_labels.iter().position(|l| l == row)?;
        let c = self.x_labels.iter().position(|l| l == col)?;
        Some(self.z[r][c])
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ChartData {
    Series { series: Vec<Series> },
    Heatmap { matrix: Matrix },
    Empty,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Chart {
    pub id: ChartId,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub view: Option<DemographicView>,
    pub title: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub x_title: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub y_title: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub y2_title: Option<String>,
    pub data: ChartData,
    /// 不對應資料序列的圖例項目（例如地區圖的城市）
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub legend: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub annotation: Option<String>,
}

impl Chart {
    pub fn new(id: ChartId, title: impl Into<String>, data: ChartData) -> Self {
        Self {
            id,
            view: None,
            title: title.into(),
            x_title: None,
            y_title: None,
            y2_title: None,
            data,
            legend: Vec::new(),
            annotation: None,
        }
    }

    pub fn no_data(id: ChartId, title: impl Into<String>) -> Self {
        let mut chart = Self::new(id, title, ChartData::Empty);
        chart.annotation = Some(NO_DATA_MESSAGE.to_string());
        chart
    }

    pub fn with_axes(mut self, x_title: &str, y_title: &str) -> Self {
        self.x_title = Some(x_title.to_string());
        self.y_title = Some(y_title.to_string());
        self
    }

    pub fn with_view(mut self, view: DemographicView) -> Self {
        self.view = Some(view);
        self
    }

    pub fn is_empty(&self) -> bool {
        matches!(self.data, ChartData::Empty)
    }

    pub fn series(&self) -> &[Series] {
        match &self.data {
            ChartData::Series { series } => series,
            _ => &[],
        }
    }

    pub fn matrix(&self) -> Option<&Matrix> {
        match &self.data {
            ChartData::Heatmap { matrix } => Some(matrix),
            _ => None,
        }
    }

    /// 匯出檔名用的識別字，人口統計圖附上視圖名稱
    pub fn slug(&self) -> String {
        match self.view {
            Some(view) => format!("{}-{}", self.id, view.as_str()),
            None => self.id.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_chart_id_round_trip_names() {
        assert_eq!("booking-heatmap".parse::<ChartId>().unwrap(), ChartId::BookingHeatmap);
        assert!("revenue".parse::<ChartId>().is_err());
        assert_eq!(
            serde_json::to_string(&ChartId::TeacherStudentHeatmap).unwrap(),
            "\"teacher-student-heatmap\""
        );
    }

    #[test]
    fn test_view_names_match_serde() {
        for view in DemographicView::ALL {
            let json = serde_json::to_string(&view).unwrap();
            assert_eq!(json, format!("\"{}\"", view.as_str()));
        }
        assert_eq!(DemographicView::default(), DemographicView::Gender);
    }

    #[test]
    fn test_no_data_chart_serializes_annotation() {
        let chart = Chart::no_data(ChartId::MonthlyRevenue, "Monthly Revenue");
        assert!(chart.is_empty());

        let json = serde_json::to_value(&chart).unwrap();
        assert_eq!(json["data"]["type"], "empty");
        assert_eq!(json["annotation"], NO_DATA_MESSAGE);
    }

    #[test]
    fn test_slug_includes_view() {
        let chart = Chart::no_data(ChartId::Demographics, "x").with_view(DemographicView::AgeCourse);
        assert_eq!(chart.slug(), "demographics-age-course");
    }
}
