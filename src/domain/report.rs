use crate::domain::chart::Chart;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// 儀表板頂部的營運指標
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Summary {
    pub transaction_count: usize,
    pub student_count: usize,
    pub teacher_count: usize,
    pub total_revenue: f64,
    pub average_transaction: Option<f64>,
    pub first_order: Option<NaiveDate>,
    pub last_order: Option<NaiveDate>,
}

/// 篩選元件的選項，依載入的資料產生
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FilterOptions {
    pub date_min: Option<NaiveDate>,
    pub date_max: Option<NaiveDate>,
    pub age_min: Option<u32>,
    pub age_max: Option<u32>,
    /// 年齡滑桿刻度，每 5 歲一格
    pub age_marks: Vec<u32>,
    pub course_types: Vec<String>,
    pub cities: Vec<String>,
    pub genders: Vec<String>,
}

/// 匯出流程的轉換結果
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExportBundle {
    pub charts: Vec<Chart>,
    pub summary: Summary,
}
