use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

/// 缺值填補用的標籤
pub const UNKNOWN: &str = "Unknown";

/// 課程類型對照表（資料庫中的 Course_Type_id）
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum CourseType {
    Yoga,
    RhythmicMovement,
    Dance,
}

impl CourseType {
    pub const ALL: [CourseType; 3] = [CourseType::Yoga, CourseType::RhythmicMovement, CourseType::Dance];

    pub fn from_id(id: i64) -> Option<Self> {
        match id {
            1 => Some(CourseType::Yoga),
            2 => Some(CourseType::RhythmicMovement),
            3 => Some(CourseType::Dance),
            _ => None,
        }
    }

    pub fn id(self) -> i64 {
        match self {
            CourseType::Yoga => 1,
            CourseType::RhythmicMovement => 2,
            CourseType::Dance => 3,
        }
    }

    /// 與 course_type 表中 Course_Type_Name 相同的名稱
    pub fn name(self) -> &'static str {
        match self {
            CourseType::Yoga => "瑜珈",
            CourseType::RhythmicMovement => "律動",
            CourseType::Dance => "舞蹈",
        }
    }

    pub fn note(self) -> &'static str {
        match self {
            CourseType::Yoga => "Yoga Classes",
            CourseType::RhythmicMovement => "Rhythmic Movement Classes",
            CourseType::Dance => "Dance Classes",
        }
    }
}

/// 一筆交易（transaction_data 與學生、課程資料 join 後）
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TransactionRow {
    pub transaction_id: Option<String>,
    pub student_id: Option<String>,
    pub order_date: Option<NaiveDateTime>,
    pub customer_age: Option<u32>,
    pub customer_gender: Option<String>,
    pub city: Option<String>,
    pub region: Option<String>,
    pub course_type_name: Option<String>,
    pub amount: f64,
}

/// 學生人口統計資料
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DemographicRow {
    pub student_id: String,
    pub age: Option<u32>,
    pub gender: String,
    pub city: Option<String>,
    pub learning_area: String,
    pub course_type_id: Option<i64>,
    pub course_type: Option<CourseType>,
}

impl DemographicRow {
    pub fn course_type_name(&self) -> Option<&'static str> {
        self.course_type.map(CourseType::name)
    }
}

/// 教師上課紀錄，每位學生一列
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TeacherSessionRow {
    pub teacher_id: Option<String>,
    pub teacher_name: String,
    pub student_id: Option<String>,
    pub student_gender: String,
    pub student_age: Option<u32>,
    pub learning_city: Option<String>,
    pub learning_area: String,
    pub course_date: Option<NaiveDateTime>,
}

impl TeacherSessionRow {
    pub fn has_known_teacher(&self) -> bool {
        self.teacher_name != UNKNOWN
    }
}

/// 啟動時載入一次、之後唯讀的資料快照
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Snapshot {
    pub transactions: Vec<TransactionRow>,
    pub demographics: Vec<DemographicRow>,
    pub teacher_sessions: Vec<TeacherSessionRow>,
}

impl Snapshot {
    pub fn new(
        transactions: Vec<TransactionRow>,
        demographics: Vec<DemographicRow>,
        teacher_sessions: Vec<TeacherSessionRow>,
    ) -> Self {
        Self {
            transactions,
            demographics,
            teacher_sessions,
        }
    }

    pub fn row_counts(&self) -> RowCounts {
        RowCounts {
            transactions: self.transactions.len(),
            demographics: self.demographics.len(),
            teacher_sessions: self.teacher_sessions.len(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RowCounts {
    pub transactions: usize,
    pub demographics: usize,
    pub teacher_sessions: usize,
}

/// 圖表計算用的上限與分組參數
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChartSettings {
    /// 教師人數超過此值時只保留課堂數前幾名
    pub teacher_trend_threshold: usize,
    pub teacher_trend_top: usize,
    pub heatmap_top_teachers: usize,
    pub age_histogram_bins: usize,
}

impl Default for ChartSettings {
    fn default() -> Self {
        Self {
            teacher_trend_threshold: 10,
            teacher_trend_top: 5,
            heatmap_top_teachers: 5,
            age_histogram_bins: 20,
        }
    }
}
