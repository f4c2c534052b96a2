use crate::domain::chart::DemographicView;
use crate::domain::model::{DemographicRow, TeacherSessionRow, TransactionRow};
use crate::utils::datetime::parse_filter_date;
use crate::utils::error::{DashError, Result};
use chrono::NaiveDate;
use serde::{Deserialize, Deserializer, Serialize};

/// 可被篩選的資料列，缺值一律視為不符合啟用中的條件
pub trait FilterTarget {
    fn event_date(&self) -> Option<NaiveDate>;
    fn age(&self) -> Option<u32>;
    fn course_type(&self) -> Option<&str>;
    fn city(&self) -> Option<&str>;
    fn gender(&self) -> Option<&str>;
}

impl FilterTarget for TransactionRow {
    fn event_date(&self) -> Option<NaiveDate> {
        self.order_date.map(|ts| ts.date())
    }

    fn age(&self) -> Option<u32> {
        self.customer_age
    }

    fn course_type(&self) -> Option<&str> {
        self.course_type_name.as_deref()
    }

    fn city(&self) -> Option<&str> {
        self.city.as_deref()
    }

    fn gender(&self) -> Option<&str> {
        self.customer_gender.as_deref()
    }
}

impl FilterTarget for DemographicRow {
    // 人口資料沒有日期，日期條件改由交易資料的學生集合套用
    fn event_date(&self) -> Option<NaiveDate> {
        None
    }

    fn age(&self) -> Option<u32> {
        self.age
    }

    fn course_type(&self) -> Option<&str> {
        self.course_type_name()
    }

    fn city(&self) -> Option<&str> {
        self.city.as_deref()
    }

    fn gender(&self) -> Option<&str> {
        Some(&self.gender)
    }
}

impl FilterTarget for TeacherSessionRow {
    fn event_date(&self) -> Option<NaiveDate> {
        self.course_date.map(|ts| ts.date())
    }

    fn age(&self) -> Option<u32> {
        self.student_age
    }

    // 課程類型不適用於教師圖表
    fn course_type(&self) -> Option<&str> {
        None
    }

    fn city(&self) -> Option<&str> {
        self.learning_city.as_deref()
    }

    fn gender(&self) -> Option<&str> {
        Some(&self.student_gender)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DateRange {
    pub start: NaiveDate,
    pub end: NaiveDate,
}

impl DateRange {
    pub fn new(start: NaiveDate, end: NaiveDate) -> Result<Self> {
        if start > end {
            return Err(DashError::invalid_filter(
                "start_date",
                format!("{} is after end_date {}", start, end),
            ));
        }
        Ok(Self { start, end })
    }

    pub fn contains(&self, date: NaiveDate) -> bool {
        date >= self.start && date <= self.end
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct AgeRange {
    pub min: u32,
    pub max: u32,
}

impl AgeRange {
    pub fn new(min: u32, max: u32) -> Result<Self> {
        if min > max {
            return Err(DashError::invalid_filter(
                "age_min",
                format!("{} exceeds age_max {}", min, max),
            ));
        }
        Ok(Self { min, max })
    }

    pub fn contains(&self, age: u32) -> bool {
        age >= self.min && age <= self.max
    }
}

/// 六個橫跨所有圖表的篩選維度
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FilterSet {
    pub dates: Option<DateRange>,
    pub ages: Option<AgeRange>,
    pub course_types: Vec<String>,
    pub cities: Vec<String>,
    pub genders: Vec<String>,
    pub view: DemographicView,
}

fn member_of(list: &[String], value: Option<&str>) -> bool {
    list.is_empty() || value.is_some_and(|v| list.iter().any(|item| item == v))
}

impl FilterSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_dates(mut self, range: DateRange) -> Self {
        self.dates = Some(range);
        self
    }

    pub fn with_ages(mut self, range: AgeRange) -> Self {
        self.ages = Some(range);
        self
    }

    pub fn with_course_types<I, S>(mut self, values: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.course_types = values.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_cities<I, S>(mut self, values: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.cities = values.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_genders<I, S>(mut self, values: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.genders = values.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_view(mut self, view: DemographicView) -> Self {
        self.view = view;
        self
    }

    pub fn without_dates(&self) -> Self {
        Self {
            dates: None,
            ..self.clone()
        }
    }

    pub fn without_course_types(&self) -> Self {
        Self {
            course_types: Vec::new(),
            ..self.clone()
        }
    }

    pub fn without_genders(&self) -> Self {
        Self {
            genders: Vec::new(),
            ..self.clone()
        }
    }

    pub fn is_unrestricted(&self) -> bool {
        self.dates.is_none()
            && self.ages.is_none()
            && self.course_types.is_empty()
            && self.cities.is_empty()
            && self.genders.is_empty()
    }

    pub fn matches<T: FilterTarget>(&self, row: &T) -> bool {
        if let Some(range) = &self.dates {
            if !row.event_date().is_some_and(|d| range.contains(d)) {
                return false;
            }
        }
        if let Some(range) = &self.ages {
            if !row.age().is_some_and(|a| range.contains(a)) {
                return false;
            }
        }
        member_of(&self.course_types, row.course_type())
            && member_of(&self.cities, row.city())
            && member_of(&self.genders, row.gender())
    }

    pub fn apply<'a, T: FilterTarget>(&self, rows: &'a [T]) -> Vec<&'a T> {
        rows.iter().filter(|row| self.matches(*row)).collect()
    }
}

/// 由 HTTP 查詢字串或設定檔傳入的篩選參數
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FilterParams {
    #[serde(default)]
    pub start_date: Option<String>,
    #[serde(default)]
    pub end_date: Option<String>,
    #[serde(default)]
    pub age_min: Option<u32>,
    #[serde(default)]
    pub age_max: Option<u32>,
    #[serde(default, deserialize_with = "deserialize_list")]
    pub course_types: Vec<String>,
    #[serde(default, deserialize_with = "deserialize_list")]
    pub cities: Vec<String>,
    #[serde(default, deserialize_with = "deserialize_list")]
    pub genders: Vec<String>,
    #[serde(default)]
    pub view: Option<DemographicView>,
}

impl FilterParams {
    pub fn into_filter_set(self) -> Result<FilterSet> {
        // 有值就先解析，格式錯誤一律拒絕
        let start = parse_optional_date("start_date", self.start_date.as_deref())?;
        let end = parse_optional_date("end_date", self.end_date.as_deref())?;
        let dates = match (start, end) {
            (Some(start), Some(end)) => Some(DateRange::new(start, end)?),
            (None, None) => None,
            _ => {
                // 日期區間需要兩端都有值才生效
                tracing::debug!("Ignoring half-open date range");
                None
            }
        };

        let ages = match (self.age_min, self.age_max) {
            (None, None) => None,
            (min, max) => Some(AgeRange::new(min.unwrap_or(0), max.unwrap_or(u32::MAX))?),
        };

        Ok(FilterSet {
            dates,
            ages,
            course_types: self.course_types,
            cities: self.cities,
            genders: self.genders,
            view: self.view.unwrap_or_default(),
        })
    }
}

fn parse_optional_date(field: &str, value: Option<&str>) -> Result<Option<NaiveDate>> {
    match value.map(str::trim) {
        Some(text) if !text.is_empty() => parse_filter_date(field, text).map(Some),
        _ => Ok(None),
    }
}

#[derive(Deserialize)]
#[serde(untagged)]
enum ListInput {
    Joined(String),
    Items(Vec<String>),
}

/// 接受 "a,b" 或 ["a", "b"] 兩種寫法
fn deserialize_list<'de, D>(deserializer: D) -> std::result::Result<Vec<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let items = match ListInput::deserialize(deserializer)? {
        ListInput::Joined(joined) => joined.split(',').map(str::to_string).collect::<Vec<_>>(),
        ListInput::Items(items) => items,
    };

    Ok(items
        .into_iter()
        .map(|item| item.trim().to_string())
        .filter(|item| !item.is_empty())
        .collect())
}
