//! SQLite data source.
//!
//! Runs the fixed join queries against the read-only customer database and
//! maps the rows into the domain models, filling missing labels the same way
//! for every request.

use crate::core::DataSource;
use crate::domain::model::{CourseType, DemographicRow, TeacherSessionRow, TransactionRow, UNKNOWN};
use crate::utils::datetime::parse_timestamp;
use crate::utils::error::{DashError, Result};
use rusqlite::types::ValueRef;
use rusqlite::{Connection, OpenFlags, Row};
use std::collections::HashSet;
use std::path::{Path, PathBuf};

pub const REQUIRED_TABLES: [&str; 10] = [
    "course_basic",
    "course_data",
    "course_history",
    "course_student",
    "course_type",
    "student_basic",
    "student_learning_area",
    "student_learning_type",
    "teacher_basic",
    "transaction_data",
];

const TRANSACTION_QUERY: &str = r#"
    SELECT
        td.Transaction_ID,
        td.Student_id,
        td.Order_Date,
        sb.Age AS Customer_Age,
        sb.Gender AS Customer_Gender,
        sla.City AS City,
        sla.[Learning Area] AS Region,
        ct.Course_Type_Name,
        td.Transaction_Value AS Amount
    FROM transaction_data td
    LEFT JOIN student_basic sb ON td.Student_id = sb.StudentID
    LEFT JOIN student_learning_area sla ON td.Student_id = sla.StudentID
    LEFT JOIN course_data cd ON td.Student_id = cd.Student_id
    LEFT JOIN course_type ct ON cd.Course_Type_id = ct.Course_Type_ID
"#;

const DEMOGRAPHIC_QUERY: &str = r#"
    SELECT
        sb.StudentID,
        sb.Age,
        sb.Gender,
        sla.City,
        sla.[Learning Area],
        cs.Course_Type_id
    FROM student_basic sb
    LEFT JOIN student_learning_area sla ON sb.StudentID = sla.StudentID
    LEFT JOIN student_learning_type slt ON sb.StudentID = slt.StudentID
    LEFT JOIN course_student cs ON sb.StudentID = cs.Student_id
"#;

const TEACHER_QUERY: &str = r#"
    SELECT
        tb.TeacherID AS Teacher_ID,
        tb.FirstName || ' ' || tb.LastName AS Teacher_Name,
        sb.StudentID AS Student_ID,
        sb.Gender AS Student_Gender,
        sb.Age AS Student_Age,
        sla.City AS Learning_City,
        sla.[Learning Area] AS Learning_Area,
        ch.Course_Date
    FROM course_history ch
    LEFT JOIN teacher_basic tb ON ch.Teacher_id = tb.TeacherID
    LEFT JOIN course_student cs ON ch.Course_id = cs.Course_id
    LEFT JOIN course_basic cb ON cs.Course_Type_id = cb.Course_Type_id
    LEFT JOIN student_learning_area sla ON cs.Student_id = sla.StudentID
    LEFT JOIN student_basic sb ON cs.Student_id = sb.StudentID
    ORDER BY ch.Teacher_id
"#;

#[derive(Debug, Clone)]
pub struct SqliteSource {
    path: PathBuf,
}

impl SqliteSource {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn connect(&self) -> Result<Connection> {
        // 唯讀開啟，避免不存在時建立空檔案
        if !self.path.exists() {
            return Err(DashError::IoError(std::io::Error::new(
                std::io::ErrorKind::NotFound,
                format!("Database file not found: {}", self.path.display()),
            )));
        }

        let conn = Connection::open_with_flags(
            &self.path,
            OpenFlags::SQLITE_OPEN_READ_ONLY | OpenFlags::SQLITE_OPEN_NO_MUTEX,
        )?;
        Ok(conn)
    }

    pub fn existing_tables(&self) -> Result<HashSet<String>> {
        let conn = self.connect()?;
        let mut stmt = conn.prepare("SELECT name FROM sqlite_master WHERE type = 'table'")?;
        let names = stmt
            .query_map([], |row| row.get::<_, String>(0))?
            .collect::<rusqlite::Result<HashSet<_>>>()?;
        Ok(names)
    }
}

/// 任何儲存型別都轉成文字；整數值的浮點數去掉小數點
fn text(row: &Row<'_>, idx: usize) -> rusqlite::Result<Option<String>> {
    Ok(match row.get_ref(idx)? {
        ValueRef::Null | ValueRef::Blob(_) => None,
        ValueRef::Integer(i) => Some(i.to_string()),
        ValueRef::Real(f) if f.fract() == 0.0 => Some(format!("{:.0}", f)),
        ValueRef::Real(f) => Some(f.to_string()),
        ValueRef::Text(t) => Some(String::from_utf8_lossy(t).into_owned()),
    })
}

fn integer(row: &Row<'_>, idx: usize) -> rusqlite::Result<Option<i64>> {
    Ok(match row.get_ref(idx)? {
        ValueRef::Integer(i) => Some(i),
        ValueRef::Real(f) => Some(f as i64),
        ValueRef::Text(t) => {
            let value = String::from_utf8_lossy(t);
            let value = value.trim();
            value
                .parse::<i64>()
                .ok()
                .or_else(|| value.parse::<f64>().ok().map(|f| f as i64))
        }
        ValueRef::Null | ValueRef::Blob(_) => None,
    })
}

fn age(row: &Row<'_>, idx: usize) -> rusqlite::Result<Option<u32>> {
    Ok(integer(row, idx)?.and_then(|v| u32::try_from(v).ok()))
}

/// 缺值金額以 0 計入加總
fn amount(row: &Row<'_>, idx: usize) -> rusqlite::Result<f64> {
    Ok(match row.get_ref(idx)? {
        ValueRef::Integer(i) => i as f64,
        ValueRef::Real(f) => f,
        ValueRef::Text(t) => String::from_utf8_lossy(t).trim().parse().unwrap_or(0.0),
        ValueRef::Null | ValueRef::Blob(_) => 0.0,
    })
}

fn or_unknown(value: Option<String>) -> String {
    value
        .filter(|v| !v.trim().is_empty())
        .unwrap_or_else(|| UNKNOWN.to_string())
}

impl DataSource for SqliteSource {
    fn verify_tables(&self) -> Result<()> {
        let existing = self.existing_tables()?;
        let missing: Vec<String> = REQUIRED_TABLES
            .iter()
            .filter(|table| !existing.contains(**table))
            .map(|table| table.to_string())
            .collect();

        if !missing.is_empty() {
            tracing::error!("❌ Missing tables in {}: {:?}", self.path.display(), missing);
            return Err(DashError::MissingTablesError { tables: missing });
        }

        tracing::debug!("All {} required tables present", REQUIRED_TABLES.len());
        Ok(())
    }

    fn transactions(&self) -> Result<Vec<TransactionRow>> {
        let conn = self.connect()?;
        let mut stmt = conn.prepare(TRANSACTION_QUERY)?;

        let raw = stmt
            .query_map([], |row| {
                Ok((
                    TransactionRow {
                        transaction_id: text(row, 0)?,
                        student_id: text(row, 1)?,
                        order_date: None,
                        customer_age: age(row, 3)?,
                        customer_gender: text(row, 4)?,
                        city: text(row, 5)?,
                        region: text(row, 6)?,
                        course_type_name: text(row, 7)?,
                        amount: amount(row, 8)?,
                    },
                    text(row, 2)?,
                ))
            })?
            .collect::<rusqlite::Result<Vec<_>>>()?;

        raw.into_iter()
            .map(|(mut record, order_date)| {
                record.order_date = parse_timestamp("Order_Date", order_date.as_deref())?;
                Ok(record)
            })
            .collect()
    }

    fn demographics(&self) -> Result<Vec<DemographicRow>> {
        let conn = self.connect()?;
        let mut stmt = conn.prepare(DEMOGRAPHIC_QUERY)?;

        let rows = stmt
            .query_map([], |row| {
                let course_type_id = integer(row, 5)?;
                Ok(DemographicRow {
                    student_id: text(row, 0)?.unwrap_or_default(),
                    age: age(row, 1)?,
                    gender: or_unknown(text(row, 2)?),
                    city: text(row, 3)?,
                    learning_area: or_unknown(text(row, 4)?),
                    course_type_id,
                    course_type: course_type_id.and_then(CourseType::from_id),
                })
            })?
            .collect::<rusqlite::Result<Vec<_>>>()?;

        Ok(rows)
    }

    fn teacher_sessions(&self) -> Result<Vec<TeacherSessionRow>> {
        let conn = self.connect()?;
        let mut stmt = conn.prepare(TEACHER_QUERY)?;

        let raw = stmt
            .query_map([], |row| {
                Ok((
                    TeacherSessionRow {
                        teacher_id: text(row, 0)?,
                        teacher_name: or_unknown(text(row, 1)?),
                        student_id: text(row, 2)?,
                        student_gender: or_unknown(text(row, 3)?),
                        student_age: age(row, 4)?,
                        learning_city: text(row, 5)?,
                        learning_area: or_unknown(text(row, 6)?),
                        course_date: None,
                    },
                    text(row, 7)?,
                ))
            })?
            .collect::<rusqlite::Result<Vec<_>>>()?;

        raw.into_iter()
            .map(|(mut record, course_date)| {
                record.course_date = parse_timestamp("Course_Date", course_date.as_deref())?;
                Ok(record)
            })
            .collect()
    }
}
