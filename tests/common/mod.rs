#![allow(dead_code)]

use rusqlite::Connection;
use std::path::{Path, PathBuf};

pub const SCHEMA: &str = r#"
CREATE TABLE student_basic (StudentID INTEGER PRIMARY KEY, Age INTEGER, Gender TEXT);
CREATE TABLE student_learning_area (StudentID INTEGER, City TEXT, "Learning Area" TEXT);
CREATE TABLE student_learning_type (StudentID INTEGER, Learning_Type TEXT);
CREATE TABLE course_type (Course_Type_ID INTEGER PRIMARY KEY, Course_Type_Name TEXT);
CREATE TABLE course_data (Student_id INTEGER, Course_Type_id INTEGER);
CREATE TABLE course_basic (Course_Type_id INTEGER, Course_Name TEXT);
CREATE TABLE course_student (Course_id TEXT, Student_id INTEGER, Course_Type_id INTEGER);
CREATE TABLE teacher_basic (TeacherID INTEGER PRIMARY KEY, FirstName TEXT, LastName TEXT);
CREATE TABLE course_history (Course_id TEXT, Teacher_id INTEGER, Course_Date TEXT);
CREATE TABLE transaction_data (
    Transaction_ID INTEGER PRIMARY KEY,
    Student_id INTEGER,
    Order_Date TEXT,
    Transaction_Value REAL
);
"#;

/// 四位學生、五筆交易、兩位老師加一筆未知老師的上課紀錄
pub const DATA: &str = r#"
INSERT INTO student_basic VALUES (1, 25, 'F'), (2, 34, 'M'), (3, 45, 'F'), (4, 19, NULL);
INSERT INTO student_learning_area VALUES
    (1, '台北市', '大安區'),
    (2, '新北市', '板橋區'),
    (3, '台北市', '信義區');
INSERT INTO student_learning_type VALUES (1, 'group'), (2, 'private'), (3, 'group');
INSERT INTO course_type VALUES (1, '瑜珈'), (2, '律動'), (3, '舞蹈');
INSERT INTO course_data VALUES (1, 1), (2, 2), (3, 3);
INSERT INTO course_basic VALUES (1, 'Yoga Basics'), (2, 'Rhythm Lab'), (3, 'Street Dance');
INSERT INTO course_student VALUES ('C1', 1, 1), ('C2', 2, 2), ('C3', 3, 3);
INSERT INTO teacher_basic VALUES (1, 'Amy', 'Lin'), (2, 'Ben', 'Chen');
INSERT INTO course_history VALUES
    ('C1', 1, '2024-01-10 18:00:00'),
    ('C2', 1, '2024-02-11 18:00:00'),
    ('C3', 2, '2024-03-12'),
    ('C1', 99, '2024-03-01 18:00:00');
INSERT INTO transaction_data VALUES
    (1, 1, '2024-01-08 10:00:00', 1000),
    (2, 1, '2024-02-13 11:00:00', 1500),
    (3, 2, '2024-02-20', 2000),
    (4, 3, '2024-03-15 09:00:00.000', 3000),
    (5, 4, '2024-03-16T10:00:00', 500);
"#;

pub const TOTAL_REVENUE: f64 = 8000.0;

/// 建立測試用資料庫；`adjust` 在填入資料後執行，可刪表或改資料
pub fn create_fixture_with(dir: &Path, adjust: &str) -> PathBuf {
    let path = dir.join("CustomerData.db");
    let conn = Connection::open(&path).unwrap();
    conn.execute_batch(SCHEMA).unwrap();
    conn.execute_batch(DATA).unwrap();
    if !adjust.is_empty() {
        conn.execute_batch(adjust).unwrap();
    }
    path
}

pub fn create_fixture(dir: &Path) -> PathBuf {
    create_fixture_with(dir, "")
}
