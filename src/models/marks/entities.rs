use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use ts_rs::TS;

// 成绩记录
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export, export_to = "marks.ts")]
pub struct Mark {
    pub id: i64,
    pub student_id: i64,
    pub course_id: i64,
    pub subject_name: String,
    pub score: f64,
    pub grade: String,
    pub uploaded_by: Option<i64>,
    pub uploaded_at: DateTime<Utc>,
}

impl Mark {
    /// 按分数推导等级
    pub fn grade_for(score: f64) -> &'static str {
        match score {
            s if s >= 90.0 => "S",
            s if s >= 80.0 => "A",
            s if s >= 70.0 => "B",
            s if s >= 60.0 => "C",
            s if s >= 50.0 => "D",
            s if s >= 40.0 => "E",
            _ => "F",
        }
    }
}

// 带课程 / 学生信息的成绩视图
#[derive(Debug, Clone, Serialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export, export_to = "marks.ts")]
pub struct MarkView {
    #[serde(flatten)]
    #[ts(flatten)]
    pub mark: Mark,
    pub course_code: Option<String>,
    pub course_title: Option<String>,
    pub student_name: Option<String>,
    pub usn: Option<String>,
}

// 考勤记录
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export, export_to = "marks.ts")]
pub struct Attendance {
    pub id: i64,
    pub student_id: i64,
    pub course_id: i64,
    pub subject_name: String,
    pub total_classes: i32,
    pub attended_classes: i32,
    pub percentage: f64,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Attendance {
    /// 出勤率，总课时为 0 时记为 0
    pub fn percentage_of(attended: i32, total: i32) -> f64 {
        if total <= 0 {
            0.0
        } else {
            f64::from(attended) / f64::from(total) * 100.0
        }
    }

    /// 合计出勤率：sum(attended) / sum(total)，保留两位小数
    pub fn overall_percentage(records: &[Attendance]) -> f64 {
        let (attended, total) = records.iter().fold((0i64, 0i64), |(a, t), r| {
            (a + i64::from(r.attended_classes), t + i64::from(r.total_classes))
        });
        if total == 0 {
            0.0
        } else {
            (attended as f64 / total as f64 * 10000.0).round() / 100.0
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_grade_boundaries() {
        assert_eq!(Mark::grade_for(95.0), "S");
        assert_eq!(Mark::grade_for(90.0), "S");
        assert_eq!(Mark::grade_for(89.99), "A");
        assert_eq!(Mark::grade_for(60.0), "C");
        assert_eq!(Mark::grade_for(40.0), "E");
        assert_eq!(Mark::grade_for(12.0), "F");
    }

    #[test]
    fn test_attendance_percentage_zero_total() {
        assert_eq!(Attendance::percentage_of(0, 0), 0.0);
        assert_eq!(Attendance::percentage_of(3, 4), 75.0);
    }

    #[test]
    fn test_overall_percentage_weights_by_classes() {
        let record = |total, attended| Attendance {
            id: 0,
            student_id: 1,
            course_id: 1,
            subject_name: String::new(),
            total_classes: total,
            attended_classes: attended,
            percentage: Attendance::percentage_of(attended, total),
            created_at: Utc::now(),
            updated_at: Utc::now(),
        };
        assert_eq!(Attendance::overall_percentage(&[]), 0.0);
        // 30/40 与 10/20 合计 40/60
        assert_eq!(
            Attendance::overall_percentage(&[record(40, 30), record(20, 10)]),
            66.67
        );
        // i32 上限附近的课时合计不溢出
        let big = [record(2_000_000_000, 2_000_000_000), record(2_000_000_000, 1_000_000_000)];
        assert_eq!(Attendance::overall_percentage(&big), 75.0);
    }
}
