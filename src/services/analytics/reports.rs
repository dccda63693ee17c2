//! 统计报表（纯函数）
//!
//! 所有比率在分母为 0 时取 0；空输入得到空列表或全零汇总。

use chrono::Datelike;
use std::collections::{BTreeMap, HashMap, HashSet};

use crate::models::analytics::responses::{
    AtRiskStudent, AttendanceTrend, CoursePerformance, DepartmentStats, OverviewStats, RiskLevel,
    StudentRanking,
};
use crate::models::courses::entities::Course;
use crate::models::marks::entities::{Attendance, Mark};
use crate::models::users::entities::{Department, User};

pub const DEFAULT_RANKING_LIMIT: usize = 50;
pub const DEFAULT_TREND_MONTHS: u32 = 6;

const AT_RISK_ATTENDANCE: f64 = 75.0;
const AT_RISK_SCORE: f64 = 60.0;
const HIGH_RISK_ATTENDANCE: f64 = 60.0;
const HIGH_RISK_SCORE: f64 = 50.0;
const PASS_SCORE: f64 = 60.0;

fn round_to(value: f64, places: i32) -> f64 {
    let factor = 10f64.powi(places);
    (value * factor).round() / factor
}

fn mean(values: impl IntoIterator<Item = f64>) -> Option<f64> {
    let (sum, count) = values
        .into_iter()
        .fold((0.0, 0usize), |(s, c), v| (s + v, c + 1));
    (count > 0).then(|| sum / count as f64)
}

/// 学生排名：总分降序，同分按平均分降序
pub fn rank_students(
    students: &[User],
    marks: &[Mark],
    courses: &[Course],
    semester: Option<i32>,
    course_id: Option<i64>,
    limit: usize,
) -> Vec<StudentRanking> {
    let course_semesters: HashMap<i64, i32> = courses.iter().map(|c| (c.id, c.semester)).collect();

    let mut scores: HashMap<i64, Vec<f64>> = HashMap::new();
    for mark in marks {
        if course_id.is_some_and(|id| mark.course_id != id) {
            continue;
        }
        if let Some(sem) = semester
            && course_semesters.get(&mark.course_id) != Some(&sem)
        {
            continue;
        }
        scores.entry(mark.student_id).or_default().push(mark.score);
    }

    let mut rankings: Vec<StudentRanking> = students
        .iter()
        .filter_map(|student| {
            let profile = student.as_student()?;
            if semester.is_some_and(|sem| profile.semester != sem) {
                return None;
            }
            let student_scores = scores.get(&student.id).filter(|s| !s.is_empty())?;
            let total: f64 = student_scores.iter().sum();
            Some(StudentRanking {
                rank: 0,
                student_id: student.id,
                name: student.name.clone(),
                usn: profile.usn.clone(),
                branch: profile.branch,
                semester: profile.semester,
                total_score: round_to(total, 2),
                average_score: round_to(total / student_scores.len() as f64, 2),
                marks_count: student_scores.len(),
            })
        })
        .collect();

    rankings.sort_by(|a, b| {
        b.total_score
            .total_cmp(&a.total_score)
            .then(b.average_score.total_cmp(&a.average_score))
    });
    rankings.truncate(limit);
    for (i, ranking) in rankings.iter_mut().enumerate() {
        ranking.rank = i + 1;
    }
    rankings
}

/// 风险等级：出勤 < 75 或均分 < 60 视为风险；出勤 < 60 或均分 < 50 为高风险
pub fn classify_risk(avg_attendance: Option<f64>, avg_score: Option<f64>) -> Option<(RiskLevel, Vec<String>)> {
    let mut factors = Vec::new();
    if let Some(att) = avg_attendance
        && att < AT_RISK_ATTENDANCE
    {
        factors.push(format!("Low attendance ({att}%)"));
    }
    if let Some(score) = avg_score
        && score < AT_RISK_SCORE
    {
        factors.push(format!("Low marks (avg {score})"));
    }
    if factors.is_empty() {
        return None;
    }

    let high = avg_attendance.is_some_and(|a| a < HIGH_RISK_ATTENDANCE)
        || avg_score.is_some_and(|s| s < HIGH_RISK_SCORE);
    let level = if high { RiskLevel::High } else { RiskLevel::Medium };
    Some((level, factors))
}

/// 风险学生：高风险在前，同级按均分升序；无任何记录的学生不参与
pub fn find_at_risk(students: &[User], attendance: &[Attendance], marks: &[Mark]) -> Vec<AtRiskStudent> {
    let mut attendance_by_student: HashMap<i64, Vec<f64>> = HashMap::new();
    for record in attendance {
        attendance_by_student
            .entry(record.student_id)
            .or_default()
            .push(record.percentage);
    }
    let mut scores_by_student: HashMap<i64, Vec<f64>> = HashMap::new();
    for mark in marks {
        scores_by_student.entry(mark.student_id).or_default().push(mark.score);
    }

    let mut at_risk: Vec<AtRiskStudent> = students
        .iter()
        .filter_map(|student| {
            let profile = student.as_student()?;
            let avg_attendance = attendance_by_student
                .get(&student.id)
                .and_then(|v| mean(v.iter().copied()))
                .map(|v| round_to(v, 2));
            let avg_score = scores_by_student
                .get(&student.id)
                .and_then(|v| mean(v.iter().copied()))
                .map(|v| round_to(v, 2));

            let (risk_level, risk_factors) = classify_risk(avg_attendance, avg_score)?;
            Some(AtRiskStudent {
                student_id: student.id,
                name: student.name.clone(),
                usn: profile.usn.clone(),
                branch: profile.branch,
                semester: profile.semester,
                avg_attendance,
                avg_score,
                risk_level,
                risk_factors,
            })
        })
        .collect();

    let level_order = |level: RiskLevel| match level {
        RiskLevel::High => 0,
        RiskLevel::Medium => 1,
    };
    at_risk.sort_by(|a, b| {
        level_order(a.risk_level)
            .cmp(&level_order(b.risk_level))
            .then(
                a.avg_score
                    .unwrap_or(f64::MAX)
                    .total_cmp(&b.avg_score.unwrap_or(f64::MAX)),
            )
    });
    at_risk
}

/// 按院系汇总：人数、平均 CGPA（两位小数）、平均出勤率（一位小数）
pub fn department_stats(students: &[User]) -> Vec<DepartmentStats> {
    let mut grouped: HashMap<Department, Vec<(f64, f64)>> = HashMap::new();
    for student in students {
        if let Some(profile) = student.as_student() {
            grouped
                .entry(profile.branch)
                .or_default()
                .push((profile.cgpa, profile.attendance_percentage));
        }
    }

    Department::ALL
        .iter()
        .filter_map(|branch| {
            let rows = grouped.get(branch)?;
            Some(DepartmentStats {
                branch: *branch,
                student_count: rows.len(),
                avg_cgpa: round_to(mean(rows.iter().map(|r| r.0)).unwrap_or(0.0), 2),
                avg_attendance: round_to(mean(rows.iter().map(|r| r.1)).unwrap_or(0.0), 1),
            })
        })
        .collect()
}

/// 课程表现：均分、平均出勤、及格率（≥ 60 分的成绩占比）、选课人数
pub fn course_performance(
    courses: &[Course],
    marks: &[Mark],
    attendance: &[Attendance],
    enrollments: &[(i64, i64)],
) -> Vec<CoursePerformance> {
    let mut scores: HashMap<i64, Vec<f64>> = HashMap::new();
    for mark in marks {
        scores.entry(mark.course_id).or_default().push(mark.score);
    }
    let mut percentages: HashMap<i64, Vec<f64>> = HashMap::new();
    for record in attendance {
        percentages.entry(record.course_id).or_default().push(record.percentage);
    }
    let mut enrolled: HashMap<i64, HashSet<i64>> = HashMap::new();
    for (course_id, student_id) in enrollments {
        enrolled.entry(*course_id).or_default().insert(*student_id);
    }

    courses
        .iter()
        .map(|course| {
            let course_scores = scores.get(&course.id).map(Vec::as_slice).unwrap_or_default();
            let passed = course_scores.iter().filter(|s| **s >= PASS_SCORE).count();
            let pass_rate = if course_scores.is_empty() {
                0.0
            } else {
                round_to(passed as f64 / course_scores.len() as f64 * 100.0, 1)
            };

            CoursePerformance {
                course_id: course.id,
                code: course.code.clone(),
                title: course.title.clone(),
                average_score: round_to(mean(course_scores.iter().copied()).unwrap_or(0.0), 2),
                average_attendance: round_to(
                    percentages
                        .get(&course.id)
                        .and_then(|v| mean(v.iter().copied()))
                        .unwrap_or(0.0),
                    2,
                ),
                pass_rate,
                marks_count: course_scores.len(),
                enrolled_count: enrolled.get(&course.id).map_or(0, HashSet::len),
            }
        })
        .collect()
}

/// 按记录创建月份分组的平均出勤率，按时间升序
pub fn attendance_trends(records: &[Attendance]) -> Vec<AttendanceTrend> {
    let mut grouped: BTreeMap<(i32, u32), Vec<f64>> = BTreeMap::new();
    for record in records {
        let key = (record.created_at.year(), record.created_at.month());
        grouped.entry(key).or_default().push(record.percentage);
    }

    grouped
        .into_iter()
        .map(|((year, month), values)| AttendanceTrend {
            year,
            month,
            average_attendance: round_to(mean(values.iter().copied()).unwrap_or(0.0), 2),
            records: values.len(),
        })
        .collect()
}

/// 系统总览
pub fn overview(
    students: &[User],
    teacher_count: usize,
    parent_count: usize,
    course_count: usize,
    marks: &[Mark],
    attendance: &[Attendance],
) -> OverviewStats {
    OverviewStats {
        total_students: students.len(),
        total_teachers: teacher_count,
        total_parents: parent_count,
        total_courses: course_count,
        total_marks: marks.len(),
        average_score: round_to(mean(marks.iter().map(|m| m.score)).unwrap_or(0.0), 2),
        average_attendance: round_to(mean(attendance.iter().map(|a| a.percentage)).unwrap_or(0.0), 2),
        at_risk_count: find_at_risk(students, attendance, marks).len(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::courses::entities::SubjectType;
    use crate::models::users::entities::UserKind;
    use chrono::{TimeZone, Utc};

    fn student(id: i64, semester: i32, branch: Department) -> User {
        User::student_fixture(id, &format!("1RV21CS{id:03}"), branch, semester)
    }

    fn mark(student_id: i64, course_id: i64, score: f64) -> Mark {
        Mark {
            id: 0,
            student_id,
            course_id,
            subject_name: "Subject".into(),
            score,
            grade: Mark::grade_for(score).into(),
            uploaded_by: None,
            uploaded_at: Utc::now(),
        }
    }

    fn attendance(student_id: i64, course_id: i64, percentage: f64) -> Attendance {
        Attendance {
            id: 0,
            student_id,
            course_id,
            subject_name: "Subject".into(),
            total_classes: 100,
            attended_classes: percentage as i32,
            percentage,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    fn course(id: i64, semester: i32) -> Course {
        Course {
            id,
            code: format!("CS{id}"),
            title: format!("Course {id}"),
            description: None,
            credits: 4,
            department: Department::Cse,
            semester,
            subject_type: SubjectType::Theory,
            teacher_id: None,
            schedule: vec![],
            assignments: vec![],
            exams: vec![],
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    #[test]
    fn test_rankings_empty() {
        assert!(rank_students(&[], &[], &[], None, None, DEFAULT_RANKING_LIMIT).is_empty());
        let students = vec![student(1, 5, Department::Cse)];
        assert!(rank_students(&students, &[], &[], None, None, 10).is_empty());
    }

    #[test]
    fn test_rankings_order_and_filters() {
        let students = vec![
            student(1, 5, Department::Cse),
            student(2, 5, Department::Cse),
            student(3, 3, Department::Ise),
        ];
        let courses = vec![course(10, 5), course(11, 3)];
        let marks = vec![
            mark(1, 10, 80.0),
            mark(1, 10, 70.0),
            mark(2, 10, 90.0),
            mark(3, 11, 99.0),
        ];

        let all = rank_students(&students, &marks, &courses, None, None, 10);
        let order: Vec<i64> = all.iter().map(|r| r.student_id).collect();
        assert_eq!(order, vec![1, 3, 2]);
        assert_eq!(all[0].rank, 1);
        assert_eq!(all[0].average_score, 75.0);

        let sem5 = rank_students(&students, &marks, &courses, Some(5), None, 10);
        assert_eq!(sem5.len(), 2);

        let top1 = rank_students(&students, &marks, &courses, None, Some(10), 1);
        assert_eq!(top1.len(), 1);
        assert_eq!(top1[0].student_id, 1);
    }

    #[test]
    fn test_risk_levels() {
        let (level, factors) = classify_risk(Some(50.0), Some(40.0)).unwrap();
        assert_eq!(level, RiskLevel::High);
        assert_eq!(factors, vec!["Low attendance (50%)", "Low marks (avg 40)"]);

        let (level, factors) = classify_risk(Some(70.0), Some(65.0)).unwrap();
        assert_eq!(level, RiskLevel::Medium);
        assert_eq!(factors.len(), 1);

        assert!(classify_risk(Some(80.0), Some(75.0)).is_none());
        assert!(classify_risk(None, None).is_none());
    }

    #[test]
    fn test_at_risk_sorting_skips_students_without_data() {
        let students = vec![
            student(1, 5, Department::Cse),
            student(2, 5, Department::Cse),
            student(3, 5, Department::Cse),
            student(4, 5, Department::Cse),
        ];
        let attendance = vec![attendance(1, 10, 70.0), attendance(2, 10, 50.0)];
        let marks = vec![mark(1, 10, 55.0), mark(2, 10, 58.0), mark(3, 10, 52.0)];

        let result = find_at_risk(&students, &attendance, &marks);
        let ids: Vec<i64> = result.iter().map(|s| s.student_id).collect();
        // 2 为高风险；1、3 为中风险按均分升序；4 无数据
        assert_eq!(ids, vec![2, 3, 1]);
    }

    #[test]
    fn test_department_stats_rounding() {
        let mut a = student(1, 5, Department::Cse);
        let mut b = student(2, 5, Department::Cse);
        if let UserKind::Student(p) = &mut a.kind {
            p.cgpa = 8.0;
            p.attendance_percentage = 80.0;
        }
        if let UserKind::Student(p) = &mut b.kind {
            p.cgpa = 7.34;
            p.attendance_percentage = 75.5;
        }
        let stats = department_stats(&[a, b]);
        assert_eq!(stats.len(), 1);
        assert_eq!(stats[0].student_count, 2);
        assert_eq!(stats[0].avg_cgpa, 7.67);
        assert_eq!(stats[0].avg_attendance, 77.8);
        assert!(department_stats(&[]).is_empty());
    }

    #[test]
    fn test_course_performance_pass_rate() {
        let courses = vec![course(10, 5), course(11, 5)];
        let marks = vec![mark(1, 10, 59.0), mark(2, 10, 60.0), mark(3, 10, 90.0)];
        let records = vec![attendance(1, 10, 80.0), attendance(2, 10, 90.0)];
        let enrollments = vec![(10, 1), (10, 2), (10, 2), (11, 3)];

        let perf = course_performance(&courses, &marks, &records, &enrollments);
        assert_eq!(perf[0].pass_rate, 66.7);
        assert_eq!(perf[0].average_attendance, 85.0);
        assert_eq!(perf[0].enrolled_count, 2);
        assert_eq!(perf[1].pass_rate, 0.0);
        assert_eq!(perf[1].average_score, 0.0);
        assert_eq!(perf[1].enrolled_count, 1);
    }

    #[test]
    fn test_trends_are_chronological() {
        let mut jan = attendance(1, 10, 80.0);
        jan.created_at = Utc.with_ymd_and_hms(2025, 1, 15, 0, 0, 0).unwrap();
        let mut dec = attendance(1, 10, 60.0);
        dec.created_at = Utc.with_ymd_and_hms(2024, 12, 3, 0, 0, 0).unwrap();
        let mut jan2 = attendance(2, 10, 90.0);
        jan2.created_at = Utc.with_ymd_and_hms(2025, 1, 20, 0, 0, 0).unwrap();

        let trends = attendance_trends(&[jan, dec, jan2]);
        assert_eq!(trends.len(), 2);
        assert_eq!((trends[0].year, trends[0].month), (2024, 12));
        assert_eq!(trends[1].average_attendance, 85.0);
        assert_eq!(trends[1].records, 2);
    }

    #[test]
    fn test_overview_of_empty_system() {
        let stats = overview(&[], 0, 0, 0, &[], &[]);
        assert_eq!(stats.total_students, 0);
        assert_eq!(stats.average_score, 0.0);
        assert_eq!(stats.at_risk_count, 0);
    }
}
