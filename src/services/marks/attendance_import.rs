//! 考勤批量上传
//!
//! 两种格式：`Total Classes` + `Attended Classes` 计数列；或每个日期一列的出勤标记。

use actix_multipart::Multipart;
use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use std::collections::{BTreeSet, HashMap};
use tracing::{info, warn};

use super::MarkService;
use super::import::cached_course;
use crate::middlewares::RequireJWT;
use crate::models::marks::requests::AttendanceUpsert;
use crate::models::{ApiResponse, ErrorCode, ImportRowError, ImportSummary};
use crate::services::access::{bad_request, current_user};
use crate::utils::spreadsheet::{Sheet, SheetRow, read_import_sheet};
use crate::utils::validate::validate_attendance_counts;

const REQUIRED_COLUMNS: &[&str] = &["USN", "Course Code"];
const TOTAL_COLUMN: &str = "Total Classes";
const ATTENDED_COLUMN: &str = "Attended Classes";
/// 非日期列
const KNOWN_COLUMNS: &[&str] = &[
    "USN",
    "Course Code",
    "Subject",
    "Name",
    "Student Name",
    TOTAL_COLUMN,
    ATTENDED_COLUMN,
];

/// 单元格出勤标记：空白为 None，其余为是否出勤
pub(crate) fn parse_presence(cell: &str) -> Option<bool> {
    let value = cell.trim();
    if value.is_empty() {
        return None;
    }
    let present = match value.to_lowercase().as_str() {
        "p" | "present" | "yes" | "y" | "true" => true,
        "a" | "absent" | "no" | "n" | "false" => false,
        other => other.parse::<f64>().map(|n| n > 0.0).unwrap_or(false),
    };
    Some(present)
}

/// (总课时, 出勤课时)：非空单元格计入总数
pub(crate) fn count_presence<'a>(cells: impl IntoIterator<Item = &'a str>) -> (i32, i32) {
    cells
        .into_iter()
        .filter_map(parse_presence)
        .fold((0, 0), |(total, attended), present| {
            (total + 1, attended + i32::from(present))
        })
}

#[derive(Debug, Clone, Copy, PartialEq)]
enum Layout {
    Counts,
    Dates,
}

fn detect_layout(sheet: &Sheet) -> Layout {
    if sheet.has_column(TOTAL_COLUMN) && sheet.has_column(ATTENDED_COLUMN) {
        Layout::Counts
    } else {
        Layout::Dates
    }
}

fn date_columns(sheet: &Sheet) -> Vec<String> {
    sheet
        .headers
        .iter()
        .filter(|h| !h.is_empty() && !KNOWN_COLUMNS.iter().any(|k| k.eq_ignore_ascii_case(h)))
        .cloned()
        .collect()
}

/// 表格数值转课时数，超出 i32 的直接拒绝
fn class_count(value: f64) -> Option<i32> {
    (value.is_finite() && value >= 0.0 && value <= f64::from(i32::MAX)).then(|| value as i32)
}

fn read_counts(
    row: &SheetRow,
    layout: Layout,
    dates: &[String],
) -> Result<(i32, i32), ImportRowError> {
    let (total, attended) = match layout {
        Layout::Counts => {
            let read = |column: &str| -> Result<i32, ImportRowError> {
                match row.number(column) {
                    Ok(Some(v)) if v.fract() == 0.0 => class_count(v)
                        .ok_or_else(|| ImportRowError::new(row.row_num, column, "Class count is out of range")),
                    Ok(Some(_)) => Err(ImportRowError::new(row.row_num, column, "Must be a whole number")),
                    Ok(None) => Err(ImportRowError::new(row.row_num, column, format!("{column} is required"))),
                    Err(msg) => Err(ImportRowError::new(row.row_num, column, msg)),
                }
            };
            (read(TOTAL_COLUMN)?, read(ATTENDED_COLUMN)?)
        }
        Layout::Dates => count_presence(dates.iter().map(|d| row.raw(d))),
    };

    validate_attendance_counts(total, attended)
        .map_err(|msg| ImportRowError::new(row.row_num, "Attendance", msg))?;
    if total == 0 {
        return Err(ImportRowError::new(row.row_num, "Attendance", "No attendance data in this row"));
    }
    Ok((total, attended))
}

pub async fn import_attendance(
    service: &MarkService,
    mut payload: Multipart,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    let teacher = match current_user(request) {
        Ok(user) => user,
        Err(resp) => return Ok(resp),
    };
    let sheet = match read_import_sheet(&mut payload, REQUIRED_COLUMNS).await {
        Ok(sheet) => sheet,
        Err(resp) => return Ok(resp),
    };

    let layout = detect_layout(&sheet);
    let dates = date_columns(&sheet);
    if layout == Layout::Dates && dates.is_empty() {
        return Ok(bad_request(
            ErrorCode::ImportFileMissingColumn,
            "Provide Total Classes and Attended Classes, or one column per date",
        ));
    }

    let storage = service.get_storage(request);
    let mut summary = ImportSummary::new(sheet.rows.len());
    let mut courses = HashMap::new();
    let mut touched_students = BTreeSet::new();

    for row in &sheet.rows {
        let Some(usn) = row.get("USN").map(str::to_uppercase) else {
            summary.fail(ImportRowError::new(row.row_num, "USN", "USN is required"));
            continue;
        };
        let Some(code) = row.get("Course Code").map(str::to_uppercase) else {
            summary.fail(ImportRowError::new(row.row_num, "Course Code", "Course Code is required"));
            continue;
        };
        let (total, attended) = match read_counts(row, layout, &dates) {
            Ok(counts) => counts,
            Err(e) => {
                summary.fail(e);
                continue;
            }
        };

        let course = match cached_course(&storage, &mut courses, &code).await {
            Ok(Some(course)) => course,
            Ok(None) => {
                summary.fail(ImportRowError::new(row.row_num, "Course Code", format!("Course {code} not found")));
                continue;
            }
            Err(e) => {
                summary.fail(ImportRowError::new(row.row_num, "Course Code", format!("Lookup failed: {e}")));
                continue;
            }
        };
        let student = match storage.get_student_by_usn(&usn).await {
            Ok(Some(student)) => student,
            Ok(None) => {
                summary.fail(ImportRowError::new(row.row_num, "USN", format!("Student {usn} not found")));
                continue;
            }
            Err(e) => {
                summary.fail(ImportRowError::new(row.row_num, "USN", format!("Lookup failed: {e}")));
                continue;
            }
        };

        let record = AttendanceUpsert {
            student_id: student.id,
            course_id: course.id,
            subject_name: row
                .get("Subject")
                .map(str::to_string)
                .unwrap_or_else(|| course.title.clone()),
            total_classes: total,
            attended_classes: attended,
        };
        match storage.upsert_attendance(record).await {
            Ok((_, created)) => {
                if created {
                    summary.created += 1;
                } else {
                    summary.updated += 1;
                }
                touched_students.insert(student.id);
            }
            Err(e) => summary.fail(ImportRowError::new(row.row_num, "", format!("Save failed: {e}"))),
        }
    }

    for student_id in &touched_students {
        if let Err(e) = storage.recompute_student_attendance(*student_id).await {
            warn!("Failed to recompute attendance for {}: {}", student_id, e);
        }
        RequireJWT::invalidate_user(request, *student_id).await;
    }

    info!(
        "Attendance upload by {}: {} created, {} updated, {} failed, {} students recomputed",
        teacher.id,
        summary.created,
        summary.updated,
        summary.failed,
        touched_students.len()
    );

    Ok(HttpResponse::Ok().json(ApiResponse::success(summary, "Attendance upload completed")))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::utils::spreadsheet::parse_sheet;

    #[test]
    fn test_presence_markers() {
        assert_eq!(count_presence(["P", "A", "P", ""]), (3, 2));
        assert_eq!(count_presence(["yes", "No", "TRUE", "false", "1", "0", "2"]), (7, 4));
        assert_eq!(parse_presence("  "), None);
        assert_eq!(parse_presence("late"), Some(false));
    }

    #[test]
    fn test_date_layout() {
        let data = b"USN,Course Code,Name,2025-01-06,2025-01-07,2025-01-08\n1RV21CS001,CS501,Asha,P,A,\n";
        let sheet = parse_sheet(data, "attendance.csv", 10).unwrap();
        assert_eq!(detect_layout(&sheet), Layout::Dates);
        let dates = date_columns(&sheet);
        assert_eq!(dates, vec!["2025-01-06", "2025-01-07", "2025-01-08"]);
        assert_eq!(read_counts(&sheet.rows[0], Layout::Dates, &dates).unwrap(), (2, 1));
    }

    #[test]
    fn test_repeated_date_counts_each_session() {
        let data = b"USN,Course Code,2025-01-06,2025-01-06,2025-01-07\n1RV21CS001,CS501,P,A,P\n";
        let sheet = parse_sheet(data, "attendance.csv", 10).unwrap();
        let dates = date_columns(&sheet);
        assert_eq!(dates.len(), 3);
        assert_eq!(read_counts(&sheet.rows[0], Layout::Dates, &dates).unwrap(), (3, 2));
    }

    #[test]
    fn test_count_layout_validates() {
        let data = b"USN,Course Code,Total Classes,Attended Classes\nA,CS501,40,32\nB,CS501,10,12\n";
        let sheet = parse_sheet(data, "attendance.csv", 10).unwrap();
        assert_eq!(detect_layout(&sheet), Layout::Counts);
        assert_eq!(read_counts(&sheet.rows[0], Layout::Counts, &[]).unwrap(), (40, 32));
        assert!(read_counts(&sheet.rows[1], Layout::Counts, &[]).is_err());
    }

    #[test]
    fn test_count_layout_rejects_oversized_counts() {
        let data = b"USN,Course Code,Total Classes,Attended Classes\nA,CS501,2000000000,2000000000\nB,CS501,1e12,1\n";
        let sheet = parse_sheet(data, "attendance.csv", 10).unwrap();
        assert!(read_counts(&sheet.rows[0], Layout::Counts, &[]).is_err());
        assert!(read_counts(&sheet.rows[1], Layout::Counts, &[]).is_err());
        assert_eq!(class_count(1e12), None);
        assert_eq!(class_count(-1.0), None);
        assert_eq!(class_count(40.0), Some(40));
    }
}
