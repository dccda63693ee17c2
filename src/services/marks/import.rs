//! 成绩批量上传：USN, Course Code, [Subject], Marks, [Grade]

use actix_multipart::Multipart;
use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use std::collections::HashMap;
use std::sync::Arc;
use tracing::info;

use super::{MarkService, resolve_grade};
use crate::models::courses::entities::Course;
use crate::models::marks::requests::NewMark;
use crate::models::{ApiResponse, ImportRowError, ImportSummary};
use crate::services::access::current_user;
use crate::storage::Storage;
use crate::utils::spreadsheet::{SheetRow, read_import_sheet};
use crate::utils::validate::validate_score;

const REQUIRED_COLUMNS: &[&str] = &["USN", "Course Code", "Marks"];

#[derive(Debug, Clone, PartialEq)]
struct MarkRow {
    usn: String,
    course_code: String,
    subject: Option<String>,
    score: f64,
    grade: Option<String>,
}

fn parse_row(row: &SheetRow) -> Result<MarkRow, Vec<ImportRowError>> {
    let mut errors = Vec::new();

    let usn = row.get("USN").map(str::to_uppercase);
    if usn.is_none() {
        errors.push(ImportRowError::new(row.row_num, "USN", "USN is required"));
    }
    let course_code = row.get("Course Code").map(str::to_uppercase);
    if course_code.is_none() {
        errors.push(ImportRowError::new(row.row_num, "Course Code", "Course Code is required"));
    }
    let score = match row.number("Marks") {
        Ok(Some(score)) => match validate_score(score) {
            Ok(()) => Some(score),
            Err(msg) => {
                errors.push(ImportRowError::new(row.row_num, "Marks", msg));
                None
            }
        },
        Ok(None) => {
            errors.push(ImportRowError::new(row.row_num, "Marks", "Marks is required"));
            None
        }
        Err(msg) => {
            errors.push(ImportRowError::new(row.row_num, "Marks", msg));
            None
        }
    };

    match (usn, course_code, score) {
        (Some(usn), Some(course_code), Some(score)) if errors.is_empty() => Ok(MarkRow {
            usn,
            course_code,
            subject: row.get("Subject").map(str::to_string),
            score,
            grade: row.get("Grade").map(str::to_string),
        }),
        _ => Err(errors),
    }
}

/// 同一文件内课程只查一次
pub(crate) async fn cached_course(
    storage: &Arc<dyn Storage>,
    cache: &mut HashMap<String, Option<Course>>,
    code: &str,
) -> crate::errors::Result<Option<Course>> {
    if let Some(course) = cache.get(code) {
        return Ok(course.clone());
    }
    let course = storage.get_course_by_code(code).await?;
    cache.insert(code.to_string(), course.clone());
    Ok(course)
}

pub async fn import_marks(
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

    let storage = service.get_storage(request);
    let mut summary = ImportSummary::new(sheet.rows.len());
    let mut courses = HashMap::new();

    for row in &sheet.rows {
        let data = match parse_row(row) {
            Ok(data) => data,
            Err(errors) => {
                errors.into_iter().for_each(|e| summary.fail(e));
                continue;
            }
        };

        let course = match cached_course(&storage, &mut courses, &data.course_code).await {
            Ok(Some(course)) => course,
            Ok(None) => {
                summary.fail(ImportRowError::new(
                    row.row_num,
                    "Course Code",
                    format!("Course {} not found", data.course_code),
                ));
                continue;
            }
            Err(e) => {
                summary.fail(ImportRowError::new(row.row_num, "Course Code", format!("Lookup failed: {e}")));
                continue;
            }
        };
        let student = match storage.get_student_by_usn(&data.usn).await {
            Ok(Some(student)) => student,
            Ok(None) => {
                summary.fail(ImportRowError::new(row.row_num, "USN", format!("Student {} not found", data.usn)));
                continue;
            }
            Err(e) => {
                summary.fail(ImportRowError::new(row.row_num, "USN", format!("Lookup failed: {e}")));
                continue;
            }
        };

        let mark = NewMark {
            student_id: student.id,
            course_id: course.id,
            subject_name: data.subject.unwrap_or_else(|| course.title.clone()),
            score: data.score,
            grade: resolve_grade(data.score, data.grade.as_deref()),
            uploaded_by: teacher.id,
        };
        match storage.create_mark(mark).await {
            Ok(_) => summary.created += 1,
            Err(e) => summary.fail(ImportRowError::new(row.row_num, "", format!("Save failed: {e}"))),
        }
    }

    info!(
        "Marks upload by {}: {} created, {} failed",
        teacher.id, summary.created, summary.failed
    );

    Ok(HttpResponse::Ok().json(ApiResponse::success(summary, "Marks upload completed")))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::utils::spreadsheet::parse_sheet;

    #[test]
    fn test_parse_mark_row() {
        let data = b"USN,Course Code,Subject,Marks,Grade\n1rv21cs001,cs501,,78.5,\n";
        let sheet = parse_sheet(data, "marks.csv", 10).unwrap();
        let row = parse_row(&sheet.rows[0]).unwrap();
        assert_eq!(row.usn, "1RV21CS001");
        assert_eq!(row.course_code, "CS501");
        assert_eq!(row.subject, None);
        assert_eq!(row.score, 78.5);
        assert_eq!(resolve_grade(row.score, row.grade.as_deref()), "B");
    }

    #[test]
    fn test_parse_mark_row_errors() {
        let data = b"USN,Course Code,Marks\n,CS501,120\n";
        let sheet = parse_sheet(data, "marks.csv", 10).unwrap();
        let errors = parse_row(&sheet.rows[0]).unwrap_err();
        let fields: Vec<&str> = errors.iter().map(|e| e.field.as_str()).collect();
        assert_eq!(fields, vec!["USN", "Marks"]);
    }
}
