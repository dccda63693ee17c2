//! CIE 批量上传
//!
//! 必填列为 USN；未通过 `courseId` 指定课程时还需要 Course Code。
//! 分项列名由课程类型决定，见 [`column_names`]。

use actix_multipart::Multipart;
use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use std::collections::HashMap;
use std::sync::Arc;
use tracing::info;

use super::InternalMarksService;
use super::scoring::{calculate_cie, column_names, from_values, validate_components};
use crate::models::courses::entities::{Course, SubjectType};
use crate::models::internal_marks::entities::CieComponents;
use crate::models::internal_marks::requests::{InternalMarksUploadParams, InternalMarksUpsert};
use crate::models::{ApiResponse, ErrorCode, ImportRowError, ImportSummary};
use crate::services::access::{current_user, internal_error};
use crate::storage::Storage;
use crate::utils::spreadsheet::{SheetRow, read_import_sheet};

/// 按课程类型读取分项列，返回分项或首个出错的 (列名, 信息)
fn read_components(
    row: &SheetRow,
    subject_type: SubjectType,
) -> Result<CieComponents, (String, String)> {
    let mut values = Vec::new();
    for column in column_names(subject_type) {
        let value = row
            .number(column)
            .map_err(|msg| ((*column).to_string(), msg))?;
        values.push(value);
    }

    let components = from_values(subject_type, &values);
    validate_components(subject_type, &components).map_err(|(field, msg)| (field.to_string(), msg))?;
    Ok(components)
}

/// 按课程代码查课程，同一文件内复用结果
async fn resolve_course(
    storage: &Arc<dyn Storage>,
    cache: &mut HashMap<String, Option<Course>>,
    code: &str,
) -> crate::errors::Result<Option<Course>> {
    let key = code.to_uppercase();
    if let Some(course) = cache.get(&key) {
        return Ok(course.clone());
    }
    let course = storage.get_course_by_code(&key).await?;
    cache.insert(key, course.clone());
    Ok(course)
}

pub async fn import_internal_marks(
    service: &InternalMarksService,
    params: InternalMarksUploadParams,
    mut payload: Multipart,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    let teacher = match current_user(request) {
        Ok(user) => user,
        Err(resp) => return Ok(resp),
    };
    let storage = service.get_storage(request);

    // 指定课程时整表使用该课程
    let fixed_course = match params.course_id {
        Some(course_id) => match storage.get_course_by_id(course_id).await {
            Ok(Some(course)) => Some(course),
            Ok(None) => {
                return Ok(HttpResponse::NotFound().json(ApiResponse::error_empty(
                    ErrorCode::CourseNotFound,
                    "Course not found",
                )));
            }
            Err(e) => {
                return Ok(internal_error(ErrorCode::InternalServerError, "Failed to load course", e));
            }
        },
        None => None,
    };

    let required: &[&str] = if fixed_course.is_some() {
        &["USN"]
    } else {
        &["USN", "Course Code"]
    };
    let sheet = match read_import_sheet(&mut payload, required).await {
        Ok(sheet) => sheet,
        Err(resp) => return Ok(resp),
    };

    let mut summary = ImportSummary::new(sheet.rows.len());
    let mut courses: HashMap<String, Option<Course>> = HashMap::new();

    for row in &sheet.rows {
        let course = match &fixed_course {
            Some(course) => course.clone(),
            None => {
                let Some(code) = row.get("Course Code") else {
                    summary.fail(ImportRowError::new(row.row_num, "Course Code", "Course Code is required"));
                    continue;
                };
                match resolve_course(&storage, &mut courses, code).await {
                    Ok(Some(course)) => course,
                    Ok(None) => {
                        summary.fail(ImportRowError::new(
                            row.row_num,
                            "Course Code",
                            format!("Course {code} not found"),
                        ));
                        continue;
                    }
                    Err(e) => {
                        summary.fail(ImportRowError::new(row.row_num, "Course Code", format!("Lookup failed: {e}")));
                        continue;
                    }
                }
            }
        };

        let Some(usn) = row.get("USN").map(str::to_uppercase) else {
            summary.fail(ImportRowError::new(row.row_num, "USN", "USN is required"));
            continue;
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

        let components = match read_components(row, course.subject_type) {
            Ok(components) => components,
            Err((field, msg)) => {
                summary.fail(ImportRowError::new(row.row_num, field, msg));
                continue;
            }
        };
        let calculated_cie = calculate_cie(course.subject_type, &components);

        let record = InternalMarksUpsert {
            student_id: student.id,
            course_id: course.id,
            subject_type: course.subject_type,
            components,
            calculated_cie,
            uploaded_by: teacher.id,
        };
        match storage.upsert_internal_marks(record).await {
            Ok((_, true)) => summary.created += 1,
            Ok((_, false)) => summary.updated += 1,
            Err(e) => summary.fail(ImportRowError::new(row.row_num, "", format!("Save failed: {e}"))),
        }
    }

    info!(
        "Internal marks upload by {}: {} created, {} updated, {} failed",
        teacher.id, summary.created, summary.updated, summary.failed
    );

    Ok(HttpResponse::Ok().json(ApiResponse::success(summary, "Internal marks upload completed")))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::utils::spreadsheet::parse_sheet;

    #[test]
    fn test_read_theory_columns() {
        let data = b"USN,IA-1,IA-2,Assignment,Seminar\n1RV21CS001,20,22,18,24\n";
        let sheet = parse_sheet(data, "cie.csv", 10).unwrap();
        let c = read_components(&sheet.rows[0], SubjectType::Theory).unwrap();
        assert_eq!(c.test1, Some(20.0));
        assert_eq!(c.seminar2, Some(24.0));
        assert_eq!(calculate_cie(SubjectType::Theory, &c), 42.0);
    }

    #[test]
    fn test_read_rejects_out_of_range_and_text() {
        let data = b"USN,Conduction & Viva,Record/Journal,Lab Test\nA,16,5,80\nB,x,5,80\n";
        let sheet = parse_sheet(data, "cie.csv", 10).unwrap();
        let (field, _) = read_components(&sheet.rows[0], SubjectType::Lab).unwrap_err();
        assert_eq!(field, "conductionViva");
        let (field, _) = read_components(&sheet.rows[1], SubjectType::Lab).unwrap_err();
        assert_eq!(field, "Conduction & Viva");
    }

    #[test]
    fn test_missing_columns_count_as_absent() {
        let data = b"USN,Conduction & Viva\nA,10\n";
        let sheet = parse_sheet(data, "cie.csv", 10).unwrap();
        let c = read_components(&sheet.rows[0], SubjectType::Lab).unwrap();
        assert_eq!(c.conduction_viva, Some(10.0));
        assert_eq!(c.record_journal, None);
    }
}
