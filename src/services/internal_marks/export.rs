use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};

use super::InternalMarksService;
use super::scoring::{column_names, components_for};
use crate::models::courses::entities::SubjectType;
use crate::models::internal_marks::entities::InternalMarksView;
use crate::models::{ApiResponse, ErrorCode};
use crate::services::access::{bad_request, internal_error};
use crate::utils::spreadsheet::{Cell, build_xlsx, xlsx_attachment};

fn headers(subject_type: SubjectType, with_results: bool) -> Vec<&'static str> {
    let mut headers = vec!["USN", "Name"];
    headers.extend_from_slice(column_names(subject_type));
    if with_results {
        headers.push("CIE");
    }
    headers
}

fn export_row(subject_type: SubjectType, view: &InternalMarksView) -> Vec<Cell> {
    let mut row: Vec<Cell> = vec![view.usn.clone().into(), view.student_name.clone().into()];
    row.extend(
        components_for(subject_type, &view.record.components)
            .into_iter()
            .map(|(_, _, value)| Cell::from(value)),
    );
    row.push(view.record.calculated_cie.into());
    row
}

pub async fn export_course(
    service: &InternalMarksService,
    course_id: i64,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    let storage = service.get_storage(request);

    let course = match storage.get_course_by_id(course_id).await {
        Ok(Some(course)) => course,
        Ok(None) => {
            return Ok(HttpResponse::NotFound().json(ApiResponse::error_empty(
                ErrorCode::CourseNotFound,
                "Course not found",
            )));
        }
        Err(e) => return Ok(internal_error(ErrorCode::ExportFailed, "Failed to load course", e)),
    };

    let records = match storage.list_internal_marks_by_course(course.id).await {
        Ok(records) => records,
        Err(e) => {
            return Ok(internal_error(ErrorCode::ExportFailed, "Failed to load internal marks", e));
        }
    };

    let rows: Vec<Vec<Cell>> = records
        .iter()
        .map(|view| export_row(course.subject_type, view))
        .collect();

    match build_xlsx("CIE", &headers(course.subject_type, true), &rows) {
        Ok(buffer) => Ok(xlsx_attachment(
            buffer,
            &format!("cie_{}.xlsx", course.code.to_lowercase()),
        )),
        Err(e) => Ok(internal_error(ErrorCode::ExportFailed, "Failed to build export", e)),
    }
}

/// 空白上传模板
pub async fn download_template(subject_type: &str) -> ActixResult<HttpResponse> {
    let subject_type = match subject_type.parse::<SubjectType>() {
        Ok(t) => t,
        Err(msg) => return Ok(bad_request(ErrorCode::ValidationFailed, msg)),
    };

    match build_xlsx("CIE", &headers(subject_type, false), &[]) {
        Ok(buffer) => Ok(xlsx_attachment(
            buffer,
            &format!("cie_template_{}.xlsx", subject_type.as_str().to_lowercase()),
        )),
        Err(e) => Ok(internal_error(ErrorCode::ExportFailed, "Failed to build template", e)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_template_headers_follow_subject_type() {
        assert_eq!(
            headers(SubjectType::Lab, false),
            vec!["USN", "Name", "Conduction & Viva", "Record/Journal", "Lab Test"]
        );
        assert_eq!(headers(SubjectType::Theory, true).last(), Some(&"CIE"));
        assert_eq!(headers(SubjectType::TheoryLab, true).len(), 10);
    }

    #[actix_web::test]
    async fn test_template_rejects_unknown_type() {
        let resp = download_template("practical").await.unwrap();
        assert_eq!(resp.status(), actix_web::http::StatusCode::BAD_REQUEST);
        let resp = download_template("theoryLab").await.unwrap();
        assert_eq!(resp.status(), actix_web::http::StatusCode::OK);
    }
}
