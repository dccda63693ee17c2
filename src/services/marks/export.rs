use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};

use super::MarkService;
use crate::models::ErrorCode;
use crate::models::marks::{entities::MarkView, requests::MarksExportParams};
use crate::services::access::internal_error;
use crate::services::courses::load_course;
use crate::utils::spreadsheet::{Cell, build_xlsx, xlsx_attachment};

const HEADERS: &[&str] = &[
    "USN",
    "Name",
    "Course Code",
    "Course",
    "Subject",
    "Marks",
    "Grade",
    "Uploaded At",
];

fn mark_row(view: &MarkView) -> Vec<Cell> {
    vec![
        view.usn.clone().into(),
        view.student_name.clone().into(),
        view.course_code.clone().into(),
        view.course_title.clone().into(),
        view.mark.subject_name.as_str().into(),
        view.mark.score.into(),
        view.mark.grade.as_str().into(),
        view.mark.uploaded_at.format("%Y-%m-%d %H:%M").to_string().into(),
    ]
}

pub async fn export_marks(
    service: &MarkService,
    params: MarksExportParams,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    let storage = service.get_storage(request);

    let file_name = match params.course_id {
        Some(course_id) => match load_course(&storage, course_id).await {
            Ok(course) => format!("marks_{}.xlsx", course.code.to_lowercase()),
            Err(resp) => return Ok(resp),
        },
        None => "marks.xlsx".to_string(),
    };

    let marks = match storage.list_mark_views(params.course_id).await {
        Ok(marks) => marks,
        Err(e) => return Ok(internal_error(ErrorCode::ExportFailed, "Failed to load marks", e)),
    };
    let rows: Vec<Vec<Cell>> = marks.iter().map(mark_row).collect();

    match build_xlsx("Marks", HEADERS, &rows) {
        Ok(buffer) => Ok(xlsx_attachment(buffer, &file_name)),
        Err(e) => Ok(internal_error(ErrorCode::ExportFailed, "Failed to build export", e)),
    }
}
