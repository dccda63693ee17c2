use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};

use super::StudentService;
use crate::models::ErrorCode;
use crate::models::users::entities::{User, UserRole};
use crate::services::access::internal_error;
use crate::utils::spreadsheet::{Cell, build_xlsx, xlsx_attachment};

const HEADERS: &[&str] = &["Name", "Email", "USN", "Branch", "Semester", "CGPA", "Attendance %"];

fn student_row(user: &User) -> Option<Vec<Cell>> {
    let profile = user.as_student()?;
    Some(vec![
        user.name.as_str().into(),
        user.email.as_str().into(),
        profile.usn.as_str().into(),
        profile.branch.as_str().into(),
        f64::from(profile.semester).into(),
        profile.cgpa.into(),
        profile.attendance_percentage.into(),
    ])
}

pub async fn export_students(
    service: &StudentService,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    let storage = service.get_storage(request);

    let students = match storage.list_users_by_role(UserRole::Student).await {
        Ok(students) => students,
        Err(e) => {
            return Ok(internal_error(ErrorCode::ExportFailed, "Failed to load students", e));
        }
    };

    let rows: Vec<Vec<Cell>> = students.iter().filter_map(student_row).collect();

    match build_xlsx("Students", HEADERS, &rows) {
        Ok(buffer) => Ok(xlsx_attachment(buffer, "students.xlsx")),
        Err(e) => Ok(internal_error(ErrorCode::ExportFailed, "Failed to build export", e)),
    }
}
