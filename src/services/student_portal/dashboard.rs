use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};

use super::StudentPortalService;
use crate::models::marks::entities::{Attendance, MarkView};
use crate::models::students::responses::StudentDashboardResponse;
use crate::models::{ApiResponse, ErrorCode};
use crate::services::access::{average_score, current_user, internal_error, load_student};

const RECENT_MARKS: usize = 5;

/// 最近上传的成绩，新的在前
fn recent_marks(mut marks: Vec<MarkView>, limit: usize) -> Vec<MarkView> {
    marks.sort_by(|a, b| b.mark.uploaded_at.cmp(&a.mark.uploaded_at));
    marks.truncate(limit);
    marks
}

pub async fn handle_dashboard(
    service: &StudentPortalService,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    let user = match current_user(request) {
        Ok(user) => user,
        Err(resp) => return Ok(resp),
    };
    let storage = service.get_storage(request);

    // 缓存中的用户可能滞后，出勤率等以库为准
    let student = match load_student(&storage, user.id).await {
        Ok(student) => student,
        Err(resp) => return Ok(resp),
    };

    let courses = match storage.list_student_courses(student.id).await {
        Ok(courses) => courses,
        Err(e) => return Ok(internal_error(ErrorCode::InternalServerError, "Failed to load courses", e)),
    };
    let marks = match storage.list_marks_by_student(student.id).await {
        Ok(marks) => marks,
        Err(e) => return Ok(internal_error(ErrorCode::InternalServerError, "Failed to load marks", e)),
    };
    let attendance = match storage.list_attendance_by_student(student.id).await {
        Ok(records) => records,
        Err(e) => {
            return Ok(internal_error(ErrorCode::InternalServerError, "Failed to load attendance", e));
        }
    };
    let internal_marks = match storage.list_internal_marks_by_student(student.id).await {
        Ok(records) => records,
        Err(e) => {
            return Ok(internal_error(ErrorCode::InternalServerError, "Failed to load internal marks", e));
        }
    };

    let average_score = average_score(marks.iter().map(|m| &m.mark.score));
    let attendance_percentage = Attendance::overall_percentage(&attendance);

    Ok(HttpResponse::Ok().json(ApiResponse::success(
        StudentDashboardResponse {
            student,
            courses,
            recent_marks: recent_marks(marks, RECENT_MARKS),
            attendance,
            internal_marks,
            average_score,
            attendance_percentage,
        },
        "Dashboard retrieved successfully",
    )))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::marks::entities::Mark;
    use chrono::{Duration, Utc};

    fn mark(id: i64, minutes_ago: i64) -> MarkView {
        MarkView {
            mark: Mark {
                id,
                student_id: 1,
                course_id: 1,
                subject_name: "DBMS".into(),
                score: 70.0,
                grade: "B".into(),
                uploaded_by: None,
                uploaded_at: Utc::now() - Duration::minutes(minutes_ago),
            },
            course_code: None,
            course_title: None,
            student_name: None,
            usn: None,
        }
    }

    #[test]
    fn test_recent_marks_newest_first() {
        let marks = (1..=7).map(|i| mark(i, i * 10)).collect();
        let recent = recent_marks(marks, 5);
        let ids: Vec<i64> = recent.iter().map(|m| m.mark.id).collect();
        assert_eq!(ids, vec![1, 2, 3, 4, 5]);
    }
}
