//! 学生批量导入：USN 已存在则更新，否则新建

use actix_multipart::Multipart;
use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use tracing::{info, warn};

use super::StudentService;
use crate::middlewares::RequireJWT;
use crate::models::users::{
    entities::{Department, StudentProfile, UserKind},
    requests::{NewUser, UserUpdate},
};
use crate::models::{ApiResponse, ImportRowError, ImportSummary};
use crate::utils::password::hash_password_blocking;
use crate::utils::spreadsheet::{SheetRow, read_import_sheet};
use crate::utils::validate::{validate_cgpa, validate_email, validate_name, validate_usn};

const REQUIRED_COLUMNS: &[&str] = &["Name", "Email", "USN", "Branch", "Semester"];

#[derive(Debug, Clone, PartialEq)]
struct StudentRow {
    name: String,
    email: String,
    usn: String,
    branch: Department,
    semester: i32,
    cgpa: Option<f64>,
    password: Option<String>,
}

/// 解析并校验一行，返回该行全部字段错误
fn parse_row(row: &SheetRow) -> Result<StudentRow, Vec<ImportRowError>> {
    let mut errors = Vec::new();
    let mut fail = |field: &str, msg: String| errors.push(ImportRowError::new(row.row_num, field, msg));

    let name = row.get("Name").unwrap_or_default().to_string();
    if let Err(msg) = validate_name(&name) {
        fail("Name", msg.to_string());
    }

    let email = row.get("Email").unwrap_or_default().to_lowercase();
    if let Err(msg) = validate_email(&email) {
        fail("Email", msg.to_string());
    }

    let usn = row.get("USN").unwrap_or_default().to_uppercase();
    if let Err(msg) = validate_usn(&usn) {
        fail("USN", msg.to_string());
    }

    let branch = match row.get("Branch").map(str::parse::<Department>) {
        Some(Ok(branch)) => Some(branch),
        Some(Err(msg)) => {
            fail("Branch", msg);
            None
        }
        None => {
            fail("Branch", "Branch is required".to_string());
            None
        }
    };

    let semester = match row.number("Semester") {
        Ok(Some(v)) if v.fract() == 0.0 && (1.0..=8.0).contains(&v) => Some(v as i32),
        Ok(Some(_)) => {
            fail("Semester", "Semester must be between 1 and 8".to_string());
            None
        }
        Ok(None) => {
            fail("Semester", "Semester is required".to_string());
            None
        }
        Err(msg) => {
            fail("Semester", msg);
            None
        }
    };

    let cgpa = match row.number("CGPA") {
        Ok(Some(v)) => match validate_cgpa(v) {
            Ok(()) => Some(v),
            Err(msg) => {
                fail("CGPA", msg.to_string());
                None
            }
        },
        Ok(None) => None,
        Err(msg) => {
            fail("CGPA", msg);
            None
        }
    };

    let password = row.get("Password").map(str::to_string);

    match (branch, semester) {
        (Some(branch), Some(semester)) if errors.is_empty() => Ok(StudentRow {
            name,
            email,
            usn,
            branch,
            semester,
            cgpa,
            password,
        }),
        _ => Err(errors),
    }
}

pub async fn import_students(
    service: &StudentService,
    mut payload: Multipart,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    let sheet = match read_import_sheet(&mut payload, REQUIRED_COLUMNS).await {
        Ok(sheet) => sheet,
        Err(resp) => return Ok(resp),
    };

    let storage = service.get_storage(request);
    let mut summary = ImportSummary::new(sheet.rows.len());

    for row in &sheet.rows {
        let data = match parse_row(row) {
            Ok(data) => data,
            Err(errors) => {
                errors.into_iter().for_each(|e| summary.fail(e));
                continue;
            }
        };

        let existing = match storage.get_student_by_usn(&data.usn).await {
            Ok(existing) => existing,
            Err(e) => {
                summary.fail(ImportRowError::new(row.row_num, "USN", format!("Lookup failed: {e}")));
                continue;
            }
        };

        // 邮箱不能被其他账号占用
        match storage.get_user_by_email(&data.email).await {
            Ok(Some(owner)) if Some(owner.id) != existing.as_ref().map(|u| u.id) => {
                summary.fail(ImportRowError::new(row.row_num, "Email", "Email already exists"));
                continue;
            }
            Ok(_) => {}
            Err(e) => {
                summary.fail(ImportRowError::new(row.row_num, "Email", format!("Lookup failed: {e}")));
                continue;
            }
        }

        match existing {
            Some(student) => {
                let mut update = UserUpdate {
                    name: Some(data.name),
                    email: Some(data.email),
                    branch: Some(data.branch),
                    semester: Some(data.semester),
                    cgpa: data.cgpa,
                    ..Default::default()
                };
                if let Some(password) = data.password {
                    match hash_password_blocking(password).await {
                        Ok(hash) => update.password_hash = Some(hash),
                        Err(e) => {
                            summary.fail(ImportRowError::new(row.row_num, "Password", e.to_string()));
                            continue;
                        }
                    }
                }
                match storage.update_user(student.id, update).await {
                    Ok(Some(_)) => {
                        RequireJWT::invalidate_user(request, student.id).await;
                        summary.updated += 1;
                    }
                    Ok(None) => summary.fail(ImportRowError::new(row.row_num, "USN", "Student not found")),
                    Err(e) => {
                        warn!("Import update failed at row {}: {}", row.row_num, e);
                        summary.fail(ImportRowError::new(row.row_num, "", format!("Update failed: {e}")));
                    }
                }
            }
            None => {
                // 未提供密码时以 USN 作为初始密码
                let password = data.password.unwrap_or_else(|| data.usn.clone());
                let password_hash = match hash_password_blocking(password).await {
                    Ok(hash) => hash,
                    Err(e) => {
                        summary.fail(ImportRowError::new(row.row_num, "Password", e.to_string()));
                        continue;
                    }
                };
                let new_user = NewUser {
                    name: data.name,
                    email: data.email,
                    password_hash,
                    kind: UserKind::Student(StudentProfile {
                        usn: data.usn,
                        branch: data.branch,
                        semester: data.semester,
                        cgpa: data.cgpa.unwrap_or(0.0),
                        attendance_percentage: 0.0,
                        parent_id: None,
                    }),
                };
                match storage.create_user(new_user).await {
                    Ok(_) => summary.created += 1,
                    Err(e) => {
                        warn!("Import create failed at row {}: {}", row.row_num, e);
                        summary.fail(ImportRowError::new(row.row_num, "", format!("Create failed: {e}")));
                    }
                }
            }
        }
    }

    info!(
        "Student import finished: {} created, {} updated, {} failed",
        summary.created, summary.updated, summary.failed
    );

    Ok(HttpResponse::Ok().json(ApiResponse::success(summary, "Student import completed")))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::utils::spreadsheet::parse_sheet;

    #[test]
    fn test_parse_valid_row() {
        let data = b"Name,Email,USN,Branch,Semester,CGPA\nAsha,Asha@College.edu,1rv21cs001,cse,5,8.2\n";
        let sheet = parse_sheet(data, "students.csv", 10).unwrap();
        let row = parse_row(&sheet.rows[0]).unwrap();
        assert_eq!(row.email, "asha@college.edu");
        assert_eq!(row.usn, "1RV21CS001");
        assert_eq!(row.branch, Department::Cse);
        assert_eq!(row.semester, 5);
        assert_eq!(row.cgpa, Some(8.2));
        assert_eq!(row.password, None);
    }

    #[test]
    fn test_parse_collects_every_field_error() {
        let data = b"Name,Email,USN,Branch,Semester,CGPA\n,bad,1RV21CS001,XYZ,9,abc\n";
        let sheet = parse_sheet(data, "students.csv", 10).unwrap();
        let errors = parse_row(&sheet.rows[0]).unwrap_err();
        let fields: Vec<&str> = errors.iter().map(|e| e.field.as_str()).collect();
        assert_eq!(fields, vec!["Name", "Email", "Branch", "Semester", "CGPA"]);
        assert!(errors.iter().all(|e| e.row == 2));
    }
}
