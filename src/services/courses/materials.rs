//! 课程资料：multipart 字段 `file` + `title`

use actix_multipart::Multipart;
use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use futures_util::TryStreamExt;
use tracing::info;

use super::{CourseService, check_can_manage, load_course};
use crate::config::AppConfig;
use crate::models::courses::requests::NewCourseMaterial;
use crate::models::{ApiResponse, ErrorCode};
use crate::services::access::{bad_request, current_user, internal_error};
use crate::utils::upload::{SavedUpload, read_text_field, remove_stored_file, save_file_field};

pub async fn upload_material(
    service: &CourseService,
    course_id: i64,
    mut payload: Multipart,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    let user = match current_user(request) {
        Ok(user) => user,
        Err(resp) => return Ok(resp),
    };
    let storage = service.get_storage(request);
    let course = match load_course(&storage, course_id).await {
        Ok(course) => course,
        Err(resp) => return Ok(resp),
    };
    if let Err(resp) = check_can_manage(&user, &course) {
        return Ok(resp);
    }

    let allowed_types = &AppConfig::get().upload.allowed_types;
    let mut title: Option<String> = None;
    let mut saved: Option<SavedUpload> = None;

    while let Ok(Some(mut field)) = payload.try_next().await {
        let name = field
            .content_disposition()
            .and_then(|cd| cd.get_name())
            .unwrap_or_default()
            .to_string();

        match name.as_str() {
            "file" => {
                if let Some(previous) = &saved {
                    remove_stored_file(&previous.stored_name);
                    return Ok(bad_request(
                        ErrorCode::FileUploadFailed,
                        "Only one file can be uploaded at a time",
                    ));
                }
                match save_file_field(&mut field, allowed_types.as_slice()).await {
                    Ok(file) => saved = Some(file),
                    Err(resp) => return Ok(resp),
                }
            }
            "title" => match read_text_field(&mut field).await {
                Ok(text) => title = Some(text.trim().to_string()).filter(|t| !t.is_empty()),
                Err(resp) => {
                    if let Some(file) = &saved {
                        remove_stored_file(&file.stored_name);
                    }
                    return Ok(resp);
                }
            },
            _ => {}
        }
    }

    let Some(file) = saved else {
        return Ok(bad_request(ErrorCode::FileNotFound, "No file found in upload payload"));
    };
    // 未填标题时用原文件名
    let title = title.unwrap_or_else(|| file.original_name.clone());

    let material = NewCourseMaterial {
        course_id: course.id,
        title,
        original_name: file.original_name.clone(),
        stored_name: file.stored_name.clone(),
        url: file.public_url(),
        file_size: file.file_size,
        uploaded_by: user.id,
    };

    match storage.create_course_material(material).await {
        Ok(material) => {
            info!(
                "Material {} ({} bytes) uploaded to course {}",
                material.id, material.file_size, course.code
            );
            Ok(HttpResponse::Created().json(ApiResponse::success(
                material,
                "Material uploaded successfully",
            )))
        }
        Err(e) => {
            remove_stored_file(&file.stored_name);
            Ok(internal_error(ErrorCode::FileUploadFailed, "Failed to save material", e))
        }
    }
}

pub async fn delete_material(
    service: &CourseService,
    course_id: i64,
    material_id: i64,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    let user = match current_user(request) {
        Ok(user) => user,
        Err(resp) => return Ok(resp),
    };
    let storage = service.get_storage(request);
    let course = match load_course(&storage, course_id).await {
        Ok(course) => course,
        Err(resp) => return Ok(resp),
    };
    if let Err(resp) = check_can_manage(&user, &course) {
        return Ok(resp);
    }

    let material = match storage.get_course_material(material_id).await {
        Ok(Some(material)) if material.course_id == course.id => material,
        Ok(_) => {
            return Ok(HttpResponse::NotFound().json(ApiResponse::error_empty(
                ErrorCode::MaterialNotFound,
                "Material not found",
            )));
        }
        Err(e) => {
            return Ok(internal_error(ErrorCode::InternalServerError, "Failed to load material", e));
        }
    };

    match storage.delete_course_material(material.id).await {
        Ok(true) => {
            remove_stored_file(&material.filename);
            Ok(HttpResponse::Ok().json(ApiResponse::<()>::success_empty(
                "Material deleted successfully",
            )))
        }
        Ok(false) => Ok(HttpResponse::NotFound().json(ApiResponse::error_empty(
            ErrorCode::MaterialNotFound,
            "Material not found",
        ))),
        Err(e) => Ok(internal_error(ErrorCode::InternalServerError, "Failed to delete material", e)),
    }
}
