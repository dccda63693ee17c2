use actix_multipart::Multipart;
use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use chrono::Utc;
use futures_util::StreamExt;

use super::{ProfileService, apply_update, load_self};
use crate::models::users::entities::ProfilePicture;
use crate::models::users::requests::UserUpdate;
use crate::models::{ApiResponse, ErrorCode};
use crate::services::access::{bad_request, current_user};
use crate::utils::file_magic::IMAGE_EXTENSIONS;
use crate::utils::upload::{remove_stored_file, save_file_field};

const PICTURE_FIELD: &str = "profilePicture";

pub async fn upload_picture(
    service: &ProfileService,
    mut payload: Multipart,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    let user = match current_user(request) {
        Ok(user) => user,
        Err(resp) => return Ok(resp),
    };

    let mut saved = None;
    while let Some(item) = payload.next().await {
        let mut field = match item {
            Ok(field) => field,
            Err(e) => {
                return Ok(bad_request(
                    ErrorCode::FileUploadFailed,
                    format!("Invalid multipart payload: {e}"),
                ));
            }
        };
        if field.name() != Some(PICTURE_FIELD) || saved.is_some() {
            continue;
        }
        match save_file_field(&mut field, IMAGE_EXTENSIONS).await {
            Ok(upload) => saved = Some(upload),
            Err(resp) => return Ok(resp),
        }
    }

    let Some(saved) = saved else {
        return Ok(bad_request(
            ErrorCode::FileUploadFailed,
            "Missing profilePicture field",
        ));
    };

    let storage = service.get_storage(request);
    let previous = match load_self(&storage, user.id).await {
        Ok(user) => user.profile_picture,
        Err(resp) => {
            remove_stored_file(&saved.stored_name);
            return Ok(resp);
        }
    };

    let picture = ProfilePicture {
        url: saved.public_url(),
        filename: saved.stored_name.clone(),
        uploaded_at: Utc::now(),
    };
    let update = UserUpdate {
        profile_picture: Some(Some(picture)),
        ..Default::default()
    };

    match apply_update(&storage, request, user.id, update).await {
        Ok(user) => {
            if let Some(old) = previous {
                remove_stored_file(&old.filename);
            }
            Ok(HttpResponse::Ok().json(ApiResponse::success(
                user,
                "Profile picture updated successfully",
            )))
        }
        Err(resp) => {
            remove_stored_file(&saved.stored_name);
            Ok(resp)
        }
    }
}

pub async fn delete_picture(
    service: &ProfileService,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    let user = match current_user(request) {
        Ok(user) => user,
        Err(resp) => return Ok(resp),
    };
    let storage = service.get_storage(request);
    let previous = match load_self(&storage, user.id).await {
        Ok(user) => user.profile_picture,
        Err(resp) => return Ok(resp),
    };
    let Some(previous) = previous else {
        return Ok(HttpResponse::NotFound().json(ApiResponse::error_empty(
            ErrorCode::FileNotFound,
            "No profile picture to remove",
        )));
    };

    let update = UserUpdate {
        profile_picture: Some(None),
        ..Default::default()
    };
    match apply_update(&storage, request, user.id, update).await {
        Ok(user) => {
            remove_stored_file(&previous.filename);
            Ok(HttpResponse::Ok().json(ApiResponse::success(
                user,
                "Profile picture removed successfully",
            )))
        }
        Err(resp) => Ok(resp),
    }
}
