use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};

use super::{ProfileService, apply_update, load_self};
use crate::models::profile::UpdatePreferencesRequest;
use crate::models::users::entities::Preferences;
use crate::models::users::requests::UserUpdate;
use crate::models::{ApiResponse, ErrorCode};
use crate::services::access::{bad_request, current_user};

/// 只覆盖请求中给出的分组
fn merge_preferences(mut current: Preferences, body: UpdatePreferencesRequest) -> Preferences {
    if let Some(theme) = body.theme {
        current.theme = theme;
    }
    if let Some(notifications) = body.notifications {
        current.notifications = notifications;
    }
    if let Some(privacy) = body.privacy {
        current.privacy = privacy;
    }
    current
}

pub async fn update_preferences(
    service: &ProfileService,
    body: UpdatePreferencesRequest,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    let user = match current_user(request) {
        Ok(user) => user,
        Err(resp) => return Ok(resp),
    };
    if body.theme.is_none() && body.notifications.is_none() && body.privacy.is_none() {
        return Ok(bad_request(ErrorCode::BadRequest, "No preferences to update"));
    }

    let storage = service.get_storage(request);
    let current = match load_self(&storage, user.id).await {
        Ok(user) => user.preferences,
        Err(resp) => return Ok(resp),
    };

    let update = UserUpdate {
        preferences: Some(merge_preferences(current, body)),
        ..Default::default()
    };
    match apply_update(&storage, request, user.id, update).await {
        Ok(user) => Ok(HttpResponse::Ok().json(ApiResponse::success(
            user.preferences,
            "Preferences updated successfully",
        ))),
        Err(resp) => Ok(resp),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::users::entities::{PrivacyPreferences, ProfileVisibility, Theme};

    #[test]
    fn test_merge_keeps_untouched_groups() {
        let merged = merge_preferences(
            Preferences::default(),
            UpdatePreferencesRequest {
                theme: Some(Theme::Dark),
                ..Default::default()
            },
        );
        assert_eq!(merged.theme, Theme::Dark);
        assert_eq!(
            merged.privacy.profile_visibility,
            PrivacyPreferences::default().profile_visibility
        );

        let merged = merge_preferences(
            merged,
            UpdatePreferencesRequest {
                privacy: Some(PrivacyPreferences {
                    profile_visibility: ProfileVisibility::Private,
                    show_email: true,
                }),
                ..Default::default()
            },
        );
        assert_eq!(merged.theme, Theme::Dark);
        assert!(merged.privacy.show_email);
    }
}
