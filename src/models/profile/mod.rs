use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::models::users::entities::{
    NotificationPreferences, PrivacyPreferences, Theme, TrustedDevice,
};

// 修改密码
#[derive(Debug, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export, export_to = "profile.ts")]
pub struct ChangePasswordRequest {
    pub current_password: String,
    pub new_password: String,
}

// 偏好设置更新（只更新提供的分组）
#[derive(Debug, Default, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export, export_to = "profile.ts")]
pub struct UpdatePreferencesRequest {
    pub theme: Option<Theme>,
    pub notifications: Option<NotificationPreferences>,
    pub privacy: Option<PrivacyPreferences>,
}

// 安全设置概览
#[derive(Debug, Serialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export, export_to = "profile.ts")]
pub struct SecurityOverviewResponse {
    pub two_factor_enabled: bool,
    pub backup_codes_remaining: u64,
    pub login_attempts: i32,
    pub lock_until: Option<DateTime<Utc>>,
    pub last_login_ip: Option<String>,
    pub last_login_at: Option<DateTime<Utc>>,
    pub trusted_devices: Vec<TrustedDevice>,
}
