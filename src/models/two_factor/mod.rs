use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use ts_rs::TS;

#[derive(Debug, Serialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export, export_to = "two_factor.ts")]
pub struct TwoFactorStatusResponse {
    pub enabled: bool,
    pub backup_codes_remaining: u64,
    pub last_used_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Serialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export, export_to = "two_factor.ts")]
pub struct TwoFactorSetupResponse {
    /// Base32 编码的共享密钥
    pub secret: String,
    pub otpauth_url: String,
}

#[derive(Debug, Deserialize, TS)]
#[ts(export, export_to = "two_factor.ts")]
pub struct TwoFactorTokenRequest {
    pub token: String,
}

#[derive(Debug, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export, export_to = "two_factor.ts")]
pub struct DisableTwoFactorRequest {
    pub password: String,
    pub token: Option<String>,
    pub backup_code: Option<String>,
}

#[derive(Debug, Serialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export, export_to = "two_factor.ts")]
pub struct BackupCodesResponse {
    pub backup_codes: Vec<String>,
}
