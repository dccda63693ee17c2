use serde::Deserialize;
use ts_rs::TS;

// 用户登录请求（来自HTTP请求）
#[derive(Debug, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export, export_to = "auth.ts")]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
    /// TOTP 动态码
    pub two_factor_token: Option<String>,
    /// 一次性备用码
    pub backup_code: Option<String>,
    /// 客户端设备标识
    pub device_id: Option<String>,
    /// 登录成功后信任该设备（跳过两步验证）
    #[serde(default)]
    pub trust_device: bool,
    /// 是否记住我
    #[serde(default)]
    pub remember_me: bool,
}
