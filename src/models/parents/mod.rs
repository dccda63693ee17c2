use crate::models::users::entities::User;
use serde::{Deserialize, Serialize};
use ts_rs::TS;

// 关联子女请求
#[derive(Debug, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export, export_to = "parent.ts")]
pub struct LinkChildRequest {
    pub usn: String,
}

// 子女列表
#[derive(Debug, Serialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export, export_to = "parent.ts")]
pub struct ChildrenResponse {
    pub children: Vec<User>,
}
