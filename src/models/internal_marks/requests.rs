use super::entities::CieComponents;
use crate::models::common::pagination::deserialize_optional_i64;
use crate::models::courses::entities::SubjectType;
use serde::Deserialize;
use ts_rs::TS;

// 单条 CIE 录入
#[derive(Debug, Clone, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export, export_to = "internal_marks.ts")]
pub struct InternalMarksRequest {
    pub student_id: i64,
    pub course_id: i64,
    #[serde(flatten)]
    #[ts(flatten)]
    pub components: CieComponents,
}

// 批量上传参数
#[derive(Debug, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export, export_to = "internal_marks.ts")]
pub struct InternalMarksUploadParams {
    #[serde(default, deserialize_with = "deserialize_optional_i64")]
    #[ts(type = "number | null")]
    pub course_id: Option<i64>,
}

/// 存储层 upsert 参数
#[derive(Debug, Clone)]
pub struct InternalMarksUpsert {
    pub student_id: i64,
    pub course_id: i64,
    pub subject_type: SubjectType,
    pub components: CieComponents,
    pub calculated_cie: f64,
    pub uploaded_by: i64,
}
