//! 路径参数提取器：非法或非正数 ID 直接返回 400 统一响应

use actix_web::dev::Payload;
use actix_web::error::InternalError;
use actix_web::{FromRequest, HttpRequest, HttpResponse};
use std::future::{Ready, ready};

use crate::models::{ApiResponse, ErrorCode};

fn parse_positive_i64(req: &HttpRequest, name: &str) -> Result<i64, actix_web::Error> {
    req.match_info()
        .get(name)
        .and_then(|raw| raw.parse::<i64>().ok())
        .filter(|id| *id > 0)
        .ok_or_else(|| {
            let message = format!("Invalid path parameter: {name}");
            let response = HttpResponse::BadRequest()
                .json(ApiResponse::error_empty(ErrorCode::BadRequest, &message));
            InternalError::from_response(message, response).into()
        })
}

macro_rules! define_safe_id {
    ($($name:ident => $param:literal),* $(,)?) => {
        $(
            #[derive(Debug, Clone, Copy)]
            pub struct $name(pub i64);

            impl FromRequest for $name {
                type Error = actix_web::Error;
                type Future = Ready<Result<Self, Self::Error>>;

                fn from_request(req: &HttpRequest, _: &mut Payload) -> Self::Future {
                    ready(parse_positive_i64(req, $param).map($name))
                }
            }
        )*
    };
}

define_safe_id! {
    SafeIDI64 => "id",
    SafeStudentIdI64 => "student_id",
    SafeCourseIdI64 => "course_id",
    SafeMaterialIdI64 => "material_id",
}

#[cfg(test)]
mod tests {
    use super::*;
    use actix_web::test::TestRequest;

    #[actix_web::test]
    async fn test_valid_id_is_extracted() {
        let (req, mut payload) = TestRequest::default()
            .param("id", "42")
            .to_http_parts();
        let id = SafeIDI64::from_request(&req, &mut payload).await.unwrap();
        assert_eq!(id.0, 42);
    }

    #[actix_web::test]
    async fn test_invalid_id_is_rejected() {
        for raw in ["abc", "0", "-3"] {
            let (req, mut payload) = TestRequest::default()
                .param("student_id", raw)
                .to_http_parts();
            assert!(SafeStudentIdI64::from_request(&req, &mut payload).await.is_err());
        }
    }

    #[actix_web::test]
    async fn test_missing_param_is_rejected() {
        let (req, mut payload) = TestRequest::default().to_http_parts();
        assert!(SafeCourseIdI64::from_request(&req, &mut payload).await.is_err());
    }
}
