/*!
 * 基于角色的访问控制中间件
 *
 * 必须在 RequireJWT 之后使用。未登录返回 401，角色不符返回 403。
 *
 * ```rust,ignore
 * web::resource("/{id}")
 *     .route(web::delete().to(delete_student).wrap(RequireRole::new(&UserRole::Teacher)))
 *
 * // 任一角色即可
 * .wrap(RequireRole::new_any(UserRole::all_roles()))
 * ```
 *
 * 管理员不是独立角色，而是 `is_admin` 的教师，用 [`RequireRole::admin`]。
 */

use actix_service::{Service, Transform};
use actix_web::{
    Error, HttpMessage,
    body::EitherBody,
    dev::{ServiceRequest, ServiceResponse},
    http::StatusCode,
};
use futures_util::future::{LocalBoxFuture, Ready, ready};
use std::rc::Rc;
use tracing::info;

use crate::models::{
    ErrorCode,
    users::entities::{User, UserRole},
};

use super::create_error_response;

#[derive(Clone)]
pub struct RequireRole {
    allowed_roles: Vec<UserRole>,
    admin_only: bool,
}

impl RequireRole {
    pub fn new(role: &UserRole) -> Self {
        Self {
            allowed_roles: vec![*role],
            admin_only: false,
        }
    }

    /// 任一角色即可
    pub fn new_any(roles: &[&UserRole]) -> Self {
        Self {
            allowed_roles: roles.iter().map(|r| **r).collect(),
            admin_only: false,
        }
    }

    /// 仅管理员（is_admin 的教师）
    pub fn admin() -> Self {
        Self {
            allowed_roles: vec![UserRole::Teacher],
            admin_only: true,
        }
    }

    fn permits(&self, user: &User) -> bool {
        self.allowed_roles.contains(&user.role()) && (!self.admin_only || user.is_admin())
    }
}

impl<S, B> Transform<S, ServiceRequest> for RequireRole
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    B: 'static,
{
    type Response = ServiceResponse<EitherBody<B>>;
    type Error = Error;
    type InitError = ();
    type Transform = RequireRoleMiddleware<S>;
    type Future = Ready<Result<Self::Transform, Self::InitError>>;

    fn new_transform(&self, service: S) -> Self::Future {
        ready(Ok(RequireRoleMiddleware {
            service: Rc::new(service),
            rule: self.clone(),
        }))
    }
}

pub struct RequireRoleMiddleware<S> {
    service: Rc<S>,
    rule: RequireRole,
}

impl<S, B> Service<ServiceRequest> for RequireRoleMiddleware<S>
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    B: 'static,
{
    type Response = ServiceResponse<EitherBody<B>>;
    type Error = Error;
    type Future = LocalBoxFuture<'static, Result<Self::Response, Self::Error>>;

    fn poll_ready(
        &self,
        ctx: &mut std::task::Context<'_>,
    ) -> std::task::Poll<Result<(), Self::Error>> {
        self.service.poll_ready(ctx)
    }

    fn call(&self, req: ServiceRequest) -> Self::Future {
        let srv = self.service.clone();
        let rule = self.rule.clone();

        Box::pin(async move {
            let verdict = req
                .extensions()
                .get::<User>()
                .map(|user| (user.id, user.role(), rule.permits(user)));

            match verdict {
                Some((_, _, true)) => Ok(srv.call(req).await?.map_into_left_body()),
                Some((user_id, role, false)) => {
                    info!(
                        "Access denied for user {} (role: {}). Allowed: {:?}, admin only: {}",
                        user_id, role, rule.allowed_roles, rule.admin_only
                    );
                    Ok(req.into_response(
                        create_error_response(
                            StatusCode::FORBIDDEN,
                            ErrorCode::Forbidden,
                            "Access denied",
                        )
                        .map_into_right_body(),
                    ))
                }
                None => {
                    info!("Role check without authenticated user; is RequireJWT applied?");
                    Ok(req.into_response(
                        create_error_response(
                            StatusCode::UNAUTHORIZED,
                            ErrorCode::Unauthorized,
                            "Authentication required",
                        )
                        .map_into_right_body(),
                    ))
                }
            }
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::users::entities::{
        Department, Designation, ParentProfile, TeacherProfile, UserKind,
    };
    use actix_web::{App, HttpResponse, test, web};

    async fn ok() -> HttpResponse {
        HttpResponse::Ok().finish()
    }

    fn teacher(is_admin: bool) -> User {
        User::fixture(
            1,
            UserKind::Teacher(TeacherProfile {
                faculty_id: "FAC001".into(),
                department: Department::Cse,
                designation: Designation::Lecturer,
                is_admin,
            }),
        )
    }

    async fn status_for(user: Option<User>, rule: RequireRole) -> StatusCode {
        let app = test::init_service(
            App::new().service(
                web::resource("/t")
                    .route(web::get().to(ok).wrap(rule))
                    .wrap_fn(move |req, srv| {
                        if let Some(user) = user.clone() {
                            req.extensions_mut().insert(user);
                        }
                        srv.call(req)
                    }),
            ),
        )
        .await;
        let resp = test::call_service(&app, test::TestRequest::get().uri("/t").to_request()).await;
        resp.status()
    }

    #[actix_web::test]
    async fn test_role_gate() {
        let parent = User::fixture(2, UserKind::Parent(ParentProfile { child_usn: None }));

        assert_eq!(
            status_for(Some(teacher(false)), RequireRole::new(&UserRole::Teacher)).await,
            StatusCode::OK
        );
        assert_eq!(
            status_for(Some(parent.clone()), RequireRole::new(&UserRole::Teacher)).await,
            StatusCode::FORBIDDEN
        );
        assert_eq!(
            status_for(Some(parent), RequireRole::new_any(UserRole::all_roles())).await,
            StatusCode::OK
        );
        assert_eq!(
            status_for(None, RequireRole::new(&UserRole::Teacher)).await,
            StatusCode::UNAUTHORIZED
        );
    }

    #[actix_web::test]
    async fn test_admin_gate() {
        assert_eq!(
            status_for(Some(teacher(false)), RequireRole::admin()).await,
            StatusCode::FORBIDDEN
        );
        assert_eq!(
            status_for(Some(teacher(true)), RequireRole::admin()).await,
            StatusCode::OK
        );
    }
}
