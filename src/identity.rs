//! Resolved caller identity, consumed from the authentication collaborator.
//!
//! Authentication itself happens upstream; the gateway forwards the resolved
//! user as `X-User-Id` / `X-User-Role` headers and the handlers only gate on
//! the role tag.

use std::future::{ready, Ready};

use actix_web::dev::Payload;
use actix_web::{FromRequest, HttpRequest};
use uuid::Uuid;

use crate::errors::AppError;

pub const USER_ID_HEADER: &str = "X-User-Id";
pub const USER_ROLE_HEADER: &str = "X-User-Role";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Role {
    Farmer,
    Restaurant,
}

impl Role {
    pub fn parse(raw: &str) -> Option<Self> {
        match raw {
            "FARMER" => Some(Role::Farmer),
            "RESTAURANT" => Some(Role::Restaurant),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy)]
pub struct Identity {
    pub user_id: Uuid,
    pub role: Role,
}

impl Identity {
    pub fn require_role(&self, role: Role) -> Result<(), AppError> {
        if self.role == role {
            Ok(())
        } else {
            Err(AppError::Forbidden)
        }
    }
}

fn header<'a>(req: &'a HttpRequest, name: &str) -> Option<&'a str> {
    req.headers().get(name)?.to_str().ok()
}

fn resolve(req: &HttpRequest) -> Result<Identity, AppError> {
    let user_id = header(req, USER_ID_HEADER)
        .and_then(|raw| Uuid::parse_str(raw).ok())
        .ok_or(AppError::Unauthorized)?;
    let role = header(req, USER_ROLE_HEADER)
        .and_then(Role::parse)
        .ok_or(AppError::Unauthorized)?;
    Ok(Identity { user_id, role })
}

impl FromRequest for Identity {
    type Error = AppError;
    type Future = Ready<Result<Self, AppError>>;

    fn from_request(req: &HttpRequest, _payload: &mut Payload) -> Self::Future {
        ready(resolve(req))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use actix_web::test::TestRequest;

    #[actix_web::test]
    async fn resolves_a_well_formed_identity() {
        let user_id = Uuid::new_v4();
        let req = TestRequest::default()
            .insert_header((USER_ID_HEADER, user_id.to_string()))
            .insert_header((USER_ROLE_HEADER, "FARMER"))
            .to_http_request();
        let identity = resolve(&req).expect("identity should resolve");
        assert_eq!(identity.user_id, user_id);
        assert_eq!(identity.role, Role::Farmer);
    }

    #[actix_web::test]
    async fn missing_headers_are_unauthorized() {
        let req = TestRequest::default().to_http_request();
        assert!(matches!(resolve(&req), Err(AppError::Unauthorized)));
    }

    #[actix_web::test]
    async fn malformed_user_id_is_unauthorized() {
        let req = TestRequest::default()
            .insert_header((USER_ID_HEADER, "not-a-uuid"))
            .insert_header((USER_ROLE_HEADER, "FARMER"))
            .to_http_request();
        assert!(matches!(resolve(&req), Err(AppError::Unauthorized)));
    }

    #[actix_web::test]
    async fn unknown_role_is_unauthorized() {
        let req = TestRequest::default()
            .insert_header((USER_ID_HEADER, Uuid::new_v4().to_string()))
            .insert_header((USER_ROLE_HEADER, "ADMIN"))
            .to_http_request();
        assert!(matches!(resolve(&req), Err(AppError::Unauthorized)));
    }

    #[test]
    fn role_gate_rejects_the_other_role() {
        let identity = Identity { user_id: Uuid::new_v4(), role: Role::Restaurant };
        assert!(identity.require_role(Role::Restaurant).is_ok());
        assert!(matches!(identity.require_role(Role::Farmer), Err(AppError::Forbidden)));
    }
}
