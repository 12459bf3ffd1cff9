use std::future::{Ready, ready};

use actix_web::{FromRequest, HttpRequest, dev::Payload};

use crate::error::LedgerError;

pub const ADMIN_USER_HEADER: &str = "X-Admin-User";
pub const ADMIN_PASSWORD_HEADER: &str = "X-Admin-Password";

/// Username/password of the admin acting on a request, taken from the
/// `X-Admin-User` and `X-Admin-Password` headers. Checked per request;
/// no session is kept.
#[derive(Debug, Clone)]
pub struct AdminCredentials {
    pub username: String,
    pub password: String,
}

impl FromRequest for AdminCredentials {
    type Error = LedgerError;
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _: &mut Payload) -> Self::Future {
        let header = |name: &str| {
            req.headers()
                .get(name)
                .and_then(|h| h.to_str().ok())
                .map(str::to_string)
        };

        match (header(ADMIN_USER_HEADER), header(ADMIN_PASSWORD_HEADER)) {
            (Some(username), Some(password)) => ready(Ok(AdminCredentials { username, password })),
            _ => ready(Err(LedgerError::Unauthorized(
                "missing admin credentials".into(),
            ))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use actix_web::test::TestRequest;

    #[actix_web::test]
    async fn reads_both_headers() {
        let (req, mut payload) = TestRequest::default()
            .insert_header((ADMIN_USER_HEADER, "root"))
            .insert_header((ADMIN_PASSWORD_HEADER, "pw"))
            .to_http_parts();

        let creds = AdminCredentials::from_request(&req, &mut payload)
            .await
            .unwrap();
        assert_eq!(creds.username, "root");
        assert_eq!(creds.password, "pw");
    }

    #[actix_web::test]
    async fn missing_password_is_unauthorized() {
        let (req, mut payload) = TestRequest::default()
            .insert_header((ADMIN_USER_HEADER, "root"))
            .to_http_parts();

        let err = AdminCredentials::from_request(&req, &mut payload)
            .await
            .unwrap_err();
        assert!(matches!(err, LedgerError::Unauthorized(_)));
    }
}
