use std::future::{ready, Ready};

use actix_web::{dev::Payload, http::header, web, FromRequest, HttpRequest};
use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::api::error::ServiceError;

/// Account role carried in the identity token
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Employer,
    Jobseeker,
}

/// Token claims issued by the authentication service
#[derive(Debug, Serialize, Deserialize)]
pub struct Claims {
    pub sub: String,
    pub role: Role,
    pub exp: i64,
}

/// Signing keys for HS256 identity tokens
#[derive(Clone)]
pub struct JwtKeys {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
}

impl JwtKeys {
    pub fn new(secret: &str) -> Self {
        Self {
            encoding_key: EncodingKey::from_secret(secret.as_bytes()),
            decoding_key: DecodingKey::from_secret(secret.as_bytes()),
        }
    }

    /// Issue a token for `user_id` valid for `ttl_hours`
    pub fn issue(
        &self,
        user_id: i32,
        role: Role,
        ttl_hours: i64,
    ) -> Result<String, jsonwebtoken::errors::Error> {
        let exp = chrono::Utc::now() + chrono::Duration::hours(ttl_hours);
        let claims = Claims {
            sub: user_id.to_string(),
            role,
            exp: exp.timestamp(),
        };
        encode(&Header::default(), &claims, &self.encoding_key)
    }

    /// Verify signature and expiry, returning the identity the token names
    pub fn verify(&self, token: &str) -> Option<Identity> {
        let claims = decode::<Claims>(token, &self.decoding_key, &Validation::default())
            .map(|data| data.claims)
            .ok()?;
        let user_id = claims.sub.parse().ok()?;
        Some(Identity {
            user_id,
            role: claims.role,
        })
    }
}

/// Authenticated requester
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Identity {
    pub user_id: i32,
    pub role: Role,
}

impl Identity {
    /// Reject the request unless the requester holds `role`
    pub fn require(&self, role: Role, message: &str) -> Result<(), ServiceError> {
        if self.role == role {
            Ok(())
        } else {
            Err(ServiceError::Forbidden(message.to_string()))
        }
    }

    /// Ownership check against a stored owner or applicant id
    pub fn owns(&self, owner_id: i32) -> bool {
        self.user_id == owner_id
    }
}

fn bearer_token(req: &HttpRequest) -> Option<&str> {
    let value = req.headers().get(header::AUTHORIZATION)?.to_str().ok()?.trim();
    let token = match value.split_once(' ') {
        Some((scheme, rest)) if scheme.eq_ignore_ascii_case("bearer") => rest,
        _ => value,
    };
    Some(token.trim())
}

fn extract_identity(req: &HttpRequest) -> Result<Identity, ServiceError> {
    let keys = req
        .app_data::<web::Data<JwtKeys>>()
        .ok_or(ServiceError::Unauthorized)?;
    let token = bearer_token(req).ok_or(ServiceError::Unauthorized)?;

    match keys.verify(token) {
        Some(identity) => {
            debug!("Authenticated user {} ({:?})", identity.user_id, identity.role);
            Ok(identity)
        }
        None => {
            debug!("Rejected identity token");
            Err(ServiceError::Unauthorized)
        }
    }
}

impl FromRequest for Identity {
    type Error = ServiceError;
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _: &mut Payload) -> Self::Future {
        ready(extract_identity(req))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use actix_web::test::TestRequest;

    #[test]
    fn issued_token_verifies() {
        let keys = JwtKeys::new("test_secret");
        let token = keys.issue(42, Role::Employer, 1).unwrap();

        let identity = keys.verify(&token).unwrap();
        assert_eq!(identity, Identity { user_id: 42, role: Role::Employer });
    }

    #[test]
    fn token_signed_with_other_secret_is_rejected() {
        let token = JwtKeys::new("one").issue(1, Role::Jobseeker, 1).unwrap();
        assert!(JwtKeys::new("two").verify(&token).is_none());
    }

    #[test]
    fn expired_token_is_rejected() {
        let keys = JwtKeys::new("test_secret");
        let token = keys.issue(1, Role::Jobseeker, -2).unwrap();
        assert!(keys.verify(&token).is_none());
    }

    #[test]
    fn extracts_with_any_bearer_casing_or_bare_token() {
        let keys = JwtKeys::new("test_secret");
        let token = keys.issue(7, Role::Jobseeker, 1).unwrap();

        for value in [
            format!("Bearer {}", token),
            format!("bearer {}", token),
            format!("BEARER  {}", token),
            token.clone(),
        ] {
            let req = TestRequest::default()
                .app_data(web::Data::new(keys.clone()))
                .insert_header((header::AUTHORIZATION, value))
                .to_http_request();
            assert_eq!(extract_identity(&req).unwrap().user_id, 7);
        }
    }

    #[test]
    fn missing_header_is_unauthorized() {
        let req = TestRequest::default()
            .app_data(web::Data::new(JwtKeys::new("test_secret")))
            .to_http_request();
        assert!(matches!(extract_identity(&req), Err(ServiceError::Unauthorized)));
    }

    #[test]
    fn role_requirement() {
        let identity = Identity { user_id: 1, role: Role::Jobseeker };
        assert!(identity.require(Role::Jobseeker, "nope").is_ok());
        assert!(matches!(
            identity.require(Role::Employer, "Only employers can post jobs"),
            Err(ServiceError::Forbidden(_))
        ));
        assert!(identity.owns(1));
        assert!(!identity.owns(2));
    }
}
