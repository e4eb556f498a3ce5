//! Verified caller identity
//!
//! Tokens are issued by the external identity service; this server only
//! verifies the signature and reads the claims.

use serde::{Deserialize, Serialize};

use crate::error::AppError;
use crate::models::enums::Role;

/// JWT claims carried by every authenticated request
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Identity {
    pub sub: String,
    pub subject_id: i32,
    pub role: Role,
    pub exp: i64,
    pub iat: i64,
}

impl Identity {
    /// Sign a token for these claims (used by tests and tooling)
    pub fn create_token(&self, secret: &str) -> Result<String, jsonwebtoken::errors::Error> {
        use jsonwebtoken::{encode, EncodingKey, Header};
        encode(
            &Header::default(),
            self,
            &EncodingKey::from_secret(secret.as_bytes()),
        )
    }

    /// Verify a token and extract the claims
    pub fn from_token(token: &str, secret: &str) -> Result<Self, jsonwebtoken::errors::Error> {
        use jsonwebtoken::{decode, DecodingKey, Validation};
        let token_data = decode::<Self>(
            token,
            &DecodingKey::from_secret(secret.as_bytes()),
            &Validation::default(),
        )?;
        Ok(token_data.claims)
    }

    pub fn is_admin(&self) -> bool {
        self.role == Role::Administrator
    }

    // Authorization checks
    pub fn require_admin(&self) -> Result<(), AppError> {
        if self.is_admin() {
            Ok(())
        } else {
            Err(AppError::Forbidden(
                "Administrator role required".to_string(),
            ))
        }
    }

    /// Administrator or technician. Gates every write on activities and
    /// their sub-resources.
    pub fn require_operational(&self) -> Result<(), AppError> {
        match self.role {
            Role::Administrator | Role::Technician => Ok(()),
            Role::StandardUser => Err(AppError::Forbidden(
                "Administrator or technician role required".to_string(),
            )),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn identity(role: Role) -> Identity {
        Identity {
            sub: "u-7".to_string(),
            subject_id: 7,
            role,
            exp: chrono::Utc::now().timestamp() + 3600,
            iat: chrono::Utc::now().timestamp(),
        }
    }

    #[test]
    fn test_token_round_trip() {
        let claims = identity(Role::Technician);
        let token = claims.create_token("test-secret").unwrap();
        let parsed = Identity::from_token(&token, "test-secret").unwrap();
        assert_eq!(parsed.subject_id, 7);
        assert_eq!(parsed.role, Role::Technician);
    }

    #[test]
    fn test_token_rejects_wrong_secret() {
        let token = identity(Role::Administrator)
            .create_token("test-secret")
            .unwrap();
        assert!(Identity::from_token(&token, "other-secret").is_err());
    }

    #[test]
    fn test_require_admin() {
        assert!(identity(Role::Administrator).require_admin().is_ok());
        assert!(identity(Role::Technician).require_admin().is_err());
        assert!(identity(Role::StandardUser).require_admin().is_err());
    }

    #[test]
    fn test_require_operational() {
        assert!(identity(Role::Administrator).require_operational().is_ok());
        assert!(identity(Role::Technician).require_operational().is_ok());
        assert!(identity(Role::StandardUser).require_operational().is_err());
    }
}
