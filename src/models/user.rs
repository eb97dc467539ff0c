//! Requester identity carried by bearer tokens

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::error::AppError;

/// Role tag issued by the identity service
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Admin,
    Manager,
    User,
}

impl Role {
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Admin => "admin",
            Role::Manager => "manager",
            Role::User => "user",
        }
    }
}

impl std::fmt::Display for Role {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Which orders a requester may see
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OrderScope {
    All,
    /// Orders on buildings managed by this user
    Manager(i32),
    /// Orders placed by this user
    Owner(i32),
}

/// JWT claims for authenticated users
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserClaims {
    pub sub: String,
    pub user_id: i32,
    pub role: Role,
    pub exp: i64,
    pub iat: i64,
}

impl UserClaims {
    /// Encode the claims as an HS256 token
    pub fn create_token(&self, secret: &str) -> Result<String, jsonwebtoken::errors::Error> {
        use jsonwebtoken::{encode, EncodingKey, Header};
        encode(
            &Header::default(),
            self,
            &EncodingKey::from_secret(secret.as_bytes()),
        )
    }

    /// Parse and verify a token
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
        self.role == Role::Admin
    }

    /// Managers and admins may run buildings and the add-on catalog
    pub fn require_manager(&self) -> Result<(), AppError> {
        match self.role {
            Role::Admin | Role::Manager => Ok(()),
            Role::User => Err(AppError::Authorization(
                "Manager privileges required".to_string(),
            )),
        }
    }

    /// Require that the requester manages the building (admins always pass)
    pub fn require_building_owner(&self, manager_id: i32) -> Result<(), AppError> {
        if self.is_admin() || (self.role == Role::Manager && self.user_id == manager_id) {
            Ok(())
        } else {
            Err(AppError::Authorization(
                "Only the building manager may do this".to_string(),
            ))
        }
    }

    pub fn order_scope(&self) -> OrderScope {
        match self.role {
            Role::Admin => OrderScope::All,
            Role::Manager => OrderScope::Manager(self.user_id),
            Role::User => OrderScope::Owner(self.user_id),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn claims(role: Role, user_id: i32) -> UserClaims {
        let now = chrono::Utc::now().timestamp();
        UserClaims {
            sub: format!("user-{}", user_id),
            user_id,
            role,
            exp: now + 3600,
            iat: now,
        }
    }

    #[test]
    fn test_token_round_trip() {
        let c = claims(Role::Manager, 7);
        let token = c.create_token("secret").unwrap();
        let parsed = UserClaims::from_token(&token, "secret").unwrap();
        assert_eq!(parsed.user_id, 7);
        assert_eq!(parsed.role, Role::Manager);
        assert!(UserClaims::from_token(&token, "other-secret").is_err());
    }

    #[test]
    fn test_order_scope() {
        assert_eq!(claims(Role::Admin, 1).order_scope(), OrderScope::All);
        assert_eq!(claims(Role::Manager, 2).order_scope(), OrderScope::Manager(2));
        assert_eq!(claims(Role::User, 3).order_scope(), OrderScope::Owner(3));
    }

    #[test]
    fn test_building_ownership() {
        assert!(claims(Role::Manager, 5).require_building_owner(5).is_ok());
        assert!(claims(Role::Manager, 5).require_building_owner(6).is_err());
        assert!(claims(Role::Admin, 1).require_building_owner(6).is_ok());
        assert!(claims(Role::User, 5).require_building_owner(5).is_err());
        assert!(claims(Role::User, 5).require_manager().is_err());
    }
}
