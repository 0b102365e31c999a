//! User records and credential input validation.
//!
//! A user is created on registration and afterwards only its `last_login`
//! changes. The password hash never leaves this crate's types in serialized
//! form: [`User`] is not `Serialize`, and the public views omit it.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use casedesk_core::{UserId, ValidationErrors, is_valid_email, normalize_email};

use crate::Role;

/// Minimum accepted password length (characters).
pub const MIN_PASSWORD_LEN: usize = 6;

// ─────────────────────────────────────────────────────────────────────────────
// Records
// ─────────────────────────────────────────────────────────────────────────────

/// Stored user record, including the password hash.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct User {
    pub id: UserId,
    pub name: String,
    pub email: String,
    pub password_hash: String,
    pub role: Role,
    pub ip_address: Option<String>,
    pub registration_date: DateTime<Utc>,
    pub last_login: Option<DateTime<Utc>>,
}

impl User {
    pub fn summary(&self) -> UserSummary {
        UserSummary {
            id: self.id,
            name: self.name.clone(),
            email: self.email.clone(),
            role: self.role,
        }
    }

    pub fn profile(&self) -> UserProfile {
        UserProfile {
            id: self.id,
            name: self.name.clone(),
            email: self.email.clone(),
            role: self.role,
            ip_address: self.ip_address.clone(),
            registration_date: self.registration_date,
            last_login: self.last_login,
        }
    }
}

/// Values for a user row that does not exist yet; the store assigns the id
/// and registration timestamp.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewUser {
    pub name: String,
    pub email: String,
    pub password_hash: String,
    pub role: Role,
    pub ip_address: Option<String>,
}

/// Identity block returned alongside a freshly issued token.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserSummary {
    pub id: UserId,
    pub name: String,
    pub email: String,
    pub role: Role,
}

/// Sanitized user record (everything except the password hash).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserProfile {
    pub id: UserId,
    pub name: String,
    pub email: String,
    pub role: Role,
    pub ip_address: Option<String>,
    pub registration_date: DateTime<Utc>,
    pub last_login: Option<DateTime<Utc>>,
}

// ─────────────────────────────────────────────────────────────────────────────
// Inputs
// ─────────────────────────────────────────────────────────────────────────────

/// Raw registration body. Missing fields deserialize as empty strings so that
/// they are reported by validation rather than rejected by the JSON layer.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct RegisterInput {
    pub name: String,
    pub email: String,
    pub password: String,
}

/// Registration input that passed validation; email is normalized.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidatedRegistration {
    pub name: String,
    pub email: String,
    pub password: String,
}

impl RegisterInput {
    pub fn validate(self) -> Result<ValidatedRegistration, ValidationErrors> {
        let mut errors = ValidationErrors::new();
        errors.check(!self.name.trim().is_empty(), "name", "Name is required");
        errors.check(is_valid_email(&self.email), "email", "Please include a valid email");
        errors.check(
            self.password.chars().count() >= MIN_PASSWORD_LEN,
            "password",
            "Password must be at least 6 characters",
        );
        errors.into_result()?;

        Ok(ValidatedRegistration {
            name: self.name.trim().to_string(),
            email: normalize_email(&self.email),
            password: self.password,
        })
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct LoginInput {
    pub email: String,
    pub password: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidatedLogin {
    pub email: String,
    pub password: String,
}

impl LoginInput {
    pub fn validate(self) -> Result<ValidatedLogin, ValidationErrors> {
        let mut errors = ValidationErrors::new();
        errors.check(is_valid_email(&self.email), "email", "Please include a valid email");
        errors.check(!self.password.is_empty(), "password", "Password is required");
        errors.into_result()?;

        Ok(ValidatedLogin {
            email: normalize_email(&self.email),
            password: self.password,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn register(name: &str, email: &str, password: &str) -> RegisterInput {
        RegisterInput {
            name: name.to_string(),
            email: email.to_string(),
            password: password.to_string(),
        }
    }

    #[test]
    fn valid_registration_normalizes_email() {
        let ok = register(" Alice ", "A@X.com", "secret1").validate().unwrap();
        assert_eq!(ok.name, "Alice");
        assert_eq!(ok.email, "a@x.com");
        assert_eq!(ok.password, "secret1");
    }

    #[test]
    fn registration_reports_every_bad_field() {
        let errors = register("", "nope", "12345").validate().unwrap_err();
        assert_eq!(errors.len(), 3);
        assert!(errors.has_field("name"));
        assert!(errors.has_field("email"));
        assert!(errors.has_field("password"));
    }

    #[test]
    fn six_character_password_is_enough() {
        assert!(register("Bob", "b@x.com", "123456").validate().is_ok());
    }

    #[test]
    fn missing_json_fields_become_validation_errors() {
        let input: RegisterInput = serde_json::from_str(r#"{"email":"a@x.com"}"#).unwrap();
        let errors = input.validate().unwrap_err();
        assert!(errors.has_field("name"));
        assert!(errors.has_field("password"));
        assert!(!errors.has_field("email"));
    }

    #[test]
    fn login_requires_email_and_password() {
        let errors = LoginInput::default().validate().unwrap_err();
        assert_eq!(errors.len(), 2);
    }

    #[test]
    fn profile_omits_password_hash() {
        let user = User {
            id: UserId::new(),
            name: "Alice".into(),
            email: "a@x.com".into(),
            password_hash: "$2b$04$hash".into(),
            role: Role::User,
            ip_address: Some("127.0.0.1".into()),
            registration_date: Utc::now(),
            last_login: None,
        };

        let json = serde_json::to_value(user.profile()).unwrap();
        assert!(json.get("passwordHash").is_none());
        assert!(json.get("password_hash").is_none());
        assert_eq!(json["ipAddress"], "127.0.0.1");
        assert_eq!(json["role"], "user");
        assert_eq!(json["id"], user.id.to_string());
    }
}
