use chrono::{DateTime, Utc};
use lazy_static::lazy_static;
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::{Validate, ValidationError};

use super::deserialize_some;

lazy_static! {
    // Digits with the usual separators, optionally a leading '+'.
    static ref PHONE_REGEX: regex::Regex = regex::Regex::new(r"^\+?[0-9 ()./-]{3,32}$").unwrap();
}

/// The fixed role assigned to every user.
#[derive(Debug, Default, Serialize, Deserialize, Clone, Copy, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    /// Full access, including editing other users.
    Admin,
    /// Sees and manages every task.
    Manager,
    /// Sees only the tasks assigned to them.
    #[default]
    Employee,
}

/// A user as returned by the API. The password hash lives only on [`UserRecord`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct User {
    pub id: String,
    pub email: String,
    pub full_name: String,
    #[serde(default)]
    pub role: Role,
    #[serde(default)]
    pub department: Option<String>,
    #[serde(default)]
    pub phone: Option<String>,
    pub created_at: DateTime<Utc>,
    #[serde(default = "default_active")]
    pub is_active: bool,
}

fn default_active() -> bool {
    true
}

/// A user as stored in the `users` collection.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UserRecord {
    #[serde(flatten)]
    pub user: User,
    pub hashed_password: String,
}

impl UserRecord {
    /// Builds a fresh, active user from a registration request and an already
    /// hashed password.
    pub fn new(request: RegisterRequest, hashed_password: String) -> Self {
        Self {
            user: User {
                id: Uuid::new_v4().to_string(),
                email: request.email,
                full_name: request.full_name,
                role: request.role.unwrap_or_default(),
                department: request.department,
                phone: request.phone,
                created_at: Utc::now(),
                is_active: true,
            },
            hashed_password,
        }
    }
}

/// Payload for `POST /api/auth/register`.
#[derive(Debug, Deserialize, Validate)]
pub struct RegisterRequest {
    #[validate(email(message = "Invalid email address"))]
    pub email: String,
    #[validate(length(min = 1, max = 100))]
    pub full_name: String,
    pub role: Option<Role>,
    #[validate(length(max = 100))]
    pub department: Option<String>,
    #[validate(regex(path = "PHONE_REGEX", message = "Invalid phone number"))]
    pub phone: Option<String>,
    #[validate(length(min = 6, message = "Password must be at least 6 characters"))]
    pub password: String,
}

/// Payload for `POST /api/auth/login`.
#[derive(Debug, Deserialize, Validate)]
pub struct LoginRequest {
    #[validate(email(message = "Invalid email address"))]
    pub email: String,
    #[validate(length(min = 1))]
    pub password: String,
}

/// Partial profile update for `PUT /api/users/{id}`.
///
/// Absent fields are left alone. `department` and `phone` distinguish an absent
/// field (`None`) from an explicit `null` (`Some(None)`), which clears the value.
#[derive(Debug, Default, Serialize, Deserialize, Validate)]
#[validate(schema(function = "validate_user_update"))]
pub struct UserUpdate {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[validate(email(message = "Invalid email address"))]
    pub email: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[validate(length(min = 1, max = 100))]
    pub full_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub role: Option<Role>,
    #[serde(
        default,
        deserialize_with = "deserialize_some",
        skip_serializing_if = "Option::is_none"
    )]
    pub department: Option<Option<String>>,
    #[serde(
        default,
        deserialize_with = "deserialize_some",
        skip_serializing_if = "Option::is_none"
    )]
    pub phone: Option<Option<String>>,
}

fn validate_user_update(update: &UserUpdate) -> Result<(), ValidationError> {
    if let Some(Some(department)) = &update.department {
        if department.chars().count() > 100 {
            return Err(ValidationError::new("department_too_long"));
        }
    }
    if let Some(Some(phone)) = &update.phone {
        if !PHONE_REGEX.is_match(phone) {
            return Err(ValidationError::new("invalid_phone"));
        }
    }
    Ok(())
}
