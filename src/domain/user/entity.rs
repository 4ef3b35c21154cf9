//! User entity and related types

use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::validation::UserValidationError;

/// User identifier assigned by the record store
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct UserId(i64);

impl UserId {
    pub fn new(id: i64) -> Self {
        Self(id)
    }

    pub fn value(&self) -> i64 {
        self.0
    }
}

impl FromStr for UserId {
    type Err = UserValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        s.trim()
            .parse::<i64>()
            .map(Self)
            .map_err(|_| UserValidationError::InvalidId(s.to_string()))
    }
}

impl From<i64> for UserId {
    fn from(id: i64) -> Self {
        Self(id)
    }
}

impl std::fmt::Display for UserId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Kind of account
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum UserType {
    #[default]
    Passenger,
    Rider,
    Admin,
}

impl UserType {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Passenger => "passenger",
            Self::Rider => "rider",
            Self::Admin => "admin",
        }
    }
}

impl FromStr for UserType {
    type Err = UserValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "passenger" => Ok(Self::Passenger),
            "rider" => Ok(Self::Rider),
            "admin" => Ok(Self::Admin),
            other => Err(UserValidationError::InvalidUserType(other.to_string())),
        }
    }
}

/// Validated data for a user that has not been stored yet
#[derive(Debug, Clone)]
pub struct NewUser {
    pub email: String,
    pub first_name: String,
    pub last_name: String,
    pub phone_number: Option<String>,
    pub user_type: UserType,
    pub password_hash: String,
}

/// Validated partial changes to an existing user
#[derive(Debug, Clone, Default)]
pub struct UserChanges {
    pub email: Option<String>,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    /// `Some(None)` clears the phone number
    pub phone_number: Option<Option<String>>,
    pub user_type: Option<UserType>,
    pub is_active: Option<bool>,
    pub password_hash: Option<String>,
}

/// User record owned by the record store
#[derive(Debug, Clone)]
pub struct User {
    id: UserId,
    email: String,
    first_name: String,
    last_name: String,
    phone_number: Option<String>,
    user_type: UserType,
    is_active: bool,
    password_hash: String,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl User {
    /// Materializes a new user under the id the store assigned
    pub fn from_new(id: UserId, data: NewUser) -> Self {
        let now = Utc::now();

        Self {
            id,
            email: data.email,
            first_name: data.first_name,
            last_name: data.last_name,
            phone_number: data.phone_number,
            user_type: data.user_type,
            is_active: true,
            password_hash: data.password_hash,
            created_at: now,
            updated_at: now,
        }
    }

    /// Rebuilds a user from persisted columns
    #[allow(clippy::too_many_arguments)]
    pub fn from_parts(
        id: UserId,
        email: String,
        first_name: String,
        last_name: String,
        phone_number: Option<String>,
        user_type: UserType,
        is_active: bool,
        password_hash: String,
        created_at: DateTime<Utc>,
        updated_at: DateTime<Utc>,
    ) -> Self {
        Self {
            id,
            email,
            first_name,
            last_name,
            phone_number,
            user_type,
            is_active,
            password_hash,
            created_at,
            updated_at,
        }
    }

    // Getters

    pub fn id(&self) -> UserId {
        self.id
    }

    pub fn email(&self) -> &str {
        &self.email
    }

    pub fn first_name(&self) -> &str {
        &self.first_name
    }

    pub fn last_name(&self) -> &str {
        &self.last_name
    }

    pub fn phone_number(&self) -> Option<&str> {
        self.phone_number.as_deref()
    }

    pub fn user_type(&self) -> UserType {
        self.user_type
    }

    pub fn is_active(&self) -> bool {
        self.is_active
    }

    pub fn password_hash(&self) -> &str {
        &self.password_hash
    }

    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    pub fn updated_at(&self) -> DateTime<Utc> {
        self.updated_at
    }

    /// Applies partial changes and bumps `updated_at`
    pub fn apply(&mut self, changes: &UserChanges) {
        if let Some(email) = &changes.email {
            self.email = email.clone();
        }

        if let Some(first_name) = &changes.first_name {
            self.first_name = first_name.clone();
        }

        if let Some(last_name) = &changes.last_name {
            self.last_name = last_name.clone();
        }

        if let Some(phone_number) = &changes.phone_number {
            self.phone_number = phone_number.clone();
        }

        if let Some(user_type) = changes.user_type {
            self.user_type = user_type;
        }

        if let Some(is_active) = changes.is_active {
            self.is_active = is_active;
        }

        if let Some(hash) = &changes.password_hash {
            self.password_hash = hash.clone();
        }

        self.updated_at = Utc::now();
    }
}

/// Public, cacheable representation of a user
///
/// This is exactly what the HTTP layer returns, so cached values can be
/// served verbatim. The password hash never appears here.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserResource {
    pub id: UserId,
    pub email: String,
    pub first_name: String,
    pub last_name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub phone_number: Option<String>,
    pub user_type: UserType,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<&User> for UserResource {
    fn from(user: &User) -> Self {
        Self {
            id: user.id(),
            email: user.email().to_string(),
            first_name: user.first_name().to_string(),
            last_name: user.last_name().to_string(),
            phone_number: user.phone_number().map(String::from),
            user_type: user.user_type(),
            is_active: user.is_active(),
            created_at: user.created_at(),
            updated_at: user.updated_at(),
        }
    }
}
