//! User validation utilities

use once_cell::sync::Lazy;
use regex::Regex;
use thiserror::Error;

/// Errors that can occur during user validation
#[derive(Debug, Error, Clone, PartialEq)]
pub enum UserValidationError {
    #[error("Invalid user ID '{0}': expected an integer")]
    InvalidId(String),

    #[error("Email cannot be empty")]
    EmptyEmail,

    #[error("Email exceeds maximum length of {0} characters")]
    EmailTooLong(usize),

    #[error("Enter a valid email address")]
    InvalidEmail,

    #[error("{0} cannot be empty")]
    EmptyName(&'static str),

    #[error("{0} exceeds maximum length of {1} characters")]
    NameTooLong(&'static str, usize),

    #[error("Password is too short. Minimum length is {0} characters")]
    PasswordTooShort(usize),

    #[error("Password exceeds maximum length of {0} characters")]
    PasswordTooLong(usize),

    #[error("Password is required")]
    PasswordRequired,

    #[error("Phone number must be between {0} and {1} characters")]
    PhoneNumberLength(usize, usize),

    #[error("Phone number contains invalid character: '{0}'")]
    InvalidPhoneCharacter(char),

    #[error("Unknown user type '{0}'. Valid types: passenger, rider, admin")]
    InvalidUserType(String),
}

const MAX_EMAIL_LENGTH: usize = 254;
const MAX_NAME_LENGTH: usize = 150;
const MIN_PASSWORD_LENGTH: usize = 8;
const MAX_PASSWORD_LENGTH: usize = 128;
const MIN_PHONE_LENGTH: usize = 7;
const MAX_PHONE_LENGTH: usize = 20;

static EMAIL_REGEX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^[^@\s]+@[^@\s]+\.[^@\s]+$").expect("email regex is valid")
});

/// Validate an email address
///
/// Rules:
/// - Cannot be empty
/// - Maximum 254 characters
/// - Shape `local@domain.tld` with no whitespace
pub fn validate_email(email: &str) -> Result<(), UserValidationError> {
    if email.is_empty() {
        return Err(UserValidationError::EmptyEmail);
    }

    if email.len() > MAX_EMAIL_LENGTH {
        return Err(UserValidationError::EmailTooLong(MAX_EMAIL_LENGTH));
    }

    if !EMAIL_REGEX.is_match(email) {
        return Err(UserValidationError::InvalidEmail);
    }

    Ok(())
}

/// Validate a first or last name
pub fn validate_name(field: &'static str, value: &str) -> Result<(), UserValidationError> {
    if value.trim().is_empty() {
        return Err(UserValidationError::EmptyName(field));
    }

    if value.chars().count() > MAX_NAME_LENGTH {
        return Err(UserValidationError::NameTooLong(field, MAX_NAME_LENGTH));
    }

    Ok(())
}

/// Validate a password
///
/// Rules:
/// - Minimum 8 characters
/// - Maximum 128 characters
pub fn validate_password(password: &str) -> Result<(), UserValidationError> {
    if password.len() < MIN_PASSWORD_LENGTH {
        return Err(UserValidationError::PasswordTooShort(MIN_PASSWORD_LENGTH));
    }

    if password.len() > MAX_PASSWORD_LENGTH {
        return Err(UserValidationError::PasswordTooLong(MAX_PASSWORD_LENGTH));
    }

    Ok(())
}

/// Validate a phone number: digits, spaces, `+` and `-` only
pub fn validate_phone_number(phone: &str) -> Result<(), UserValidationError> {
    if phone.len() < MIN_PHONE_LENGTH || phone.len() > MAX_PHONE_LENGTH {
        return Err(UserValidationError::PhoneNumberLength(
            MIN_PHONE_LENGTH,
            MAX_PHONE_LENGTH,
        ));
    }

    for c in phone.chars() {
        if !c.is_ascii_digit() && c != ' ' && c != '+' && c != '-' {
            return Err(UserValidationError::InvalidPhoneCharacter(c));
        }
    }

    Ok(())
}
