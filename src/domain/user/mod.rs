//! User domain
//!
//! Domain types and the repository trait for the user resource, the
//! authoritative records that the cache layer accelerates reads of.

mod entity;
mod repository;
mod validation;

pub use entity::{NewUser, User, UserChanges, UserId, UserResource, UserType};
pub use repository::UserRepository;
pub use validation::{
    validate_email, validate_name, validate_password, validate_phone_number, UserValidationError,
};

#[cfg(test)]
pub use repository::mock::MockUserRepository;
