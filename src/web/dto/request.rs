//! Request DTOs for Web API.

use serde::Deserialize;
use validator::{Validate, ValidateEmail, ValidationError, ValidationErrors};

/// Newsletter subscription request.
#[derive(Debug, Clone, Deserialize)]
pub struct SubscribeRequest {
    /// Email address to subscribe.
    #[serde(default)]
    pub email: Option<String>,
}

impl SubscribeRequest {
    /// The trimmed email, or `None` if it is missing or blank.
    pub fn email(&self) -> Option<&str> {
        self.email
            .as_deref()
            .map(str::trim)
            .filter(|e| !e.is_empty())
    }
}

impl Validate for SubscribeRequest {
    // A blank email is not a format error; the handler reports it as missing.
    fn validate(&self) -> Result<(), ValidationErrors> {
        let mut errors = ValidationErrors::new();

        if let Some(email) = self.email() {
            if !email.validate_email() {
                errors.add(
                    "email",
                    ValidationError::new("email").with_message("Invalid email address".into()),
                );
            }
        }

        if errors.is_empty() {
            Ok(())
        } else {
            Err(errors)
        }
    }
}
