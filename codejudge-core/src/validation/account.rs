//! Registration and login forms.

use serde::{Deserialize, Serialize};
use std::fmt;
use validator::Validate;

use crate::validation::field_errors::FieldErrors;

/// Body of `POST users/register/`.
#[derive(Clone, Default, Serialize, Deserialize, Validate)]
pub struct RegisterForm {
    #[validate(length(min = 1, message = "Username is required"))]
    pub username: String,

    #[validate(email(message = "Enter a valid email address"))]
    pub email: String,

    #[validate(length(min = 1, message = "Password is required"))]
    pub password: String,

    #[serde(rename = "confirmPassword")]
    #[validate(must_match(other = "password", message = "Passwords do not match"))]
    pub confirm_password: String,
}

impl RegisterForm {
    pub fn new(
        username: impl Into<String>,
        email: impl Into<String>,
        password: impl Into<String>,
        confirm_password: impl Into<String>,
    ) -> Self {
        Self {
            username: username.into(),
            email: email.into(),
            password: password.into(),
            confirm_password: confirm_password.into(),
        }
    }

    pub fn check(&self) -> Result<(), FieldErrors> {
        check_form(self)
    }
}

impl fmt::Debug for RegisterForm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RegisterForm")
            .field("username", &self.username)
            .field("email", &self.email)
            .field("password", &"***")
            .field("confirm_password", &"***")
            .finish()
    }
}

/// Body of `POST users/login/`.
#[derive(Clone, Default, Serialize, Deserialize, Validate)]
pub struct LoginForm {
    #[validate(length(min = 1, message = "Email is required"))]
    pub email: String,

    #[validate(length(min = 1, message = "Password is required"))]
    pub password: String,
}

impl LoginForm {
    pub fn new(email: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            email: email.into(),
            password: password.into(),
        }
    }

    pub fn check(&self) -> Result<(), FieldErrors> {
        check_form(self)
    }
}

impl fmt::Debug for LoginForm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LoginForm")
            .field("email", &self.email)
            .field("password", &"***")
            .finish()
    }
}

fn check_form<T: Validate>(form: &T) -> Result<(), FieldErrors> {
    form.validate().map_err(|e| FieldErrors::from(&e))
}
