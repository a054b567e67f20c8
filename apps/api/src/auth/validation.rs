use std::collections::BTreeMap;

use serde::Deserialize;

/// Field name → human-readable message, as rendered next to form inputs.
pub type FieldErrors = BTreeMap<&'static str, String>;

pub const MIN_PASSWORD_LEN: usize = 6;

pub const FULL_NAME_REQUIRED: &str = "Full Name is required.";
pub const EMAIL_INVALID: &str = "Valid email is required.";
pub const PASSWORD_TOO_SHORT: &str = "Password must be at least 6 characters.";
pub const PASSWORD_MISMATCH: &str = "Passwords do not match.";
pub const TERMS_REQUIRED: &str = "You must agree to the Terms of Service.";
pub const EMAIL_REQUIRED: &str = "Email is required.";
pub const PASSWORD_REQUIRED: &str = "Password is required.";
pub const EMAIL_EXISTS: &str = "Email already exists.";
pub const INVALID_CREDENTIALS: &str = "Invalid email or password.";

/// `POST /signup` form body. Every field is optional at the wire level so that
/// absent fields become field errors instead of extractor rejections.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SignupForm {
    pub full_name: Option<String>,
    pub email: Option<String>,
    pub password: Option<String>,
    pub confirm_password: Option<String>,
    /// Checkbox value; `"on"` when ticked.
    pub terms: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
pub struct LoginForm {
    pub email: Option<String>,
    pub password: Option<String>,
}

/// A signup that passed form validation.
#[derive(Debug, Clone)]
pub struct NewUser {
    pub full_name: String,
    pub email: String,
    pub password: String,
}

#[derive(Debug, Clone)]
pub struct Credentials {
    pub email: String,
    pub password: String,
}

fn present(value: &Option<String>) -> Option<&str> {
    value.as_deref().filter(|v| !v.trim().is_empty())
}

impl SignupForm {
    /// Collects every failing field before returning.
    pub fn validate(self) -> Result<NewUser, FieldErrors> {
        let mut errors = FieldErrors::new();

        if present(&self.full_name).is_none() {
            errors.insert("fullName", FULL_NAME_REQUIRED.to_string());
        }
        if !present(&self.email).is_some_and(|e| e.contains('@')) {
            errors.insert("email", EMAIL_INVALID.to_string());
        }
        let password_len = self.password.as_deref().map_or(0, |p| p.chars().count());
        if password_len < MIN_PASSWORD_LEN {
            errors.insert("password", PASSWORD_TOO_SHORT.to_string());
        }
        if self.password != self.confirm_password {
            errors.insert("confirmPassword", PASSWORD_MISMATCH.to_string());
        }
        if self.terms.as_deref() != Some("on") {
            errors.insert("terms", TERMS_REQUIRED.to_string());
        }

        match (self.full_name, self.email, self.password) {
            (Some(full_name), Some(email), Some(password)) if errors.is_empty() => Ok(NewUser {
                full_name: full_name.trim().to_string(),
                email,
                password,
            }),
            _ => Err(errors),
        }
    }
}

impl LoginForm {
    pub fn validate(self) -> Result<Credentials, FieldErrors> {
        let mut errors = FieldErrors::new();

        if present(&self.email).is_none() {
            errors.insert("email", EMAIL_REQUIRED.to_string());
        }
        if self.password.as_deref().map_or(true, str::is_empty) {
            errors.insert("password", PASSWORD_REQUIRED.to_string());
        }

        match (self.email, self.password) {
            (Some(email), Some(password)) if errors.is_empty() => {
                Ok(Credentials { email, password })
            }
            _ => Err(errors),
        }
    }
}
