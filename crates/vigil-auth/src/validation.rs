//! Login and signup form validation
//!
//! Validation is synchronous and runs before any state change. The sentinel
//! form stops at the first failure; the demo and signup forms report every
//! failed field at once.

use regex::Regex;
use serde::{Deserialize, Serialize};
use vigil_config::{AuthConfig, AuthMode};
use vigil_core::{Error, FieldError, Result};

/// Minimum password length on the signup form
pub const SIGNUP_MIN_PASSWORD_LENGTH: usize = 8;

const EMAIL_PATTERN: &str = r"\S+@\S+\.\S+";

/// Login form submission
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LoginRequest {
    /// Email address
    pub email: String,
    /// Password
    pub password: String,
    /// CAPTCHA token; only its presence is checked
    pub captcha: Option<String>,
}

impl LoginRequest {
    /// Build a request
    pub fn new(
        email: impl Into<String>,
        password: impl Into<String>,
        captcha: Option<&str>,
    ) -> Self {
        Self {
            email: email.into(),
            password: password.into(),
            captcha: captcha.map(str::to_string),
        }
    }
}

/// Signup form submission
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SignupForm {
    /// Full name
    pub full_name: String,
    /// Company name
    pub company: String,
    /// Email address
    pub email: String,
    /// Password
    pub password: String,
    /// Password confirmation
    pub confirm_password: String,
    /// CAPTCHA token
    pub captcha: Option<String>,
}

/// Rules applied to a login submission
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoginPolicy {
    /// Active login mode
    pub mode: AuthMode,
    /// Email granted the admin role
    pub admin_email: String,
    /// Only accepted email in demo mode
    pub demo_email: String,
    /// Only accepted password in demo mode
    pub demo_password: String,
    /// Minimum password length
    pub min_password_length: usize,
}

impl LoginPolicy {
    /// Derive the policy from configuration
    pub fn from_config(config: &AuthConfig) -> Self {
        Self {
            mode: config.mode,
            admin_email: config.admin_email.clone(),
            demo_email: config.demo_email.clone(),
            demo_password: config.demo_password.clone(),
            min_password_length: config.effective_min_password_length(),
        }
    }
}

impl Default for LoginPolicy {
    fn default() -> Self {
        Self::from_config(&AuthConfig::default())
    }
}

fn has_captcha(captcha: Option<&String>) -> bool {
    captcha.is_some_and(|token| !token.trim().is_empty())
}

fn email_pattern() -> Result<Regex> {
    Regex::new(EMAIL_PATTERN).map_err(|e| Error::Internal(format!("Invalid email pattern: {e}")))
}

fn check_email(email: &str, errors: &mut Vec<FieldError>) -> Result<()> {
    if email.is_empty() {
        errors.push(FieldError::new("email", "Email is required"));
    } else if !email_pattern()?.is_match(email) {
        errors.push(FieldError::new("email", "Email is invalid"));
    }
    Ok(())
}

fn check_password(password: &str, min: usize, errors: &mut Vec<FieldError>) {
    if password.is_empty() {
        errors.push(FieldError::new("password", "Password is required"));
    } else if password.chars().count() < min {
        errors.push(FieldError::new(
            "password",
            format!("Password must be at least {min} characters"),
        ));
    }
}

fn finish(errors: Vec<FieldError>) -> Result<()> {
    if errors.is_empty() {
        Ok(())
    } else {
        Err(Error::Validation(errors))
    }
}

/// Validate a login submission against `policy`.
///
/// Returns [`Error::Validation`] for malformed input and, in demo mode,
/// [`Error::Authentication`] when the pair is not the demo account.
pub fn validate_login(policy: &LoginPolicy, request: &LoginRequest) -> Result<()> {
    match policy.mode {
        AuthMode::Sentinel => validate_sentinel(policy, request),
        AuthMode::Demo => validate_demo(policy, request),
    }
}

fn validate_sentinel(policy: &LoginPolicy, request: &LoginRequest) -> Result<()> {
    if !has_captcha(request.captcha.as_ref()) {
        return Err(Error::validation(
            "captcha",
            "Please verify that you are not a robot.",
        ));
    }
    if request.email.trim().is_empty() {
        return Err(Error::validation("email", "Email is required"));
    }
    if request.password.chars().count() < policy.min_password_length {
        return Err(Error::validation(
            "password",
            format!(
                "Password must be at least {} characters",
                policy.min_password_length
            ),
        ));
    }
    Ok(())
}

fn validate_demo(policy: &LoginPolicy, request: &LoginRequest) -> Result<()> {
    let mut errors = Vec::new();
    check_email(&request.email, &mut errors)?;
    check_password(&request.password, policy.min_password_length, &mut errors);
    if !has_captcha(request.captcha.as_ref()) {
        errors.push(FieldError::new(
            "captcha",
            "Please verify that you are not a robot",
        ));
    }
    finish(errors)?;

    if request.email != policy.demo_email || request.password != policy.demo_password {
        return Err(Error::Authentication(
            "Invalid demo credentials. Please use the demo account.".to_string(),
        ));
    }
    Ok(())
}

/// Validate a signup submission, reporting every failed field
pub fn validate_signup(form: &SignupForm) -> Result<()> {
    let mut errors = Vec::new();
    check_email(&form.email, &mut errors)?;
    check_password(&form.password, SIGNUP_MIN_PASSWORD_LENGTH, &mut errors);

    if form.full_name.trim().is_empty() {
        errors.push(FieldError::new("fullName", "Full name is required"));
    }
    if form.company.trim().is_empty() {
        errors.push(FieldError::new("company", "Company name is required"));
    }
    if form.password != form.confirm_password {
        errors.push(FieldError::new("confirmPassword", "Passwords do not match"));
    }
    if !has_captcha(form.captcha.as_ref()) {
        errors.push(FieldError::new(
            "captcha",
            "Please verify that you are not a robot",
        ));
    }

    finish(errors)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sentinel() -> LoginPolicy {
        LoginPolicy::default()
    }

    fn demo() -> LoginPolicy {
        LoginPolicy::from_config(&AuthConfig {
            mode: AuthMode::Demo,
            ..AuthConfig::default()
        })
    }

    fn signup_form() -> SignupForm {
        SignupForm {
            full_name: "Ada Lovelace".to_string(),
            company: "CoreTechIT PLC".to_string(),
            email: "ada@example.com".to_string(),
            password: "analytical".to_string(),
            confirm_password: "analytical".to_string(),
            captcha: Some("token".to_string()),
        }
    }

    #[test]
    fn test_sentinel_accepts_six_characters() {
        let req = LoginRequest::new("ops@example.com", "secret", Some("token"));
        assert!(validate_login(&sentinel(), &req).is_ok());
    }

    #[test]
    fn test_sentinel_rejects_five_characters() {
        let req = LoginRequest::new("ops@example.com", "short", Some("token"));
        let err = validate_login(&sentinel(), &req).unwrap_err();
        assert_eq!(
            err.field_message("password"),
            Some("Password must be at least 6 characters")
        );
    }

    #[test]
    fn test_sentinel_checks_captcha_first() {
        for captcha in [None, Some(""), Some("   ")] {
            let req = LoginRequest::new("", "x", captcha);
            let err = validate_login(&sentinel(), &req).unwrap_err();
            assert_eq!(err.field_errors().len(), 1);
            assert_eq!(
                err.inline_message(),
                "Please verify that you are not a robot."
            );
        }
    }

    #[test]
    fn test_demo_collects_every_field() {
        let req = LoginRequest::new("not-an-email", "short", None);
        let err = validate_login(&demo(), &req).unwrap_err();
        assert_eq!(err.field_message("email"), Some("Email is invalid"));
        assert_eq!(
            err.field_message("password"),
            Some("Password must be at least 8 characters")
        );
        assert!(err.field_message("captcha").is_some());
    }

    #[test]
    fn test_demo_requires_email_and_password() {
        let req = LoginRequest::new("", "", Some("t"));
        let err = validate_login(&demo(), &req).unwrap_err();
        assert_eq!(err.field_message("email"), Some("Email is required"));
        assert_eq!(err.field_message("password"), Some("Password is required"));
    }

    #[test]
    fn test_demo_rejects_other_accounts() {
        let req = LoginRequest::new("someone@example.com", "Password1", Some("t"));
        let err = validate_login(&demo(), &req).unwrap_err();
        assert!(matches!(err, Error::Authentication(_)));
        assert_eq!(
            err.inline_message(),
            "Invalid demo credentials. Please use the demo account."
        );
    }

    #[test]
    fn test_demo_accepts_demo_account() {
        let req = LoginRequest::new("demo@coretechitplc.com", "Demo@12345", Some("t"));
        assert!(validate_login(&demo(), &req).is_ok());
    }

    #[test]
    fn test_min_length_override() {
        let policy = LoginPolicy::from_config(&AuthConfig {
            min_password_length: Some(12),
            ..AuthConfig::default()
        });
        let req = LoginRequest::new("ops@example.com", "elevenchars", Some("t"));
        assert!(validate_login(&policy, &req).is_err());
    }

    #[test]
    fn test_signup_valid() {
        assert!(validate_signup(&signup_form()).is_ok());
    }

    #[test]
    fn test_signup_reports_all_failures() {
        let form = SignupForm {
            full_name: String::new(),
            company: " ".to_string(),
            confirm_password: "different".to_string(),
            captcha: None,
            ..signup_form()
        };
        let err = validate_signup(&form).unwrap_err();
        assert_eq!(err.field_message("fullName"), Some("Full name is required"));
        assert_eq!(err.field_message("company"), Some("Company name is required"));
        assert_eq!(
            err.field_message("confirmPassword"),
            Some("Passwords do not match")
        );
        assert!(err.field_message("captcha").is_some());
        assert_eq!(err.field_errors().len(), 4);
    }
}
