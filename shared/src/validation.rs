//! Client-side form checks. Nothing in here touches the network; a form
//! with violations is never submitted.

use std::fmt;

use thiserror::Error;

use crate::models::{ConstructionTimeline, LoginRequest, NewBooking, PlotOwnership, RegisterRequest};

/// Minimum password length accepted at registration.
pub const MIN_PASSWORD_LEN: usize = 7;
/// Characters that satisfy the special-character rule.
pub const PASSWORD_SPECIALS: &str = "@$!%*?&";

/// Form field a violation points at.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Field {
    /// Email input.
    Email,
    /// Password input.
    Password,
    /// Password confirmation input.
    ConfirmPassword,
    /// Full name input.
    FullName,
    /// Mobile number input.
    MobileNumber,
    /// Construction timeline select.
    ConstructionTime,
    /// Plot ownership radio.
    OwnPlot,
    /// Terms checkbox.
    Terms,
    /// Whole-form problems such as "please fill in all fields".
    Form,
}

/// One failed check.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{message}")]
pub struct ValidationError {
    /// Offending input.
    pub field: Field,
    /// Text shown to the user.
    pub message: String,
}

impl ValidationError {
    /// Violation of `field`.
    pub fn new(field: Field, message: impl Into<String>) -> Self {
        Self {
            field,
            message: message.into(),
        }
    }
}

/// Password complexity rules, reported individually.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PasswordViolation {
    /// Fewer than [`MIN_PASSWORD_LEN`] characters.
    TooShort,
    /// No ASCII lowercase letter.
    MissingLowercase,
    /// No ASCII uppercase letter.
    MissingUppercase,
    /// No ASCII digit.
    MissingDigit,
    /// None of [`PASSWORD_SPECIALS`].
    MissingSpecial,
}

impl PasswordViolation {
    /// Text shown under the password field.
    pub fn message(&self) -> &'static str {
        match self {
            PasswordViolation::TooShort => "Password must be at least 7 characters long",
            PasswordViolation::MissingLowercase => {
                "Password must contain at least one lowercase letter"
            },
            PasswordViolation::MissingUppercase => {
                "Password must contain at least one uppercase letter"
            },
            PasswordViolation::MissingDigit => "Password must contain at least one number",
            PasswordViolation::MissingSpecial => {
                "Password must contain at least one special character"
            },
        }
    }
}

impl fmt::Display for PasswordViolation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.message())
    }
}

/// Every rule `password` breaks, in the order the register form lists them.
pub fn validate_password(password: &str) -> Vec<PasswordViolation> {
    let mut violations = Vec::new();
    if password.chars().count() < MIN_PASSWORD_LEN {
        violations.push(PasswordViolation::TooShort);
    }
    if !password.chars().any(|c| c.is_ascii_lowercase()) {
        violations.push(PasswordViolation::MissingLowercase);
    }
    if !password.chars().any(|c| c.is_ascii_uppercase()) {
        violations.push(PasswordViolation::MissingUppercase);
    }
    if !password.chars().any(|c| c.is_ascii_digit()) {
        violations.push(PasswordViolation::MissingDigit);
    }
    if !password.chars().any(|c| PASSWORD_SPECIALS.contains(c)) {
        violations.push(PasswordViolation::MissingSpecial);
    }
    violations
}

fn blank(value: &str) -> bool {
    value.trim().is_empty()
}

/// Admin login inputs.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LoginForm {
    /// Email input.
    pub email: String,
    /// Password input.
    pub password: String,
}

impl LoginForm {
    /// Both fields are required.
    pub fn validate(&self) -> Vec<ValidationError> {
        let mut errors = Vec::new();
        if blank(&self.email) {
            errors.push(ValidationError::new(Field::Email, "Please enter your email"));
        }
        if self.password.is_empty() {
            errors.push(ValidationError::new(Field::Password, "Please enter your password"));
        }
        errors
    }

    /// Request body for a valid form.
    pub fn to_request(&self) -> Result<LoginRequest, Vec<ValidationError>> {
        let errors = self.validate();
        if !errors.is_empty() {
            return Err(errors);
        }
        Ok(LoginRequest {
            email: self.email.trim().to_string(),
            password: self.password.clone(),
        })
    }
}

/// Admin registration inputs.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RegisterForm {
    /// Email input.
    pub email: String,
    /// Password input.
    pub password: String,
    /// Password confirmation input.
    pub confirm_password: String,
}

impl RegisterForm {
    /// Required fields first, then password rules, then the match check.
    pub fn validate(&self) -> Vec<ValidationError> {
        if blank(&self.email) || self.password.is_empty() || self.confirm_password.is_empty() {
            return vec![ValidationError::new(Field::Form, "Please fill in all fields")];
        }
        let mut errors: Vec<ValidationError> = validate_password(&self.password)
            .into_iter()
            .map(|violation| ValidationError::new(Field::Password, violation.message()))
            .collect();
        if self.password != self.confirm_password {
            errors.push(ValidationError::new(Field::ConfirmPassword, "Passwords do not match"));
        }
        errors
    }

    /// Request body for a valid form.
    pub fn to_request(&self) -> Result<RegisterRequest, Vec<ValidationError>> {
        let errors = self.validate();
        if !errors.is_empty() {
            return Err(errors);
        }
        Ok(RegisterRequest {
            email: self.email.trim().to_string(),
            password: self.password.clone(),
            confirm_password: self.confirm_password.clone(),
        })
    }
}

/// Keep ASCII digits only; applied on every keystroke of the mobile field.
pub fn sanitize_mobile(raw: &str) -> String {
    raw.chars().filter(char::is_ascii_digit).collect()
}

/// Public "book a meeting" inputs.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BookingForm {
    /// Full name input.
    pub full_name: String,
    /// Email input.
    pub email: String,
    /// Digits only; see [`Self::set_mobile_number`].
    pub mobile_number: String,
    /// Timeline select; `None` until chosen.
    pub construction_time: Option<ConstructionTimeline>,
    /// Plot radio; `None` until chosen.
    pub own_plot: Option<PlotOwnership>,
    /// Terms checkbox.
    pub agree_to_terms: bool,
}

impl BookingForm {
    /// Store a mobile number with non-digits stripped.
    pub fn set_mobile_number(&mut self, raw: &str) {
        self.mobile_number = sanitize_mobile(raw);
    }

    /// Every field is required and the terms must be accepted.
    pub fn validate(&self) -> Vec<ValidationError> {
        let mut errors = Vec::new();
        if blank(&self.full_name) {
            errors.push(ValidationError::new(Field::FullName, "Full name is required"));
        }
        if blank(&self.email) {
            errors.push(ValidationError::new(Field::Email, "Email address is required"));
        }
        if self.mobile_number.is_empty() {
            errors.push(ValidationError::new(Field::MobileNumber, "Mobile number is required"));
        }
        if self.construction_time.is_none() {
            errors.push(ValidationError::new(
                Field::ConstructionTime,
                "Please select a construction timeline",
            ));
        }
        if self.own_plot.is_none() {
            errors.push(ValidationError::new(Field::OwnPlot, "Please tell us if you own a plot"));
        }
        if !self.agree_to_terms {
            errors.push(ValidationError::new(Field::Terms, "Please agree to the terms"));
        }
        errors
    }

    /// Summary shown above the form when anything is missing.
    pub fn summary_message() -> &'static str {
        "Please fill in all required fields and agree to terms."
    }

    /// Request body for a valid form.
    pub fn to_request(&self) -> Result<NewBooking, Vec<ValidationError>> {
        let errors = self.validate();
        match (&self.construction_time, self.own_plot) {
            (Some(timeline), Some(own_plot)) if errors.is_empty() => Ok(NewBooking {
                name: self.full_name.trim().to_string(),
                email: self.email.trim().to_string(),
                mobile_number: self.mobile_number.clone(),
                construction_timeline: timeline.clone(),
                own_plot_of_land: own_plot,
            }),
            _ => Err(errors),
        }
    }
}
