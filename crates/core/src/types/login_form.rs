//! Sign-in form and its client-side validation.

use core::fmt;

/// Username and password as typed into the sign-in form.
///
/// Fields are kept exactly as entered. Validation trims only to decide
/// whether a field is blank; the untrimmed values are what gets submitted.
///
/// Implements `Debug` manually to redact the password.
///
/// ## Examples
///
/// ```
/// use shopfront_core::LoginForm;
///
/// assert!(LoginForm::new("mor_2314", "83r5^_").validate().is_ok());
///
/// let errors = LoginForm::new("  ", "").validate().unwrap_err();
/// assert_eq!(errors.username.as_deref(), Some("Username is required"));
/// assert_eq!(errors.password.as_deref(), Some("Password is required"));
/// ```
#[derive(Clone, Default, PartialEq, Eq)]
pub struct LoginForm {
    pub username: String,
    pub password: String,
}

/// Per-field validation messages for [`LoginForm`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LoginFormErrors {
    pub username: Option<String>,
    pub password: Option<String>,
}

impl LoginForm {
    #[must_use]
    pub fn new(username: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            username: username.into(),
            password: password.into(),
        }
    }

    /// Validate the form before any network call is made.
    ///
    /// # Errors
    ///
    /// Returns [`LoginFormErrors`] naming every blank field.
    pub fn validate(&self) -> Result<(), LoginFormErrors> {
        let mut errors = LoginFormErrors::default();

        if self.username.trim().is_empty() {
            errors.username = Some("Username is required".to_string());
        }

        if self.password.trim().is_empty() {
            errors.password = Some("Password is required".to_string());
        }

        if errors.is_empty() {
            Ok(())
        } else {
            Err(errors)
        }
    }
}

impl fmt::Debug for LoginForm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LoginForm")
            .field("username", &self.username)
            .field("password", &"[REDACTED]")
            .finish()
    }
}

impl LoginFormErrors {
    /// True when no field has an error.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.username.is_none() && self.password.is_none()
    }

    /// `(field, message)` pairs in form order.
    pub fn fields(&self) -> impl Iterator<Item = (&'static str, &str)> {
        [
            ("username", self.username.as_deref()),
            ("password", self.password.as_deref()),
        ]
        .into_iter()
        .filter_map(|(field, message)| message.map(|m| (field, m)))
    }
}

impl fmt::Display for LoginFormErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let summary = self
            .fields()
            .map(|(_, message)| message)
            .collect::<Vec<_>>()
            .join("; ");
        f.write_str(&summary)
    }
}

impl std::error::Error for LoginFormErrors {}
