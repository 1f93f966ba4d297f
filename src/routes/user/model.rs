use serde::{Deserialize, Serialize};

use crate::models::User;
use crate::validation::{Constraint, ValidationErrors, check_length};

const PASSWORD_MIN_CHARS: usize = 8;
const PASSWORD_MAX_CHARS: usize = 50;

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RegisterRequest {
    #[serde(default)]
    pub name: Option<String>,
    pub email: String,
    pub password: String,
    pub confirm_password: String,
    #[serde(default)]
    pub household_id: Option<String>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RegisterResponse {
    pub id: String,
    pub name: Option<String>,
    pub email: String,
    pub household_id: Option<String>,
}

impl From<User> for RegisterResponse {
    fn from(user: User) -> Self {
        Self {
            id: user.id,
            name: user.name,
            email: user.email,
            household_id: user.household_id,
        }
    }
}

impl RegisterRequest {
    pub fn validate(&self) -> Result<(), ValidationErrors> {
        let mut errors = ValidationErrors::new();

        if !looks_like_email(&self.email) {
            errors.add("email", Constraint::InvalidFormat, "Invalid email");
        }

        for (path, value) in [
            ("password", &self.password),
            ("confirmPassword", &self.confirm_password),
        ] {
            check_length(
                &mut errors,
                path,
                value,
                Some((
                    PASSWORD_MIN_CHARS,
                    "String must contain at least 8 character(s)",
                )),
                Some((
                    PASSWORD_MAX_CHARS,
                    "String must contain at most 50 character(s)",
                )),
            );
        }

        if self.password != self.confirm_password {
            errors.add("confirmPassword", Constraint::Mismatch, "Passwords don't match");
        }

        errors.into_result(())
    }
}

// local@domain.tld，不含空白
fn looks_like_email(email: &str) -> bool {
    if email.chars().any(char::is_whitespace) {
        return false;
    }
    let Some((local, domain)) = email.split_once('@') else {
        return false;
    };
    !local.is_empty()
        && !domain.contains('@')
        && domain
            .split_once('.')
            .is_some_and(|(host, tld)| !host.is_empty() && !tld.is_empty() && !tld.ends_with('.'))
}
