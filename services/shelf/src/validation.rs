//! Form input validation
//!
//! Only presence and basic format are checked. In particular there is no
//! password strength rule: any non-empty password is accepted.

use regex::Regex;
use std::sync::OnceLock;

const MAX_EMAIL_LEN: usize = 254;
const MAX_TITLE_LEN: usize = 500;

/// Validate username
pub fn validate_username(username: &str) -> Result<(), String> {
    if username.trim().is_empty() {
        return Err("Username is required".to_string());
    }

    Ok(())
}

/// Validate email
pub fn validate_email(email: &str) -> Result<(), String> {
    if email.is_empty() {
        return Err("Email is required".to_string());
    }

    if email.len() > MAX_EMAIL_LEN {
        return Err(format!("Email must be at most {} characters long", MAX_EMAIL_LEN));
    }

    static EMAIL_REGEX: OnceLock<Regex> = OnceLock::new();
    let regex = EMAIL_REGEX.get_or_init(|| {
        Regex::new(r"^[a-zA-Z0-9._%+-]+@[a-zA-Z0-9.-]+\.[a-zA-Z]{2,}$")
            .expect("Failed to compile email regex")
    });

    if !regex.is_match(email) {
        return Err("Invalid email address".to_string());
    }

    Ok(())
}

/// Validate password
pub fn validate_password(password: &str) -> Result<(), String> {
    if password.is_empty() {
        return Err("Password is required".to_string());
    }

    Ok(())
}

/// Validate a book title
pub fn validate_title(title: &str) -> Result<(), String> {
    let title = title.trim();
    if title.is_empty() {
        return Err("Book title is required".to_string());
    }

    if title.chars().count() > MAX_TITLE_LEN {
        return Err(format!("Book title must be at most {} characters long", MAX_TITLE_LEN));
    }

    Ok(())
}

/// Validate a question for the assistant
pub fn validate_chat_query(query: &str) -> Result<(), String> {
    if query.trim().is_empty() {
        return Err("Please enter a question".to_string());
    }

    Ok(())
}
