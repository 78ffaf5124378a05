//! HTML pages
//!
//! Deliberately plain markup built in code. Every interpolated value goes
//! through [`escape`].

use axum::response::Html;
use std::collections::BTreeMap;

use crate::session::Flash;

/// Field name to error message, rendered next to the matching input
#[derive(Debug, Default, Clone)]
pub struct FormErrors(BTreeMap<&'static str, String>);

impl FormErrors {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn check(&mut self, field: &'static str, result: Result<(), String>) {
        if let Err(message) = result {
            self.0.entry(field).or_insert(message);
        }
    }

    pub fn insert(&mut self, field: &'static str, message: impl Into<String>) {
        self.0.insert(field, message.into());
    }

    pub fn get(&self, field: &str) -> Option<&str> {
        self.0.get(field).map(String::as_str)
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

/// Escape text for use in HTML content and double-quoted attributes
pub fn escape(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#x27;"),
            _ => out.push(c),
        }
    }
    out
}

fn layout(title: &str, flash: Option<&Flash>, signed_in: bool, body: &str) -> Html<String> {
    let nav = if signed_in {
        r#"<a href="/dashboard">Dashboard</a> <a href="/logout">Log out</a>"#
    } else {
        r#"<a href="/login">Log in</a> <a href="/register">Register</a>"#
    };

    let flash = flash
        .map(|f| {
            format!(
                r#"<p class="flash {}">{}</p>"#,
                f.level.as_str(),
                escape(&f.message)
            )
        })
        .unwrap_or_default();

    Html(format!(
        r#"<!DOCTYPE html>
<html lang="en">
<head><meta charset="utf-8"><title>{title} | Shelf</title></head>
<body>
<nav><a href="/">Shelf</a> {nav}</nav>
{flash}
<main>
{body}
</main>
</body>
</html>
"#,
        title = escape(title),
    ))
}

fn field_error(errors: &FormErrors, field: &str) -> String {
    errors
        .get(field)
        .map(|message| format!(r#"<span class="error">{}</span>"#, escape(message)))
        .unwrap_or_default()
}

pub fn home_page(flash: Option<&Flash>, signed_in: bool) -> Html<String> {
    let body = r#"<h1>Your reading, remembered</h1>
<p>Keep a list of the books you have read and ask the assistant what to pick up next.</p>"#;
    layout("Home", flash, signed_in, body)
}

/// Values echoed back into the registration form
#[derive(Debug, Default)]
pub struct RegisterValues<'a> {
    pub username: &'a str,
    pub email: &'a str,
}

pub fn register_page(
    flash: Option<&Flash>,
    values: &RegisterValues<'_>,
    errors: &FormErrors,
) -> Html<String> {
    let body = format!(
        r#"<h1>Register</h1>
<form method="post" action="/register">
<label>Username <input name="username" value="{username}"></label> {username_error}
<label>Email <input name="email" type="email" value="{email}"></label> {email_error}
<label>Password <input name="password" type="password"></label> {password_error}
<button type="submit">Register</button>
</form>"#,
        username = escape(values.username),
        email = escape(values.email),
        username_error = field_error(errors, "username"),
        email_error = field_error(errors, "email"),
        password_error = field_error(errors, "password"),
    );
    layout("Register", flash, false, &body)
}

pub fn login_page(flash: Option<&Flash>) -> Html<String> {
    let body = r#"<h1>Log in</h1>
<form method="post" action="/login">
<label>Email <input name="email" type="email"></label>
<label>Password <input name="password" type="password"></label>
<button type="submit">Log in</button>
</form>"#;
    layout("Log in", flash, false, body)
}

/// What the assistant section shows after a question
#[derive(Debug)]
pub enum ChatOutcome {
    Reply(String),
    Unavailable(String),
}

/// Everything the dashboard renders
#[derive(Debug, Default)]
pub struct DashboardView<'a> {
    pub username: &'a str,
    pub books: &'a [String],
    pub errors: FormErrors,
    pub chat_query: &'a str,
    pub chat: Option<ChatOutcome>,
}

pub fn dashboard_page(flash: Option<&Flash>, view: &DashboardView<'_>) -> Html<String> {
    let books = if view.books.is_empty() {
        r#"<p class="empty">No books yet.</p>"#.to_string()
    } else {
        let items: String = view
            .books
            .iter()
            .map(|title| format!("<li>{}</li>", escape(title)))
            .collect();
        format!(r#"<ol class="books">{}</ol>"#, items)
    };

    let chat = match &view.chat {
        Some(ChatOutcome::Reply(text)) => {
            format!(r#"<div class="reply">{}</div>"#, escape(text))
        }
        Some(ChatOutcome::Unavailable(message)) => {
            format!(r#"<div class="reply error">{}</div>"#, escape(message))
        }
        None => String::new(),
    };

    let body = format!(
        r#"<h1>Welcome, {username}</h1>
<section>
<h2>Books you have read</h2>
{books}
<form method="post" action="/dashboard">
<label>Book title <input name="title"></label> {title_error}
<button type="submit">Add Book</button>
</form>
</section>
<section>
<h2>Ask about your books</h2>
<form method="post" action="/dashboard">
<label>Question <input name="chat_query" value="{chat_query}"></label> {chat_error}
<button type="submit">Ask</button>
</form>
{chat}
</section>"#,
        username = escape(view.username),
        title_error = field_error(&view.errors, "title"),
        chat_query = escape(view.chat_query),
        chat_error = field_error(&view.errors, "chat_query"),
    );
    layout("Dashboard", flash, true, &body)
}

pub fn error_page() -> Html<String> {
    layout(
        "Error",
        None,
        false,
        "<h1>Something went wrong</h1>\n<p>Please try again later.</p>",
    )
}
