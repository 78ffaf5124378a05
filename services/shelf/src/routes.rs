//! Shelf service routes

use axum::{
    Extension, Form, Json, Router,
    extract::State,
    http::StatusCode,
    middleware,
    response::{IntoResponse, Redirect, Response},
    routing::get,
};
use axum_extra::extract::CookieJar;
use serde::Deserialize;
use tower_http::trace::TraceLayer;
use tracing::{info, warn};

use crate::{
    AppState,
    context::RequestContext,
    error::AppResult,
    middleware::require_session,
    models::{LoginCredentials, NewUser, User, UserId},
    password,
    repositories::StoreError,
    session::Flash,
    validation::{
        validate_chat_query, validate_email, validate_password, validate_title, validate_username,
    },
    views::{self, ChatOutcome, DashboardView, FormErrors, RegisterValues},
};

const REGISTERED: &str = "Registration successful! Please log in.";
const EMAIL_TAKEN: &str = "Email Already Taken";
const LOGIN_FAILED: &str = "Login failed. Please check your email and password";
const BOOK_ADDED: &str = "Book added successfully!";
const LOGGED_OUT: &str = "You have been logged out successfully.";
const ASSISTANT_UNAVAILABLE: &str =
    "The assistant is unavailable right now. Please try again later.";

/// Submitted registration form
#[derive(Debug, Default, Deserialize)]
pub struct RegisterForm {
    #[serde(default)]
    pub username: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub password: String,
}

/// Submitted dashboard form: either a new title or a question
#[derive(Debug, Default, Deserialize)]
pub struct DashboardForm {
    pub title: Option<String>,
    pub chat_query: Option<String>,
}

/// Create the router for the shelf service
pub fn create_router(state: AppState) -> Router {
    let protected_routes = Router::new()
        .route("/dashboard", get(dashboard).post(dashboard_submit))
        .route_layer(middleware::from_fn_with_state(state.clone(), require_session));

    Router::new()
        .route("/", get(home))
        .route("/health", get(health_check))
        .route("/register", get(register_form).post(register))
        .route("/login", get(login_form).post(login))
        .route("/logout", get(logout))
        .merge(protected_routes)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Health check endpoint
pub async fn health_check(State(state): State<AppState>) -> impl IntoResponse {
    let database_up = common::database::ping(&state.db_pool).await;

    let status = if database_up {
        StatusCode::OK
    } else {
        StatusCode::SERVICE_UNAVAILABLE
    };

    (
        status,
        Json(serde_json::json!({
            "status": if database_up { "ok" } else { "degraded" },
            "service": "shelf",
            "database": if database_up { "up" } else { "down" },
        })),
    )
}

/// Landing page
pub async fn home(ctx: RequestContext) -> impl IntoResponse {
    let page = views::home_page(ctx.flash.as_ref(), ctx.signed_in());
    (ctx.jar, page)
}

/// Empty registration form
pub async fn register_form(ctx: RequestContext) -> impl IntoResponse {
    let page = views::register_page(
        ctx.flash.as_ref(),
        &RegisterValues::default(),
        &FormErrors::new(),
    );
    (ctx.jar, page)
}

/// Create an account, then send the user to the login page
pub async fn register(
    State(state): State<AppState>,
    ctx: RequestContext,
    Form(form): Form<RegisterForm>,
) -> AppResult<Response> {
    let username = form.username.trim();
    let email = normalize_email(&form.email);

    let mut errors = FormErrors::new();
    errors.check("username", validate_username(username));
    errors.check("email", validate_email(&email));
    errors.check("password", validate_password(&form.password));

    if errors.is_empty() {
        let new_user = NewUser {
            username: username.to_string(),
            email: email.clone(),
            password_hash: password::hash(&form.password).await?,
        };

        match state.user_repository.create(&new_user).await {
            Ok(user_id) => {
                info!("Registered user {} ({})", user_id, username);
                let jar = state.sessions.set_flash(ctx.jar, Flash::success(REGISTERED));
                return Ok((jar, Redirect::to("/login")).into_response());
            }
            Err(StoreError::DuplicateEmail) => {
                info!("Registration rejected, email already taken");
                errors.insert("email", EMAIL_TAKEN);
            }
            Err(e) => return Err(e.into()),
        }
    }

    let values = RegisterValues {
        username,
        email: &email,
    };
    let page = views::register_page(ctx.flash.as_ref(), &values, &errors);
    Ok((ctx.jar, page).into_response())
}

/// Empty login form
pub async fn login_form(ctx: RequestContext) -> impl IntoResponse {
    let page = views::login_page(ctx.flash.as_ref());
    (ctx.jar, page)
}

/// Check credentials and open a session
///
/// Unknown email and wrong password get the same answer.
pub async fn login(
    State(state): State<AppState>,
    ctx: RequestContext,
    Form(credentials): Form<LoginCredentials>,
) -> AppResult<Response> {
    let email = normalize_email(&credentials.email);

    let user = if email.is_empty() || credentials.password.is_empty() {
        None
    } else {
        state.user_repository.find_by_email(&email).await?
    };

    let verified = match &user {
        Some(user) => password::verify(&credentials.password, &user.password_hash).await,
        None => false,
    };

    match user {
        Some(user) if verified => {
            info!("User {} logged in", user.id);
            let jar = state.sessions.start_session(ctx.jar, user.id)?;
            Ok((jar, Redirect::to("/dashboard")).into_response())
        }
        _ => {
            warn!("Failed login attempt");
            let jar = state.sessions.set_flash(ctx.jar, Flash::error(LOGIN_FAILED));
            Ok((jar, Redirect::to("/login")).into_response())
        }
    }
}

/// Close the session
pub async fn logout(State(state): State<AppState>, ctx: RequestContext) -> impl IntoResponse {
    if let Some(user_id) = ctx.user_id {
        info!("User {} logged out", user_id);
    }

    let jar = state.sessions.end_session(ctx.jar);
    let jar = state.sessions.set_flash(jar, Flash::info(LOGGED_OUT));
    (jar, Redirect::to("/"))
}

/// The user's book list
pub async fn dashboard(
    State(state): State<AppState>,
    Extension(user_id): Extension<UserId>,
    ctx: RequestContext,
) -> AppResult<Response> {
    let Some(user) = state.user_repository.find_by_id(user_id).await? else {
        return Ok(stale_session(&state, ctx.jar, user_id));
    };

    let books = state.book_repository.list_titles(user_id).await?;
    let view = DashboardView {
        username: &user.username,
        books: &books,
        ..Default::default()
    };

    let page = views::dashboard_page(ctx.flash.as_ref(), &view);
    Ok((ctx.jar, page).into_response())
}

/// Add a title or ask the assistant, depending on which field was sent
pub async fn dashboard_submit(
    State(state): State<AppState>,
    Extension(user_id): Extension<UserId>,
    ctx: RequestContext,
    Form(form): Form<DashboardForm>,
) -> AppResult<Response> {
    let Some(user) = state.user_repository.find_by_id(user_id).await? else {
        return Ok(stale_session(&state, ctx.jar, user_id));
    };

    if let Some(query) = form.chat_query {
        return ask_assistant(&state, ctx, &user, &query).await;
    }

    let title = form.title.unwrap_or_default();
    let mut errors = FormErrors::new();
    errors.check("title", validate_title(&title));

    if errors.is_empty() {
        state.book_repository.add(user_id, title.trim()).await?;
        info!("User {} added a book", user_id);
        let jar = state.sessions.set_flash(ctx.jar, Flash::success(BOOK_ADDED));
        return Ok((jar, Redirect::to("/dashboard")).into_response());
    }

    let books = state.book_repository.list_titles(user_id).await?;
    let view = DashboardView {
        username: &user.username,
        books: &books,
        errors,
        ..Default::default()
    };

    let page = views::dashboard_page(ctx.flash.as_ref(), &view);
    Ok((ctx.jar, page).into_response())
}

async fn ask_assistant(
    state: &AppState,
    ctx: RequestContext,
    user: &User,
    query: &str,
) -> AppResult<Response> {
    let books = state.book_repository.list_titles(user.id).await?;
    let mut view = DashboardView {
        username: &user.username,
        books: &books,
        chat_query: query,
        ..Default::default()
    };

    match validate_chat_query(query) {
        Err(message) => view.errors.insert("chat_query", message),
        Ok(()) => {
            let outcome = match state.assistant.reply(&books, query.trim()).await {
                Ok(reply) => ChatOutcome::Reply(reply),
                Err(e) => {
                    warn!("Assistant call failed for user {}: {}", user.id, e);
                    ChatOutcome::Unavailable(ASSISTANT_UNAVAILABLE.to_string())
                }
            };
            view.chat = Some(outcome);
        }
    }

    let page = views::dashboard_page(ctx.flash.as_ref(), &view);
    Ok((ctx.jar, page).into_response())
}

/// Emails are stored and looked up trimmed and lowercased
fn normalize_email(email: &str) -> String {
    email.trim().to_lowercase()
}

/// The session verifies but names a user the store does not know
fn stale_session(state: &AppState, jar: CookieJar, user_id: UserId) -> Response {
    warn!("Session names unknown user {}, clearing it", user_id);
    let jar = state.sessions.end_session(jar);
    (jar, Redirect::to("/login")).into_response()
}
