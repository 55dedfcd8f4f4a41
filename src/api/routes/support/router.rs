//! Router for the support assistant: the HTML screens and a JSON API
//! driving the same per-session state machine.

use std::sync::{Arc, RwLock};

use axum::{
    Form, Json, Router,
    extract::State,
    http::StatusCode,
    response::{Html, IntoResponse, Redirect},
    routing::{get, post},
};
use axum_extra::extract::cookie::{Cookie, CookieJar, SameSite};
use uuid::Uuid;

use super::{public, views};
use crate::api::public::ApiError;
use crate::api::state::{AppState, SessionHandle};
use crate::gemini::ModelClient;
use crate::support::{SendOutcome, SupportSession};

type SharedState = Arc<RwLock<AppState>>;

pub const SESSION_COOKIE: &str = "support_session";

/// The request's session id, issuing a new cookie when the browser
/// doesn't have one yet.
fn session_id(jar: CookieJar) -> (CookieJar, String) {
    if let Some(id) = jar.get(SESSION_COOKIE).map(|c| c.value().to_string()) {
        return (jar, id);
    }
    let id = Uuid::new_v4().to_string();
    let cookie = Cookie::build((SESSION_COOKIE, id.clone()))
        .path("/")
        .http_only(true)
        .same_site(SameSite::Lax);
    (jar.add(cookie), id)
}

/// The started session for the request's cookie, if there is one.
/// Lookups never create sessions.
fn find_session(state: &SharedState, jar: &CookieJar) -> Option<SessionHandle> {
    let id = jar.get(SESSION_COOKIE)?.value().to_string();
    state
        .write()
        .expect("Unable to write shared state")
        .find_session(&id)
}

fn start_session(state: &SharedState, jar: CookieJar) -> (CookieJar, SessionHandle) {
    let (jar, id) = session_id(jar);
    let session = state
        .write()
        .expect("Unable to write shared state")
        .start_session(&id);
    (jar, session)
}

fn end_session(state: &SharedState, jar: &CookieJar) -> Option<SessionHandle> {
    let id = jar.get(SESSION_COOKIE)?.value().to_string();
    state
        .write()
        .expect("Unable to write shared state")
        .end_session(&id)
}

fn model_and_limit(state: &SharedState) -> (Arc<dyn ModelClient>, usize) {
    let shared_state = state.read().expect("Unable to read share state");
    (
        Arc::clone(&shared_state.model),
        shared_state.config.context_max_messages,
    )
}

/// Render the current stage
async fn index(
    State(state): State<SharedState>,
    jar: CookieJar,
) -> Result<Html<String>, ApiError> {
    let logo_path = state
        .read()
        .expect("Unable to read share state")
        .config
        .logo_path
        .clone();
    let page = match find_session(&state, &jar) {
        Some(session) => views::render_page(&*session.lock().await, &logo_path)?,
        None => views::render_page(&SupportSession::new(), &logo_path)?,
    };
    Ok(Html(page))
}

async fn start(State(state): State<SharedState>, jar: CookieJar) -> impl IntoResponse {
    let (jar, session) = start_session(&state, jar);
    session.lock().await.start();
    (jar, Redirect::to("/"))
}

async fn send(
    State(state): State<SharedState>,
    jar: CookieJar,
    Form(form): Form<public::SendForm>,
) -> Redirect {
    let Some(session) = find_session(&state, &jar) else {
        tracing::debug!("Send outcome: {:?}", SendOutcome::NotInSupport);
        return Redirect::to("/");
    };
    let (model, limit) = model_and_limit(&state);
    let outcome = session
        .lock()
        .await
        .send(&form.message, model.as_ref(), limit)
        .await;
    tracing::debug!("Send outcome: {:?}", outcome);
    Redirect::to("/")
}

async fn clear(State(state): State<SharedState>, jar: CookieJar) -> Redirect {
    if let Some(session) = end_session(&state, &jar) {
        session.lock().await.clear();
    }
    Redirect::to("/")
}

/// Get the stage and transcript for the caller's session
async fn api_session(
    State(state): State<SharedState>,
    jar: CookieJar,
) -> Json<public::SessionResponse> {
    let resp = match find_session(&state, &jar) {
        Some(session) => public::SessionResponse::new(&*session.lock().await, None),
        None => public::SessionResponse::new(&SupportSession::new(), None),
    };
    Json(resp)
}

async fn api_start(
    State(state): State<SharedState>,
    jar: CookieJar,
) -> (CookieJar, Json<public::SessionResponse>) {
    let (jar, session) = start_session(&state, jar);
    let mut session = session.lock().await;
    session.start();
    (jar, Json(public::SessionResponse::new(&session, None)))
}

/// Send a message and wait for the assistant's reply
async fn api_chat(
    State(state): State<SharedState>,
    jar: CookieJar,
    Json(payload): Json<public::ChatRequest>,
) -> impl IntoResponse {
    let not_in_support = (
        StatusCode::CONFLICT,
        "Start a support session before sending messages",
    );
    let Some(session) = find_session(&state, &jar) else {
        return not_in_support.into_response();
    };
    let (model, limit) = model_and_limit(&state);
    let mut session = session.lock().await;

    match session.send(&payload.message, model.as_ref(), limit).await {
        SendOutcome::NotInSupport => not_in_support.into_response(),
        SendOutcome::Ignored => Json(public::SessionResponse::new(&session, None)).into_response(),
        SendOutcome::Replied(reply) => {
            Json(public::SessionResponse::new(&session, Some(reply))).into_response()
        }
    }
}

async fn api_clear(
    State(state): State<SharedState>,
    jar: CookieJar,
) -> Json<public::SessionResponse> {
    if let Some(session) = end_session(&state, &jar) {
        session.lock().await.clear();
    }
    Json(public::SessionResponse::new(&SupportSession::new(), None))
}

/// Routes for the HTML screens
pub fn router() -> Router<SharedState> {
    Router::new()
        .route("/", get(index))
        .route("/start", post(start))
        .route("/send", post(send))
        .route("/clear", post(clear))
}

/// Routes for the JSON API
pub fn api_router() -> Router<SharedState> {
    Router::new()
        .route("/session", get(api_session))
        .route("/start", post(api_start))
        .route("/chat", post(api_chat))
        .route("/clear", post(api_clear))
}
