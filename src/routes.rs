use axum::extract::{Path, State};
use axum::http::{HeaderMap, StatusCode, header::SET_COOKIE};
use axum::response::{AppendHeaders, Html, IntoResponse, Redirect, Response};
use axum::routing::{get, post};
use axum::{Form, Router};
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::error::AppError;
use crate::session::{CurrentSession, cleared_session_cookie, session_cookie, session_id_from_headers};
use crate::state::AppState;
use crate::templates::{AddCourseVm, LoginVm};
use crate::views::{AbsenceChange, CourseForm, CourseListView, add_course};

#[derive(Deserialize)]
struct LoginForm {
    #[serde(default)]
    email: String,
    #[serde(default)]
    password: String,
}

/// The absence count the page was rendered with.
#[derive(Deserialize)]
struct AbsencesForm {
    absences: u32,
}

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health))
        .route("/login", get(login_page).post(login))
        .route("/logout", post(logout))
        .route("/", get(dashboard))
        .route("/courses/new", get(new_course_page).post(create_course))
        .route("/courses/{id}/absences/increment", post(increment_absences))
        .route("/courses/{id}/absences/decrement", post(decrement_absences))
        .route("/courses/{id}/delete", post(delete_course))
        .with_state(state)
}

fn render<T: Serialize>(state: &AppState, template: &str, vm: &T) -> Result<Html<String>, AppError> {
    let context = tera::Context::from_serialize(vm)?;
    Ok(Html(state.templates.render(template, &context)?))
}

async fn health() -> StatusCode {
    StatusCode::OK
}

async fn login_page(State(state): State<AppState>) -> Result<Html<String>, AppError> {
    render(&state, "login.html", &LoginVm { email: String::new(), error: None })
}

async fn login(
    State(state): State<AppState>,
    Form(form): Form<LoginForm>,
) -> Result<Response, AppError> {
    match state.auth.sign_in(form.email.trim(), &form.password).await {
        Ok(session) => {
            info!("user {} signed in", session.user_id);
            let id = state.sessions.sign_in(session);
            Ok((AppendHeaders([(SET_COOKIE, session_cookie(&id))]), Redirect::to("/")).into_response())
        }
        Err(e) => {
            warn!("sign in failed: {}", e);
            let vm = LoginVm {
                email: form.email,
                error: Some(e.user_message()),
            };
            Ok(render(&state, "login.html", &vm)?.into_response())
        }
    }
}

async fn logout(State(state): State<AppState>, headers: HeaderMap) -> Response {
    if let Some(session) = session_id_from_headers(&headers).and_then(|id| state.sessions.sign_out(&id)) {
        if let Err(e) = state.auth.sign_out(&session).await {
            warn!("backend sign out failed for {}: {}", session.user_id, e);
        }
        info!("user {} signed out", session.user_id);
    }

    (AppendHeaders([(SET_COOKIE, cleared_session_cookie())]), Redirect::to("/login")).into_response()
}

/// Drops a session whose access token the backend no longer accepts and
/// sends the browser back to sign in.
fn expire_session(state: &AppState, current: &CurrentSession) -> Response {
    state.sessions.sign_out(&current.id);
    info!("session for {} expired, signing out", current.session.user_id);
    (AppendHeaders([(SET_COOKIE, cleared_session_cookie())]), Redirect::to("/login")).into_response()
}

async fn dashboard(
    State(state): State<AppState>,
    current: CurrentSession,
) -> Result<Response, AppError> {
    let view = CourseListView::load(state.store.as_ref(), &current.session).await;
    if view.session_expired() {
        return Ok(expire_session(&state, &current));
    }
    Ok(render(&state, "dashboard.html", &view.to_vm())?.into_response())
}

async fn new_course_page(
    State(state): State<AppState>,
    _current: CurrentSession,
) -> Result<Html<String>, AppError> {
    let form = CourseForm::default();
    render(&state, "add_course.html", &AddCourseVm { form: &form, error: None })
}

async fn create_course(
    State(state): State<AppState>,
    current: CurrentSession,
    Form(form): Form<CourseForm>,
) -> Result<Response, AppError> {
    match add_course::submit(state.store.as_ref(), &current.session, &form).await {
        Ok(_) => Ok(Redirect::to("/").into_response()),
        Err(AppError::Unauthorized) => Ok(expire_session(&state, &current)),
        Err(e) => {
            let vm = AddCourseVm { form: &form, error: Some(e.user_message()) };
            Ok(render(&state, "add_course.html", &vm)?.into_response())
        }
    }
}

async fn change_absences(
    state: &AppState,
    current: &CurrentSession,
    id: &str,
    seen: u32,
    change: AbsenceChange,
) -> Response {
    let mut view = CourseListView::new(state.store.as_ref(), &current.session);
    view.change_absences(id, seen, change).await;
    if view.session_expired() {
        return expire_session(state, current);
    }
    Redirect::to("/").into_response()
}

async fn increment_absences(
    State(state): State<AppState>,
    current: CurrentSession,
    Path(id): Path<String>,
    Form(form): Form<AbsencesForm>,
) -> Response {
    change_absences(&state, &current, &id, form.absences, AbsenceChange::Increment).await
}

async fn decrement_absences(
    State(state): State<AppState>,
    current: CurrentSession,
    Path(id): Path<String>,
    Form(form): Form<AbsencesForm>,
) -> Response {
    change_absences(&state, &current, &id, form.absences, AbsenceChange::Decrement).await
}

async fn delete_course(
    State(state): State<AppState>,
    current: CurrentSession,
    Path(id): Path<String>,
) -> Response {
    let mut view = CourseListView::new(state.store.as_ref(), &current.session);
    view.delete(&id).await;
    if view.session_expired() {
        return expire_session(&state, &current);
    }
    Redirect::to("/").into_response()
}
