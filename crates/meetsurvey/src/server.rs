//! HTTP front end for the survey page.
//!
//! `GET /` renders the form for the contact in the link, `POST /` appends the
//! submitted answers to that contact's notes and renders the form again.

use std::sync::Arc;

use axum::extract::{Query, State};
use axum::http::StatusCode;
use axum::response::{Html, IntoResponse, Response};
use axum::routing::get;
use axum::{Form, Router};
use chrono::Local;
use tokio::net::TcpListener;
use tower_http::trace::TraceLayer;
use tracing::{error, info, warn};

use crate::config::Config;
use crate::contact::{ContactIdentity, ContactStore};
use crate::error::{Error, Result, SurveyFailure};
use crate::notes::append_to_contact;
use crate::page::{render_failure_page, render_survey_page, Banner, PageChrome};
use crate::survey::{compose_block, BlockContext, FormData, LinkQuery, SurveyLink, SurveyResponse};

/// Shared state for request handlers.
#[derive(Debug, Clone)]
pub struct AppState {
    /// Where contacts live.
    pub store: Arc<dyn ContactStore>,
    /// Loaded configuration.
    pub config: Arc<Config>,
    /// Branding and logo markup shared by every page.
    pub chrome: Arc<PageChrome>,
}

impl AppState {
    /// Bundle a store and configuration, resolving the page logo.
    #[must_use]
    pub fn new(store: Arc<dyn ContactStore>, config: Config) -> Self {
        let chrome = PageChrome::load(config.branding.clone());
        Self {
            store,
            config: Arc::new(config),
            chrome: Arc::new(chrome),
        }
    }
}

/// Build the router with all routes and middleware.
pub fn build_app(state: AppState) -> Router {
    Router::new()
        .route("/", get(show_survey).post(submit_survey))
        .route("/health", get(health_check))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Bind `server.bind` and serve until Ctrl-C.
///
/// # Errors
///
/// Returns an error if the address cannot be bound or the server fails.
pub async fn serve(state: AppState) -> Result<()> {
    let addr = state.config.server.bind.clone();
    let listener = TcpListener::bind(&addr)
        .await
        .map_err(|source| Error::ServerBind {
            addr: addr.clone(),
            source,
        })?;

    let local = listener.local_addr()?;
    info!(backend = state.store.name(), "meetsurvey listening on http://{local}");
    info!("  GET  http://{local}/?contact_id=..&type=..&date=.. - Survey page");
    info!("  GET  http://{local}/health - Health check");

    axum::serve(listener, build_app(state))
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("Server stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        error!("Failed to listen for shutdown signal: {e}");
        return;
    }
    info!("Shutdown signal received, stopping server");
}

async fn health_check() -> &'static str {
    "OK"
}

async fn show_survey(State(state): State<AppState>, Query(query): Query<LinkQuery>) -> Response {
    let (link, identity) = match open_survey(&state, query).await {
        Ok(opened) => opened,
        Err(failure) => return failure_page(&state, &failure),
    };

    let response = SurveyResponse::defaults(link.variant);
    Html(render_survey_page(
        &state.chrome,
        &link,
        &identity,
        &response,
        None,
    ))
    .into_response()
}

async fn submit_survey(
    State(state): State<AppState>,
    Query(query): Query<LinkQuery>,
    Form(pairs): Form<Vec<(String, String)>>,
) -> Response {
    let (link, identity) = match open_survey(&state, query).await {
        Ok(opened) => opened,
        Err(failure) => return failure_page(&state, &failure),
    };

    let response = SurveyResponse::from_form(link.variant, &FormData::new(pairs));
    let now = Local::now();
    let contact_name = identity.display_name();
    let block = compose_block(
        &response,
        &BlockContext {
            meeting_date: &link.meeting_date,
            contact_name: &contact_name,
            submitted_at: now.naive_local(),
        },
    );

    let banner = match append_to_contact(state.store.as_ref(), &link.contact_id, &block, now).await
    {
        Ok(()) => {
            info!(contact_id = %link.contact_id, variant = %link.variant, "survey submitted");
            Banner::Saved
        }
        Err(e) => Banner::Failed(SurveyFailure::save(&e)),
    };

    Html(render_survey_page(
        &state.chrome,
        &link,
        &identity,
        &response,
        Some(&banner),
    ))
    .into_response()
}

/// Resolve the link and load the contact it points at.
async fn open_survey(
    state: &AppState,
    query: LinkQuery,
) -> std::result::Result<(SurveyLink, ContactIdentity), SurveyFailure> {
    let link = query.resolve(Local::now().date_naive()).inspect_err(|_| {
        warn!("survey link without contact_id");
    })?;

    let identity = state
        .store
        .fetch_identity(&link.contact_id)
        .await
        .map_err(|e| {
            if e.is_not_found() {
                warn!(contact_id = %link.contact_id, "survey link for unknown contact");
            } else {
                error!(contact_id = %link.contact_id, "failed to load contact: {e}");
            }
            SurveyFailure::from_load_error(&e)
        })?;

    Ok((link, identity))
}

fn failure_page(state: &AppState, failure: &SurveyFailure) -> Response {
    let status: StatusCode = failure.status_code();
    (
        status,
        Html(render_failure_page(&state.chrome, failure)),
    )
        .into_response()
}
