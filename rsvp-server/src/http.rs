//! JSON API wiring. All core behavior lives in [`crate::service`];
//! handlers only decode, delegate, and encode.

use crate::auth::AdminAuth;
use crate::service::ServiceError;
use crate::store::SledStore;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use axum::{Extension, Router};
use std::future::Future;
use std::net::SocketAddr;

pub type Result<T> = std::result::Result<T, AppError>;

pub struct AppError(anyhow::Error);

// Tell axum how to convert `AppError` into a response.
impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = match self.0.downcast_ref::<ServiceError>() {
            Some(ServiceError::Unauthorized) => StatusCode::UNAUTHORIZED,
            Some(ServiceError::PartyNotFound(_) | ServiceError::GuestNotFound(_)) => {
                StatusCode::NOT_FOUND
            }
            Some(ServiceError::EmptyParty | ServiceError::SelectionOutsideParty(_)) => {
                StatusCode::UNPROCESSABLE_ENTITY
            }
            Some(ServiceError::Invalid(_)) => StatusCode::BAD_REQUEST,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        };
        if status == StatusCode::INTERNAL_SERVER_ERROR {
            tracing::error!("handler failed: {:#}", self.0);
        }
        (status, format!("Something went wrong: {}", self.0)).into_response()
    }
}

// This enables using `?` on functions that return `Result<_, anyhow::Error>` to turn them into
// `Result<_, AppError>`. That way you don't need to do that manually.
impl<E> From<E> for AppError
where
    E: Into<anyhow::Error>,
{
    fn from(err: E) -> Self {
        Self(err.into())
    }
}

#[derive(Clone)]
pub struct State {
    store: SledStore,
    auth: AdminAuth,
}

impl State {
    pub fn new(store: SledStore, auth: AdminAuth) -> Self {
        Self { store, auth }
    }
}

pub fn router(state: State) -> Router {
    Router::new()
        .route("/", get(root))
        .route("/rsvp/post/find-match", post(rsvp::post_find_match))
        .route("/rsvp/post/submit", post(rsvp::post_submit))
        .route("/admin/post/list-parties", post(admin::post_list_parties))
        .route("/admin/post/create-party", post(admin::post_create_party))
        .route("/admin/post/update-party", post(admin::post_update_party))
        .route("/admin/post/delete-party", post(admin::post_delete_party))
        .route("/admin/post/create-guest", post(admin::post_create_guest))
        .route("/admin/post/update-guest", post(admin::post_update_guest))
        .route("/admin/post/delete-guest", post(admin::post_delete_guest))
        .layer(Extension(state))
}

/// Bind `addr` and return the bound address together with the serve
/// future. Port 0 picks a free port, which is how the integration tests
/// run a real server in-process.
pub fn bind(
    addr: SocketAddr,
    state: State,
) -> anyhow::Result<(SocketAddr, impl Future<Output = anyhow::Result<()>>)> {
    let server = axum::Server::try_bind(&addr)?.serve(router(state).into_make_service());
    let local_addr = server.local_addr();
    Ok((local_addr, async move {
        server.await?;
        Ok(())
    }))
}

async fn root() -> &'static str {
    "rsvp server"
}

mod rsvp {
    use super::{Result, State};
    use crate::service;
    use axum::response::IntoResponse;
    use axum::{Extension, Json};
    use rsvp_common::api::{FindMatchRequest, SubmitRsvpRequest};
    use serde_json::Value;

    pub async fn post_find_match(
        Extension(state): Extension<State>,
        Json(payload): Json<Value>,
    ) -> Result<impl IntoResponse> {
        let req: FindMatchRequest = serde_json::from_value(payload)?;
        let found = service::find_party_match(&state.store, &req.query)?;
        Ok(serde_json::to_string(&found)?)
    }

    pub async fn post_submit(
        Extension(state): Extension<State>,
        Json(payload): Json<Value>,
    ) -> Result<impl IntoResponse> {
        let req: SubmitRsvpRequest = serde_json::from_value(payload)?;
        let outcome = service::submit_party_rsvp(&state.store, &req)?;
        Ok(serde_json::to_string(&outcome)?)
    }
}

mod admin {
    use super::{Result, State};
    use crate::service;
    use axum::response::IntoResponse;
    use axum::{Extension, Json};
    use rsvp_common::api::{
        CreateGuestRequest, CreatePartyRequest, DeleteGuestRequest, DeletePartyRequest,
        ListPartiesRequest, UpdateGuestRequest, UpdatePartyRequest,
    };
    use serde_json::Value;

    pub async fn post_list_parties(
        Extension(state): Extension<State>,
        Json(payload): Json<Value>,
    ) -> Result<impl IntoResponse> {
        let req: ListPartiesRequest = serde_json::from_value(payload)?;
        let parties = service::list_parties_with_guests(&state.store, &state.auth, &req)?;
        Ok(serde_json::to_string(&parties)?)
    }

    pub async fn post_create_party(
        Extension(state): Extension<State>,
        Json(payload): Json<Value>,
    ) -> Result<impl IntoResponse> {
        let req: CreatePartyRequest = serde_json::from_value(payload)?;
        let party = service::create_party(&state.store, &state.auth, &req)?;
        Ok(serde_json::to_string(&party)?)
    }

    pub async fn post_update_party(
        Extension(state): Extension<State>,
        Json(payload): Json<Value>,
    ) -> Result<impl IntoResponse> {
        let req: UpdatePartyRequest = serde_json::from_value(payload)?;
        let party = service::update_party(&state.store, &state.auth, &req)?;
        Ok(serde_json::to_string(&party)?)
    }

    pub async fn post_delete_party(
        Extension(state): Extension<State>,
        Json(payload): Json<Value>,
    ) -> Result<impl IntoResponse> {
        let req: DeletePartyRequest = serde_json::from_value(payload)?;
        service::delete_party(&state.store, &state.auth, &req)?;
        Ok(())
    }

    pub async fn post_create_guest(
        Extension(state): Extension<State>,
        Json(payload): Json<Value>,
    ) -> Result<impl IntoResponse> {
        let req: CreateGuestRequest = serde_json::from_value(payload)?;
        let guest = service::create_guest(&state.store, &state.auth, &req)?;
        Ok(serde_json::to_string(&guest)?)
    }

    pub async fn post_update_guest(
        Extension(state): Extension<State>,
        Json(payload): Json<Value>,
    ) -> Result<impl IntoResponse> {
        let req: UpdateGuestRequest = serde_json::from_value(payload)?;
        let guest = service::update_guest(&state.store, &state.auth, &req)?;
        Ok(serde_json::to_string(&guest)?)
    }

    pub async fn post_delete_guest(
        Extension(state): Extension<State>,
        Json(payload): Json<Value>,
    ) -> Result<impl IntoResponse> {
        let req: DeleteGuestRequest = serde_json::from_value(payload)?;
        service::delete_guest(&state.store, &state.auth, &req)?;
        Ok(())
    }
}
