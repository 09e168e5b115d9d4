use axum::{
    Router,
    extract::Request,
    http::StatusCode,
    middleware::{self, Next},
    response::Response,
    routing::{get, post, put},
};
use axum_extra::{
    TypedHeader,
    headers::{Error as AxumError, Header},
};

use std::sync::Arc;

use crate::{account, schedule, transactions};
use engine::Engine;

static USER_ID_HEADER: axum::http::HeaderName = axum::http::HeaderName::from_static("user-id");

#[derive(Clone)]
pub struct ServerState {
    pub engine: Arc<Engine>,
}

/// `TypedHeader` for the identity collaborator's opaque user id.
///
/// Requests must contain a "user-id" entry in the header; authentication
/// itself happens upstream of this service.
#[derive(Debug)]
struct UserIdHeader(String);

impl Header for UserIdHeader {
    fn name() -> &'static axum::http::HeaderName {
        &USER_ID_HEADER
    }

    fn decode<'i, I>(values: &mut I) -> Result<Self, AxumError>
    where
        Self: Sized,
        I: Iterator<Item = &'i axum::http::HeaderValue>,
    {
        let value = values.next().ok_or_else(AxumError::invalid)?;
        let Ok(value) = value.to_str() else {
            return Err(AxumError::invalid());
        };

        Ok(UserIdHeader(value.to_string()))
    }

    fn encode<E: Extend<axum::http::HeaderValue>>(&self, values: &mut E) {
        match axum::http::HeaderValue::from_str(&self.0) {
            Ok(value) => values.extend(std::iter::once(value)),
            Err(_) => tracing::error!("failed to encode user-id header"),
        }
    }
}

/// The caller, as injected into request extensions by [`identify`].
#[derive(Clone, Debug)]
pub struct CurrentUser(pub String);

async fn identify(
    user_header: Option<TypedHeader<UserIdHeader>>,
    mut request: Request,
    next: Next,
) -> Result<Response, StatusCode> {
    let Some(TypedHeader(UserIdHeader(user_id))) = user_header else {
        return Err(StatusCode::UNAUTHORIZED);
    };
    let user_id = user_id.trim().to_string();
    if user_id.is_empty() {
        return Err(StatusCode::UNAUTHORIZED);
    }

    request.extensions_mut().insert(CurrentUser(user_id));
    Ok(next.run(request).await)
}

pub fn router(state: ServerState) -> Router {
    Router::new()
        .route("/balance", get(account::balance))
        .route("/account/timezone", put(account::set_timezone))
        .route(
            "/transactions",
            post(transactions::record).get(transactions::list),
        )
        .route("/schedule", post(schedule::create))
        .route("/schedule/upcoming", get(schedule::upcoming))
        .route("/schedule/dueToday", get(schedule::due_today))
        .route("/schedule/{id}/settle", post(schedule::settle))
        .route_layer(middleware::from_fn(identify))
        .with_state(state)
}

pub async fn run(engine: Engine) {
    let listener = match tokio::net::TcpListener::bind("127.0.0.1:3000").await {
        Ok(listener) => listener,
        Err(err) => {
            tracing::error!("failed to bind server listener: {err}");
            return;
        }
    };
    if let Err(err) = run_with_listener(engine, listener).await {
        tracing::error!("server failed: {err}");
    }
}

pub async fn run_with_listener(
    engine: Engine,
    listener: tokio::net::TcpListener,
) -> Result<(), std::io::Error> {
    let addr = listener.local_addr()?;
    tracing::info!("Server listening on {}", addr);

    let state = ServerState {
        engine: Arc::new(engine),
    };

    axum::serve(listener, router(state)).await
}

pub fn spawn_with_listener(
    engine: Engine,
    listener: tokio::net::TcpListener,
) -> Result<std::net::SocketAddr, std::io::Error> {
    let addr = listener.local_addr()?;

    tokio::spawn(async move {
        if let Err(err) = run_with_listener(engine, listener).await {
            tracing::error!("server failed: {err}");
        }
    });

    Ok(addr)
}
