//! HTTP control API.
//!
//! Every route requires HTTP Basic credentials matching a configured
//! client. The caller's master identity is the source address of the
//! connection, which scopes each master to its own delegations. Responses
//! are plain text, one record per line.

use axum::extract::connect_info::ConnectInfo;
use axum::extract::{FromRequestParts, Path, State};
use axum::http::request::Parts;
use axum::http::{header, HeaderMap, HeaderValue, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::routing::get;
use axum::Router;
use base64::{engine::general_purpose::STANDARD as B64, Engine};
use std::net::SocketAddr;
use std::sync::Arc;
use tracing::{info, warn};
use zonesync_bind::ZoneRegistry;
use zonesync_core::{Master, Zone, ZoneSyncError};

use crate::config::Config;

/// Shared state handed to every handler.
#[derive(Clone)]
pub struct AppState {
    /// The zone registry, shared with the bootstrap loader.
    pub registry: Arc<ZoneRegistry>,
    /// Effective daemon configuration, for the client list.
    pub config: Arc<Config>,
}

/// Build the control API router.
pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/", get(list_all))
        .route("/list", get(list_mine))
        .route("/add/{zone}", get(add_zone).post(add_zone))
        .route("/remove/{zone}", get(remove_zone).post(remove_zone))
        .with_state(state)
}

/// The authenticated caller, identified as a master by its source address.
///
/// Extraction performs the whole gate: Basic credentials first, then the
/// connection's remote address. Handlers that take a [`Caller`] can assume
/// both.
pub struct Caller(pub Master);

impl FromRequestParts<AppState> for Caller {
    type Rejection = ApiError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        check_credentials(&parts.headers, &state.config)?;

        let ConnectInfo(addr) = ConnectInfo::<SocketAddr>::from_request_parts(parts, state)
            .await
            .map_err(|_| ApiError::UnknownOrigin)?;
        let master = Master::from(addr.ip().to_string());

        info!(master = %master, method = %parts.method, path = %parts.uri.path(), "request");
        Ok(Self(master))
    }
}

/// Validate the `Authorization: Basic` header against the client list.
fn check_credentials(headers: &HeaderMap, config: &Config) -> Result<(), ApiError> {
    let header = headers
        .get(header::AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .ok_or(ApiError::Unauthorized)?;

    let encoded = header
        .split_once(' ')
        .filter(|(scheme, _)| scheme.eq_ignore_ascii_case("Basic"))
        .map(|(_, rest)| rest.trim())
        .ok_or(ApiError::Unauthorized)?;
    let decoded = B64.decode(encoded).map_err(|_| ApiError::Unauthorized)?;
    let decoded = String::from_utf8(decoded).map_err(|_| ApiError::Unauthorized)?;
    let (username, password) = decoded.split_once(':').ok_or(ApiError::Unauthorized)?;

    let known = config
        .clients
        .iter()
        .any(|c| c.username == username && c.password == password);
    if known {
        Ok(())
    } else {
        warn!(username = %username, "rejected credentials");
        Err(ApiError::Unauthorized)
    }
}

/// Errors a handler can return; each maps to a status code, with the
/// message as a plain-text body.
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    /// Missing or invalid HTTP Basic credentials.
    #[error("invalid credentials")]
    Unauthorized,

    /// The connection's source address could not be determined.
    #[error("unable to establish the caller's origin")]
    UnknownOrigin,

    /// A registry operation failed.
    #[error(transparent)]
    Registry(#[from] ZoneSyncError),
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = match &self {
            Self::Unauthorized => StatusCode::UNAUTHORIZED,
            Self::UnknownOrigin => StatusCode::FORBIDDEN,
            Self::Registry(ZoneSyncError::DuplicateZone { .. }) => StatusCode::CONFLICT,
            Self::Registry(e) if e.is_not_found() => StatusCode::NOT_FOUND,
            Self::Registry(_) => StatusCode::INTERNAL_SERVER_ERROR,
        };

        let mut response = (status, format!("{self}\n")).into_response();
        if matches!(self, Self::Unauthorized) {
            response.headers_mut().insert(
                header::WWW_AUTHENTICATE,
                HeaderValue::from_static(r#"Basic realm="zonesync""#),
            );
        }
        response
    }
}

/// `GET /` lists every delegation as a `zone<TAB>master` line.
async fn list_all(State(state): State<AppState>, _caller: Caller) -> Result<String, ApiError> {
    let mut entries: Vec<_> = state.registry.zone_map().await.into_iter().collect();
    entries.sort();

    let mut body = String::new();
    for (zone, master) in entries {
        body.push_str(&format!("{zone}\t{master}\n"));
    }
    Ok(body)
}

/// `GET /list` lists the caller's own zones, one per line.
async fn list_mine(
    State(state): State<AppState>,
    Caller(master): Caller,
) -> Result<String, ApiError> {
    let mut zones: Vec<_> = state.registry.zones(&master).await.into_iter().collect();
    zones.sort();

    let mut body = String::new();
    for zone in zones {
        body.push_str(&format!("{zone}\n"));
    }
    Ok(body)
}

/// `GET|POST /add/{zone}` delegates `zone` to the calling master.
async fn add_zone(
    State(state): State<AppState>,
    Caller(master): Caller,
    Path(zone): Path<String>,
) -> Result<&'static str, ApiError> {
    let zone = Zone::from(zone);
    state.registry.add_zone(&master, &zone).await?;
    info!(zone = %zone, master = %master, "zone added");
    Ok("OK")
}

/// `GET|POST /remove/{zone}` drops the caller's delegation of `zone`.
async fn remove_zone(
    State(state): State<AppState>,
    Caller(master): Caller,
    Path(zone): Path<String>,
) -> Result<&'static str, ApiError> {
    let zone = Zone::from(zone);
    state.registry.remove_zone(&master, &zone).await?;
    info!(zone = %zone, master = %master, "zone removed");
    Ok("OK")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ClientAuth;
    use axum::body::Body;
    use axum::extract::connect_info::MockConnectInfo;
    use axum::http::Request;
    use http_body_util::BodyExt;
    use tower::ServiceExt;
    use zonesync_bind::{BindPaths, NullHook};

    fn test_state() -> AppState {
        let mut config = Config::default();
        config.clients.push(ClientAuth {
            username: "client1".into(),
            password: "password1".into(),
        });
        AppState {
            registry: Arc::new(ZoneRegistry::new(
                BindPaths::new("./rndc", "./"),
                Arc::new(NullHook),
            )),
            config: Arc::new(config),
        }
    }

    fn test_router(state: AppState, addr: &str) -> Router {
        router(state).layer(MockConnectInfo(addr.parse::<SocketAddr>().unwrap()))
    }

    fn basic(user: &str, pass: &str) -> String {
        format!("Basic {}", B64.encode(format!("{user}:{pass}")))
    }

    fn authed(uri: &str) -> Request<Body> {
        Request::builder()
            .uri(uri)
            .header(header::AUTHORIZATION, basic("client1", "password1"))
            .body(Body::empty())
            .unwrap()
    }

    async fn body_text(response: Response) -> String {
        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        String::from_utf8(bytes.to_vec()).unwrap()
    }

    #[tokio::test]
    async fn test_missing_credentials_are_challenged() {
        let app = test_router(test_state(), "192.0.2.1:4711");

        let response = app
            .oneshot(Request::builder().uri("/").body(Body::empty()).unwrap())
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
        let challenge = response.headers().get(header::WWW_AUTHENTICATE).unwrap();
        assert_eq!(challenge, r#"Basic realm="zonesync""#);
    }

    #[tokio::test]
    async fn test_wrong_password_is_rejected() {
        let app = test_router(test_state(), "192.0.2.1:4711");

        let request = Request::builder()
            .uri("/")
            .header(header::AUTHORIZATION, basic("client1", "wrong"))
            .body(Body::empty())
            .unwrap();
        let response = app.oneshot(request).await.unwrap();

        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    async fn test_add_then_listings() {
        let app = test_router(test_state(), "192.0.2.1:4711");

        let response = app
            .clone()
            .oneshot(authed("/add/example.org"))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(body_text(response).await, "OK");

        let response = app.clone().oneshot(authed("/")).await.unwrap();
        assert_eq!(body_text(response).await, "example.org\t192.0.2.1\n");

        let response = app.oneshot(authed("/list")).await.unwrap();
        assert_eq!(body_text(response).await, "example.org\n");
    }

    #[tokio::test]
    async fn test_listings_are_sorted_by_zone() {
        let app = test_router(test_state(), "192.0.2.1:4711");
        for zone in ["zz.example", "aa.example", "mm.example"] {
            let uri = format!("/add/{zone}");
            app.clone().oneshot(authed(&uri)).await.unwrap();
        }

        let response = app.oneshot(authed("/list")).await.unwrap();
        assert_eq!(
            body_text(response).await,
            "aa.example\nmm.example\nzz.example\n"
        );
    }

    #[tokio::test]
    async fn test_duplicate_add_conflicts() {
        let app = test_router(test_state(), "192.0.2.1:4711");
        app.clone().oneshot(authed("/add/example.org")).await.unwrap();

        let response = app.oneshot(authed("/add/example.org")).await.unwrap();

        assert_eq!(response.status(), StatusCode::CONFLICT);
        assert!(body_text(response).await.contains("already assigned"));
    }

    #[tokio::test]
    async fn test_remove_unknown_zone_is_not_found() {
        let app = test_router(test_state(), "192.0.2.1:4711");

        let response = app.oneshot(authed("/remove/example.org")).await.unwrap();

        assert_eq!(response.status(), StatusCode::NOT_FOUND);
        assert!(body_text(response).await.contains("not registered"));
    }

    #[tokio::test]
    async fn test_masters_are_scoped_to_their_own_zones() {
        let state = test_state();
        let first = test_router(state.clone(), "192.0.2.1:4711");
        let second = test_router(state, "192.0.2.2:4711");

        first
            .clone()
            .oneshot(authed("/add/first.example"))
            .await
            .unwrap();
        second
            .clone()
            .oneshot(authed("/add/second.example"))
            .await
            .unwrap();

        let response = first.oneshot(authed("/list")).await.unwrap();
        assert_eq!(body_text(response).await, "first.example\n");

        // A master cannot remove a zone it does not own.
        let response = second.oneshot(authed("/remove/first.example")).await.unwrap();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_listener_connect_info_identifies_the_caller() {
        // The live listener records the peer address as a request extension.
        let app = router(test_state());
        let addr: SocketAddr = "192.0.2.7:4711".parse().unwrap();

        let request = Request::builder()
            .uri("/add/example.org")
            .header(header::AUTHORIZATION, basic("client1", "password1"))
            .extension(ConnectInfo(addr))
            .body(Body::empty())
            .unwrap();
        let response = app.clone().oneshot(request).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        let request = Request::builder()
            .uri("/")
            .header(header::AUTHORIZATION, basic("client1", "password1"))
            .extension(ConnectInfo(addr))
            .body(Body::empty())
            .unwrap();
        let response = app.oneshot(request).await.unwrap();
        assert_eq!(body_text(response).await, "example.org\t192.0.2.7\n");
    }

    #[tokio::test]
    async fn test_post_is_accepted_for_mutations() {
        let app = test_router(test_state(), "192.0.2.1:4711");

        let request = Request::builder()
            .method("POST")
            .uri("/add/example.org")
            .header(header::AUTHORIZATION, basic("client1", "password1"))
            .body(Body::empty())
            .unwrap();
        let response = app.oneshot(request).await.unwrap();

        assert_eq!(response.status(), StatusCode::OK);
    }
}
