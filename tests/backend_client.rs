use axum::{
    extract::{Path, Query, State},
    http::{HeaderMap, StatusCode},
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use panaderia::{
    auth::{AuthError, AuthGateway, AuthMethod},
    backend::{Backend, BackendError, HostedBackend},
    profile::Rol,
    session::{MemoryStore, Session},
};
use secrecy::SecretString;
use serde_json::{json, Value};
use std::{
    collections::HashMap,
    sync::{Arc, Mutex},
    time::Duration,
};
use tokio::net::TcpListener;

const USER_ID: &str = "e4da3b7f";
const TOKEN: &str = "user-token";

#[derive(Clone, Default)]
struct Recorded {
    requests: Arc<Mutex<Vec<String>>>,
}

impl Recorded {
    fn push(&self, entry: String) {
        self.requests.lock().unwrap().push(entry);
    }

    fn all(&self) -> Vec<String> {
        self.requests.lock().unwrap().clone()
    }
}

fn bearer(headers: &HeaderMap) -> String {
    headers
        .get("authorization")
        .and_then(|value| value.to_str().ok())
        .unwrap_or_default()
        .to_string()
}

async fn token(
    State(recorded): State<Recorded>,
    Query(query): Query<HashMap<String, String>>,
    headers: HeaderMap,
    Json(body): Json<Value>,
) -> Response {
    recorded.push(format!(
        "token grant_type={} apikey={}",
        query.get("grant_type").map_or("", String::as_str),
        headers
            .get("apikey")
            .and_then(|value| value.to_str().ok())
            .unwrap_or_default()
    ));

    if body["password"] == "horno123" {
        Json(json!({
            "access_token": TOKEN,
            "token_type": "bearer",
            "user": { "id": USER_ID, "email": body["email"] },
        }))
        .into_response()
    } else {
        (
            StatusCode::BAD_REQUEST,
            Json(json!({
                "error": "invalid_grant",
                "error_description": "Invalid login credentials",
            })),
        )
            .into_response()
    }
}

async fn logout(State(recorded): State<Recorded>, headers: HeaderMap) -> StatusCode {
    recorded.push(format!("logout {}", bearer(&headers)));
    StatusCode::NO_CONTENT
}

async fn rpc(
    State(recorded): State<Recorded>,
    Path(function): Path<String>,
    headers: HeaderMap,
    Json(params): Json<Value>,
) -> Response {
    recorded.push(format!("rpc:{function} {}", bearer(&headers)));

    match function.as_str() {
        "sync_user_profile" => StatusCode::NO_CONTENT.into_response(),
        // the terminal PIN is only known to the RPC check
        "login_manual" if params["password_input"] == "clave-caja" => Json(json!([{
            "login_manual": {
                "success": true,
                "user": {
                    "id": USER_ID,
                    "email": params["email_input"],
                    "nombre": "Sofia",
                    "apellido": "Lara",
                    "rol": "empleado",
                    "sucursal_nombre": "Centro",
                },
            },
        }]))
        .into_response(),
        "login_manual" => Json(json!({ "success": false })).into_response(),
        _ => (
            StatusCode::NOT_FOUND,
            Json(json!({ "message": "Could not find the function" })),
        )
            .into_response(),
    }
}

async fn usuarios(
    State(recorded): State<Recorded>,
    Query(query): Query<HashMap<String, String>>,
    headers: HeaderMap,
) -> Json<Value> {
    let filter = query.get("id").cloned().unwrap_or_default();
    recorded.push(format!("usuarios {filter} {}", bearer(&headers)));

    if filter == format!("eq.{USER_ID}") {
        Json(json!([{
            "id": USER_ID,
            "email": "sofia@panaderia.dev",
            "nombre": "Sofia",
            "apellido": null,
            "rol": "empleado",
            "sucursal": { "nombre": "Centro" },
        }]))
    } else {
        Json(json!([]))
    }
}

async fn spawn_backend() -> (String, Recorded) {
    let recorded = Recorded::default();

    let app = Router::new()
        .route("/auth/v1/token", post(token))
        .route("/auth/v1/logout", post(logout))
        .route("/rest/v1/rpc/:function", post(rpc))
        .route("/rest/v1/usuarios", get(usuarios))
        .with_state(recorded.clone());

    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();

    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });

    (format!("http://{addr}"), recorded)
}

fn client(url: &str) -> HostedBackend {
    HostedBackend::new(
        url,
        SecretString::from("anon".to_string()),
        Duration::from_secs(5),
    )
    .unwrap()
}

#[tokio::test]
async fn password_grant_then_profile_uses_access_token() {
    let (url, recorded) = spawn_backend().await;
    let backend = client(&url);

    let user = backend
        .sign_in_with_password("sofia@panaderia.dev", "horno123")
        .await
        .unwrap();
    assert_eq!(user.id, USER_ID);

    let row = backend.fetch_profile(USER_ID).await.unwrap();
    assert_eq!(row.nombre.as_deref(), Some("Sofia"));
    assert_eq!(row.apellido, None);
    assert_eq!(row.rol, Rol::Empleado);
    assert_eq!(row.sucursal.map(|branch| branch.nombre).as_deref(), Some("Centro"));

    let requests = recorded.all();
    assert_eq!(requests[0], "token grant_type=password apikey=anon");
    assert_eq!(requests[1], format!("usuarios eq.{USER_ID} Bearer {TOKEN}"));
}

#[tokio::test]
async fn rejected_grant_maps_to_http_error() {
    let (url, _recorded) = spawn_backend().await;
    let backend = client(&url);

    let err = backend
        .sign_in_with_password("sofia@panaderia.dev", "wrong-pass")
        .await
        .unwrap_err();

    assert_eq!(
        err,
        BackendError::Http {
            status: 400,
            message: "Invalid login credentials".to_string(),
        }
    );
}

#[tokio::test]
async fn rpc_without_body_is_null() {
    let (url, recorded) = spawn_backend().await;
    let backend = client(&url);

    let value = backend.rpc("sync_user_profile", json!({})).await.unwrap();

    assert_eq!(value, Value::Null);
    assert_eq!(recorded.all(), vec!["rpc:sync_user_profile Bearer anon"]);
}

#[tokio::test]
async fn unknown_rpc_is_http_error() {
    let (url, _recorded) = spawn_backend().await;
    let backend = client(&url);

    let err = backend.rpc("reabrir_caja", json!({})).await.unwrap_err();

    assert!(matches!(err, BackendError::Http { status: 404, .. }));
}

#[tokio::test]
async fn missing_profile_is_not_found() {
    let (url, _recorded) = spawn_backend().await;
    let backend = client(&url);

    let err = backend.fetch_profile("ffffffff").await.unwrap_err();

    assert_eq!(err, BackendError::NotFound);
}

#[tokio::test]
async fn logout_sends_token_once() {
    let (url, recorded) = spawn_backend().await;
    let backend = client(&url);

    // nothing to revoke yet
    backend.sign_out().await.unwrap();

    backend
        .sign_in_with_password("sofia@panaderia.dev", "horno123")
        .await
        .unwrap();
    backend.sign_out().await.unwrap();
    backend.sign_out().await.unwrap();

    let logouts: Vec<_> = recorded
        .all()
        .into_iter()
        .filter(|entry| entry.starts_with("logout"))
        .collect();
    assert_eq!(logouts, vec![format!("logout Bearer {TOKEN}")]);
}

#[tokio::test]
async fn unreachable_backend_is_network_error() {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);

    let backend = client(&format!("http://{addr}"));
    let err = backend.rpc("sync_user_profile", json!({})).await.unwrap_err();

    assert!(matches!(err, BackendError::Network(_)));
}

#[tokio::test]
async fn gateway_signs_in_against_hosted_backend() {
    let (url, recorded) = spawn_backend().await;
    let session = Session::new(Arc::new(MemoryStore::new()));
    let gateway = AuthGateway::new(Arc::new(client(&url)), session);

    let signed_in = gateway
        .login(
            "sofia@panaderia.dev",
            &SecretString::from("horno123".to_string()),
        )
        .await
        .unwrap();

    assert_eq!(signed_in.method, AuthMethod::Primary);
    assert_eq!(signed_in.profile.sucursal.as_deref(), Some("Centro"));
    assert!(gateway.session().is_employee());
    assert!(recorded
        .all()
        .contains(&format!("rpc:sync_user_profile Bearer {TOKEN}")));

    gateway.sign_out().await;
    assert!(!gateway.session().is_authenticated());
}

#[tokio::test]
async fn gateway_falls_back_to_login_manual() {
    let (url, recorded) = spawn_backend().await;
    let session = Session::new(Arc::new(MemoryStore::new()));
    let gateway = AuthGateway::new(Arc::new(client(&url)), session);

    let signed_in = gateway
        .login(
            "sofia@panaderia.dev",
            &SecretString::from("clave-caja".to_string()),
        )
        .await
        .unwrap();

    assert_eq!(signed_in.method, AuthMethod::Alternate);
    assert_eq!(signed_in.profile.nombre, "Sofia");
    assert_eq!(signed_in.profile.sucursal.as_deref(), Some("Centro"));
    assert!(gateway.session().is_authenticated());
    assert!(recorded
        .all()
        .contains(&"rpc:login_manual Bearer anon".to_string()));
}

#[tokio::test]
async fn gateway_reports_rejection_from_both_paths() {
    let (url, _recorded) = spawn_backend().await;
    let session = Session::new(Arc::new(MemoryStore::new()));
    let gateway = AuthGateway::new(Arc::new(client(&url)), session);

    let err = gateway
        .login(
            "sofia@panaderia.dev",
            &SecretString::from("otra-clave".to_string()),
        )
        .await
        .unwrap_err();

    assert!(matches!(err, AuthError::CredentialsIncorrect));
    assert!(!gateway.session().is_authenticated());
}

#[tokio::test]
async fn gateway_without_fallback_keeps_primary_error() {
    let (url, recorded) = spawn_backend().await;
    let session = Session::new(Arc::new(MemoryStore::new()));
    let gateway = AuthGateway::new(Arc::new(client(&url)), session).with_fallback(false);

    let err = gateway
        .login(
            "sofia@panaderia.dev",
            &SecretString::from("clave-caja".to_string()),
        )
        .await
        .unwrap_err();

    assert!(matches!(err, AuthError::InvalidCredentials));
    assert!(!recorded
        .all()
        .iter()
        .any(|entry| entry.starts_with("rpc:login_manual")));
}
