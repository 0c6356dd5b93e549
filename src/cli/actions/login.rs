use crate::{auth::AuthGateway, cli::globals::GlobalArgs, roles::redirect_target_for};
use anyhow::{anyhow, Result};
use secrecy::SecretString;
use serde_json::{json, Value};
use tracing::error;

/// Handle the login action
pub async fn handle(email: &str, password: &SecretString, globals: &GlobalArgs) -> Result<()> {
    let gateway = globals.gateway()?;

    let summary = login(&gateway, email, password).await?;

    println!("{}", serde_json::to_string_pretty(&summary)?);

    Ok(())
}

/// Signs in and describes the result for the terminal.
///
/// # Errors
/// Returns the generic message of the failure category.
pub async fn login(gateway: &AuthGateway, email: &str, password: &SecretString) -> Result<Value> {
    match gateway.login(email.trim(), password).await {
        Ok(signed_in) => Ok(json!({
            "redirect": redirect_target_for(&signed_in.profile),
            "method": signed_in.method,
            "user": signed_in.profile,
        })),
        Err(err) => {
            error!("Login failed: {}", err);

            Err(anyhow!(err.user_message()))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        backend::mock::MockBackend,
        session::{MemoryStore, Session},
    };
    use std::sync::Arc;

    fn gateway(backend: MockBackend) -> AuthGateway {
        AuthGateway::new(Arc::new(backend), Session::new(Arc::new(MemoryStore::new())))
    }

    #[tokio::test]
    async fn login_summary_has_landing_route() {
        let gateway = gateway(MockBackend::accepting());

        let summary = login(
            &gateway,
            " sofia@panaderia.dev ",
            &SecretString::from("horno123".to_string()),
        )
        .await
        .unwrap();

        assert_eq!(summary["redirect"], "/empleado");
        assert_eq!(summary["method"], "primary");
        assert_eq!(summary["user"]["sucursal"], "Centro");
    }

    #[tokio::test]
    async fn login_failure_shows_generic_message() {
        let mut backend = MockBackend::refusing();
        backend.manual = Ok(json!({ "success": false }));
        let gateway = gateway(backend);

        let err = login(
            &gateway,
            "sofia@panaderia.dev",
            &SecretString::from("horno123".to_string()),
        )
        .await
        .unwrap_err();

        assert_eq!(err.to_string(), "Invalid email or password.");
    }
}
