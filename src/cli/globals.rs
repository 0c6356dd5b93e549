use crate::{
    auth::AuthGateway,
    backend::HostedBackend,
    cli::commands::backend::Options,
    session::{FileStore, Session},
};
use anyhow::{Context, Result};
use secrecy::SecretString;
use std::{path::PathBuf, sync::Arc, time::Duration};

#[derive(Debug, Clone)]
pub struct GlobalArgs {
    pub backend_url: String,
    pub anon_key: SecretString,
    pub session_dir: PathBuf,
    pub timeout: Duration,
    pub fallback: bool,
}

impl GlobalArgs {
    #[must_use]
    pub fn new(backend_url: String) -> Self {
        Self {
            backend_url,
            anon_key: SecretString::default(),
            session_dir: PathBuf::from(".panaderia"),
            timeout: crate::auth::DEFAULT_DEADLINE,
            fallback: true,
        }
    }

    pub fn set_anon_key(&mut self, key: SecretString) {
        self.anon_key = key;
    }

    /// Wires the hosted backend and the on-disk session into a gateway.
    ///
    /// # Errors
    /// Returns an error if the backend URL is invalid or the session directory
    /// cannot be created.
    pub fn gateway(&self) -> Result<AuthGateway> {
        let backend = HostedBackend::new(&self.backend_url, self.anon_key.clone(), self.timeout)
            .context("invalid backend configuration")?;

        let store = FileStore::open(&self.session_dir).with_context(|| {
            format!(
                "failed to open session directory {}",
                self.session_dir.display()
            )
        })?;

        Ok(
            AuthGateway::new(Arc::new(backend), Session::new(Arc::new(store)))
                .with_deadline(self.timeout)
                .with_fallback(self.fallback),
        )
    }
}

impl From<Options> for GlobalArgs {
    fn from(options: Options) -> Self {
        let mut globals = Self::new(options.url);
        globals.set_anon_key(options.anon_key);
        globals.session_dir = options.session_dir;
        globals.timeout = options.timeout;
        globals.fallback = options.fallback;
        globals
    }
}
