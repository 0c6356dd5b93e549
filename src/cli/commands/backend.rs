use anyhow::{Context, Result};
use clap::{Arg, ArgAction, ArgMatches, Command};
use secrecy::SecretString;
use std::{path::PathBuf, time::Duration};

pub const ARG_BACKEND_URL: &str = "backend-url";
pub const ARG_ANON_KEY: &str = "anon-key";
pub const ARG_SESSION_DIR: &str = "session-dir";
pub const ARG_TIMEOUT: &str = "timeout";
pub const ARG_NO_FALLBACK: &str = "no-fallback";

#[must_use]
pub fn with_args(command: Command) -> Command {
    command
        .arg(
            Arg::new(ARG_BACKEND_URL)
                .long("backend-url")
                .help("Hosted backend base URL, example: https://project.backend.tld")
                .env("PANADERIA_BACKEND_URL")
                .global(true),
        )
        .arg(
            Arg::new(ARG_ANON_KEY)
                .long("anon-key")
                .help("Public (anon) API key of the hosted backend")
                .env("PANADERIA_ANON_KEY")
                .hide_env_values(true)
                .global(true),
        )
        .arg(
            Arg::new(ARG_SESSION_DIR)
                .long("session-dir")
                .help("Directory holding the session of this terminal")
                .env("PANADERIA_SESSION_DIR")
                .default_value(".panaderia")
                .global(true)
                .value_parser(clap::value_parser!(PathBuf)),
        )
        .arg(
            Arg::new(ARG_TIMEOUT)
                .long("timeout")
                .help("Deadline in seconds for each backend call")
                .env("PANADERIA_TIMEOUT")
                .default_value("10")
                .global(true)
                .value_parser(clap::value_parser!(u64).range(1..=300)),
        )
        .arg(
            Arg::new(ARG_NO_FALLBACK)
                .long("no-fallback")
                .help("Do not try login_manual when the password grant fails")
                .env("PANADERIA_NO_FALLBACK")
                .global(true)
                .action(ArgAction::SetTrue),
        )
}

/// Session directory; needed even by commands that never reach the backend.
#[must_use]
pub fn session_dir(matches: &ArgMatches) -> PathBuf {
    matches
        .get_one::<PathBuf>(ARG_SESSION_DIR)
        .cloned()
        .unwrap_or_else(|| PathBuf::from(".panaderia"))
}

#[derive(Debug)]
pub struct Options {
    pub url: String,
    pub anon_key: SecretString,
    pub session_dir: PathBuf,
    pub timeout: Duration,
    pub fallback: bool,
}

impl Options {
    /// # Errors
    /// Returns an error when the backend URL or anon key is missing.
    pub fn parse(matches: &ArgMatches) -> Result<Self> {
        let url = matches
            .get_one::<String>(ARG_BACKEND_URL)
            .cloned()
            .context("missing required argument: --backend-url")?;

        let anon_key = matches
            .get_one::<String>(ARG_ANON_KEY)
            .cloned()
            .map(SecretString::from)
            .context("missing required argument: --anon-key")?;

        let session_dir = session_dir(matches);

        let timeout = Duration::from_secs(matches.get_one::<u64>(ARG_TIMEOUT).copied().unwrap_or(10));

        Ok(Self {
            url,
            anon_key,
            session_dir,
            timeout,
            fallback: !matches.get_flag(ARG_NO_FALLBACK),
        })
    }
}
