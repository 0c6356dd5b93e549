//! Maps validated CLI matches to an action and the global configuration it
//! runs with.

use crate::cli::{
    actions::Action,
    commands::{self, backend},
    globals::GlobalArgs,
};
use anyhow::{anyhow, Context, Result};
use secrecy::SecretString;

/// Map validated CLI matches to an action.
///
/// # Errors
/// Returns an error if required arguments are missing or inconsistent.
pub fn handler(matches: &clap::ArgMatches) -> Result<(Action, GlobalArgs)> {
    let action = match matches.subcommand() {
        Some((commands::CMD_SERVER, sub_m)) => Action::Server {
            port: sub_m.get_one::<u16>("port").copied().unwrap_or(8080),
        },
        Some((commands::CMD_LOGIN, sub_m)) => Action::Login {
            email: sub_m
                .get_one::<String>("email")
                .cloned()
                .context("missing required argument: --email")?,
            password: sub_m
                .get_one::<String>("password")
                .cloned()
                .map(SecretString::from)
                .context("missing required argument: --password")?,
        },
        Some((commands::CMD_LOGOUT, _)) => Action::Logout,
        Some((commands::CMD_WHOAMI, _)) => Action::Whoami,
        _ => return Err(anyhow!("unknown command")),
    };

    // whoami only reads the local session
    let globals = if matches!(action, Action::Whoami) {
        let mut globals = GlobalArgs::new(String::new());
        globals.session_dir = backend::session_dir(matches);
        globals
    } else {
        GlobalArgs::from(backend::Options::parse(matches)?)
    };

    Ok((action, globals))
}
