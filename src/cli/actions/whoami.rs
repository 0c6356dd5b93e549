use crate::{
    cli::globals::GlobalArgs,
    roles::redirect_target_for,
    session::{FileStore, Session},
};
use anyhow::{Context, Result};
use serde_json::{json, Value};
use std::sync::Arc;

/// Handle the whoami action. Only the local session is read; the backend is
/// not contacted.
pub fn handle(globals: &GlobalArgs) -> Result<()> {
    let store = FileStore::open(&globals.session_dir).with_context(|| {
        format!(
            "failed to open session directory {}",
            globals.session_dir.display()
        )
    })?;

    println!(
        "{}",
        serde_json::to_string_pretty(&describe(&Session::new(Arc::new(store))))?
    );

    Ok(())
}

fn describe(session: &Session) -> Value {
    session.get().map_or_else(
        || json!({ "authenticated": false }),
        |profile| {
            json!({
                "authenticated": true,
                "name": profile.display_name(),
                "redirect": redirect_target_for(&profile),
                "user": profile,
            })
        },
    )
}
