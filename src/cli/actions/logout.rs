use crate::cli::globals::GlobalArgs;
use anyhow::Result;

/// Handle the logout action; the local session is cleared even if the
/// provider cannot be reached.
pub async fn handle(globals: &GlobalArgs) -> Result<()> {
    let gateway = globals.gateway()?;

    gateway.sign_out().await;

    println!("signed out");

    Ok(())
}
