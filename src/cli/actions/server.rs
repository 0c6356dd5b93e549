use crate::cli::globals::GlobalArgs;
use crate::panaderia::new;
use anyhow::Result;

/// Handle the server action
pub async fn handle(port: u16, globals: &GlobalArgs) -> Result<()> {
    let gateway = globals.gateway()?;

    new(port, gateway).await
}
