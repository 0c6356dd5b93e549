use anyhow::Result;
use panaderia::cli::{actions, actions::Action, start};

// Main function
#[tokio::main]
async fn main() -> Result<()> {
    // Start the program
    let (action, globals) = start()?;

    // Handle the action
    match action {
        Action::Server { port } => actions::server::handle(port, &globals).await?,
        Action::Login { email, password } => {
            actions::login::handle(&email, &password, &globals).await?;
        }
        Action::Logout => actions::logout::handle(&globals).await?,
        Action::Whoami => actions::whoami::handle(&globals)?,
    }

    Ok(())
}
