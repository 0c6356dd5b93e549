pub mod login;
pub mod logout;
pub mod server;
pub mod whoami;

use secrecy::SecretString;

#[derive(Debug)]
pub enum Action {
    Server { port: u16 },
    Login { email: String, password: SecretString },
    Logout,
    Whoami,
}
