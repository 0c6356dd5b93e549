pub mod auth;
pub mod backend;
pub mod cli;
pub mod panaderia;
pub mod profile;
pub mod roles;
pub mod session;
