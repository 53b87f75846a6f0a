pub mod commands;
pub mod errors;
pub mod models;
pub mod proxy;
pub mod token;
