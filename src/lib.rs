pub mod config;
pub mod error;
pub mod middleware;
pub mod observability;
pub mod routes;
pub mod server;

pub use self::config::Config;
pub use routes::AppState;
