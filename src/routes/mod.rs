use axum::{
    Router,
    routing::{get, post},
};

use adamus_notification::EmailService;

mod assets;
mod contact;
mod health;
mod index;

pub use assets::AssetsService;
pub use contact::SendInput;

#[derive(Clone)]
pub struct AppState {
    pub mailer: EmailService,
}

pub fn router(app_state: AppState) -> Router {
    Router::new()
        // Health check endpoint (no state required)
        .route("/health", get(health::health))
        .route("/", get(index::page))
        .route("/send", post(contact::action))
        .nest_service("/static", AssetsService::new())
        .with_state(app_state)
}
