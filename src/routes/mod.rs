pub mod contact;

use axum::routing::post;
use axum::Router;

use crate::state::SharedState;

pub fn contact_routes() -> Router<SharedState> {
    Router::new().route(
        "/api/contact",
        post(contact::submit).options(contact::preflight),
    )
}
