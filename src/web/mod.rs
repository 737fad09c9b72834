pub mod handlers;
pub mod models;
pub mod routes;

use actix_cors::Cors;

/// Cross-origin policy for the relay: any origin, method and header.
pub fn cors() -> Cors {
    Cors::permissive()
}
