use actix_web::error::{InternalError, JsonPayloadError};
use actix_web::{web, HttpRequest, HttpResponse, Responder};
use serde_json::json;
use log::{info, error};

use crate::web::models::{ChatRequest, ChatResponse, ErrorResponse};
use crate::AppState;

// Health check endpoint
pub async fn health_check() -> impl Responder {
    HttpResponse::Ok().json(json!({ "status": "ok" }))
}

// Chat API endpoint
pub async fn chat(
    data: web::Data<AppState>,
    req: web::Json<ChatRequest>,
) -> impl Responder {
    info!("Chat request: {} characters", req.prompt.len());

    match data.model.generate_reply(&req.prompt).await {
        Ok(reply) => HttpResponse::Ok().json(ChatResponse {
            reply: reply.unwrap_or_default(),
        }),
        Err(e) => {
            error!("Upstream error: {}", e);
            HttpResponse::InternalServerError().json(ErrorResponse {
                error: e.to_string(),
            })
        }
    }
}

// Turns body extraction failures into the same JSON error shape as upstream failures
pub fn json_error(err: JsonPayloadError, _req: &HttpRequest) -> actix_web::Error {
    error!("Rejected chat request body: {}", err);
    let response = HttpResponse::BadRequest().json(ErrorResponse {
        error: err.to_string(),
    });
    InternalError::from_response(err, response).into()
}
