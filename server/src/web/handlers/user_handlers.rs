// kedai_server/src/web/handlers/user_handlers.rs

use actix_web::{web, HttpResponse};
use tracing::{info, instrument};

use crate::db::users;
use crate::errors::AppError;
use crate::state::AppState;
use crate::web::dto::{ApiResponse, CreateUserRequest};

#[instrument(name = "handler::list_users", skip(app_state))]
pub async fn list_users_handler(app_state: web::Data<AppState>) -> Result<HttpResponse, AppError> {
  let all_users = users::list_users(&app_state.db_pool).await?;
  info!("Fetched {} users.", all_users.len());
  Ok(HttpResponse::Ok().json(ApiResponse::ok(all_users)))
}

/// Creates a customer, or returns the existing one with the same name.
/// Answers 201 for a new record and 200 for a reused one.
#[instrument(name = "handler::create_user", skip(app_state, payload))]
pub async fn create_user_handler(
  app_state: web::Data<AppState>,
  payload: web::Json<CreateUserRequest>,
) -> Result<HttpResponse, AppError> {
  let request = payload.into_inner();
  let resolution = users::resolve_or_create(&app_state.db_pool, &request.name, request.email.as_deref()).await?;

  if resolution.created {
    Ok(HttpResponse::Created().json(ApiResponse::with_message("Customer created.", resolution.user)))
  } else {
    Ok(HttpResponse::Ok().json(ApiResponse::with_message("Customer already exists.", resolution.user)))
  }
}
