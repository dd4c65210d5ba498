// kedai_server/src/web/handlers/product_handlers.rs

use actix_web::{web, HttpResponse};
use tracing::{info, instrument, warn};

use crate::db::products;
use crate::errors::AppError;
use crate::models::ProductView;
use crate::state::AppState;
use crate::web::dto::ApiResponse;

#[instrument(name = "handler::list_products", skip(app_state))]
pub async fn list_products_handler(app_state: web::Data<AppState>) -> Result<HttpResponse, AppError> {
  let asset_base = app_state.config.asset_base_url.as_deref();
  let catalog: Vec<ProductView> = products::list_products(&app_state.db_pool)
    .await?
    .into_iter()
    .map(|product| product.into_view(asset_base))
    .collect();

  info!("Fetched {} products.", catalog.len());
  Ok(HttpResponse::Ok().json(ApiResponse::ok(catalog)))
}

#[instrument(name = "handler::get_product", skip(app_state, path), fields(product_id = %path.as_ref()))]
pub async fn get_product_handler(
  app_state: web::Data<AppState>,
  path: web::Path<i64>,
) -> Result<HttpResponse, AppError> {
  let product_id = path.into_inner();

  match products::find_product(&app_state.db_pool, product_id).await? {
    Some(product) => {
      let view = product.into_view(app_state.config.asset_base_url.as_deref());
      Ok(HttpResponse::Ok().json(ApiResponse::ok(view)))
    }
    None => {
      warn!("Product with ID {} not found.", product_id);
      Err(AppError::NotFound(format!("Product with ID {} not found.", product_id)))
    }
  }
}
