// kedai_server/src/main.rs

use kedai_server::config::AppConfig;
use kedai_server::state::AppState;
use kedai_server::web::configure_app_routes;
use kedai_server::{db, telemetry};

use actix_web::{web as actix_data, App, HttpServer};
use anyhow::Context;
use std::sync::Arc;

#[actix_web::main]
async fn main() -> anyhow::Result<()> {
  let app_config = AppConfig::from_env().context("loading configuration")?;
  telemetry::init_tracing(app_config.log_format);

  tracing::info!(
    address = %app_config.server_address(),
    surcharge_percent = %app_config.order_surcharge_percent,
    seed_db = app_config.seed_db,
    "Starting kedai storefront server..."
  );

  let db_pool = db::connect(&app_config.database_url, app_config.db_max_connections)
    .await
    .context("connecting to the database")?;
  db::migrate(&db_pool).await.context("running migrations")?;

  if app_config.seed_db {
    db::products::seed_catalog(&db_pool).await.context("seeding the catalog")?;
  }

  let server_address = app_config.server_address();
  let app_state = AppState::new(db_pool, Arc::new(app_config));

  tracing::info!("Binding server to {}...", server_address);
  HttpServer::new(move || {
    App::new()
      .app_data(actix_data::Data::new(app_state.clone()))
      .wrap(tracing_actix_web::TracingLogger::default())
      .configure(configure_app_routes)
  })
  .bind(&server_address)
  .with_context(|| format!("binding {}", server_address))?
  .run()
  .await?;

  Ok(())
}
