pub mod db;
pub mod engine;
pub mod errors;
pub mod handlers;
pub mod identity;
pub mod models;
pub mod schema;

use actix_web::{middleware::Logger, web, App, HttpServer};
use diesel_migrations::{embed_migrations, EmbeddedMigrations, MigrationHarness};
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

pub use db::{create_pool, DbPool};

pub const MIGRATIONS: EmbeddedMigrations = embed_migrations!("migrations");

/// Run any pending Diesel migrations against the pool's database.
pub fn run_migrations(pool: &DbPool) {
    let mut conn = pool.get().expect("Failed to get DB connection for migrations");
    conn.run_pending_migrations(MIGRATIONS)
        .expect("Failed to run database migrations");
}

#[derive(OpenApi)]
#[openapi(
    paths(
        handlers::listings::create_listing,
        handlers::listings::list_listings,
        handlers::listings::set_listing_active,
        handlers::orders::estimate_order,
        handlers::orders::create_order,
        handlers::orders::get_order,
        handlers::orders::list_orders,
    ),
    tags(
        (name = "listings", description = "Farmer fish listings"),
        (name = "orders", description = "Restaurant orders and estimates"),
    )
)]
pub struct ApiDoc;

/// Build and return an actix-web `Server` bound to `host:port`.
///
/// The caller is responsible for `.await`-ing (or `tokio::spawn`-ing) the
/// returned server.
pub fn build_server(
    pool: DbPool,
    host: &str,
    port: u16,
) -> std::io::Result<actix_web::dev::Server> {
    Ok(HttpServer::new(move || {
        App::new()
            .app_data(web::Data::new(pool.clone()))
            .wrap(Logger::default())
            .service(
                web::scope("/listings")
                    .route("", web::post().to(handlers::listings::create_listing))
                    .route("", web::get().to(handlers::listings::list_listings))
                    .route("/{id}/active", web::put().to(handlers::listings::set_listing_active)),
            )
            .service(
                web::scope("/orders")
                    .route("/estimate", web::post().to(handlers::orders::estimate_order))
                    .route("", web::post().to(handlers::orders::create_order))
                    .route("", web::get().to(handlers::orders::list_orders))
                    .route("/{id}", web::get().to(handlers::orders::get_order)),
            )
            .service(
                SwaggerUi::new("/swagger-ui/{_:.*}")
                    .url("/api-docs/openapi.json", ApiDoc::openapi()),
            )
    })
    .bind((host.to_string(), port))?
    .run())
}
