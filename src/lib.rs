use actix_cors::Cors;
use actix_files::Files;
use actix_identity::IdentityMiddleware;
use actix_session::{SessionMiddleware, storage::CookieSessionStore};
use actix_web::cookie::Key;
use actix_web::middleware::{Compress, Logger};
use actix_web::{App, HttpServer, web};
use actix_web_flash_messages::{FlashMessagesFramework, storage::CookieMessageStore};
use tera::Tera;

use crate::db::establish_connection_pool;
use crate::middleware::RedirectUnauthorized;
use crate::models::config::ServerConfig;
use crate::repository::DieselRepository;
use crate::routes::field::{field_edit, field_save};
use crate::routes::main::{logout, not_assigned, show_index};
use crate::routes::record::show_record;
use crate::routes::settings::{save_settings, show_settings};

pub mod auth;
pub mod db;
pub mod domain;
pub mod dto;
pub mod editing;
pub mod forms;
pub mod middleware;
pub mod models;
pub mod pagination;
pub mod repository;
pub mod routes;
pub mod schema;
pub mod services;

/// Role granting access to the records pages.
pub const SERVICE_ACCESS_ROLE: &str = "fields";
/// Role granting in-place editing of field values.
pub const SERVICE_EDITOR_ROLE: &str = "fields_editor";
/// Role granting the display settings pages.
pub const SERVICE_ADMIN_ROLE: &str = "fields_admin";

/// Builds and runs the Actix-Web HTTP server using the provided configuration.
pub async fn run(server_config: ServerConfig) -> std::io::Result<()> {
    // Establish Diesel connection pool for the SQLite database.
    let pool = establish_connection_pool(&server_config.database_url).map_err(|e| {
        std::io::Error::other(format!("Failed to establish database connection: {e}"))
    })?;

    let repo = DieselRepository::new(pool);

    // Keys and stores for identity, sessions, and flash messages.
    let secret_key = Key::from(server_config.secret.as_bytes());

    let message_store = CookieMessageStore::builder(secret_key.clone()).build();
    let message_framework = FlashMessagesFramework::builder(message_store).build();

    let tera = Tera::new(&server_config.templates_dir)
        .map_err(|e| std::io::Error::other(format!("Template parsing error(s): {e}")))?;

    let bind_address = (server_config.address.clone(), server_config.port);

    HttpServer::new(move || {
        App::new()
            .wrap(Cors::permissive())
            .wrap(message_framework.clone())
            .wrap(IdentityMiddleware::default())
            .wrap(
                SessionMiddleware::builder(CookieSessionStore::default(), secret_key.clone())
                    .cookie_secure(false) // set to true in prod
                    .cookie_domain(Some(format!(".{}", server_config.domain)))
                    .build(),
            )
            .wrap(Compress::default())
            .wrap(Logger::default())
            .service(Files::new("/assets", "./assets"))
            .service(not_assigned)
            .service(
                web::scope("")
                    .wrap(RedirectUnauthorized)
                    .service(show_index)
                    .service(show_record)
                    .service(field_edit)
                    .service(field_save)
                    .service(show_settings)
                    .service(save_settings)
                    .service(logout),
            )
            .app_data(web::Data::new(tera.clone()))
            .app_data(web::Data::new(repo.clone()))
            .app_data(web::Data::new(server_config.clone()))
    })
    .bind(bind_address)?
    .run()
    .await
}
