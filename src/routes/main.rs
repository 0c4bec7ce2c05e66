//! Routes serving the records listing and the session-level pages.

use actix_identity::Identity;
use actix_session::Session;
use actix_web::http::header::{self, HeaderValue};
use actix_web::{HttpResponse, Responder, get, post, web};
use actix_web_flash_messages::{FlashMessage, IncomingFlashMessages};
use tera::Tera;

use crate::domain::auth::AuthenticatedUser;
use crate::editing::store::HttpSessionStore;
use crate::models::config::ServerConfig;
use crate::repository::DieselRepository;
use crate::routes::{base_context, redirect, render_template};
use crate::services::main::IndexQuery;
use crate::services::{ServiceError, main as main_service};

#[get("/")]
pub async fn show_index(
    user: AuthenticatedUser,
    repo: web::Data<DieselRepository>,
    session: Session,
    params: web::Query<IndexQuery>,
    flash_messages: IncomingFlashMessages,
    server_config: web::Data<ServerConfig>,
    tera: web::Data<Tera>,
) -> impl Responder {
    // A full render starts a fresh page scope; stale edit flags die here.
    let page_token = match HttpSessionStore::begin_page(&session) {
        Ok(token) => token,
        Err(err) => {
            log::error!("Failed to reset the page scope: {err}");
            return HttpResponse::InternalServerError().finish();
        }
    };
    let store = match HttpSessionStore::open(session, page_token) {
        Ok(store) => store,
        Err(err) => {
            log::error!("Failed to open the page scope: {err}");
            return HttpResponse::InternalServerError().finish();
        }
    };

    match main_service::load_index_page(
        repo.get_ref(),
        &store,
        &user,
        params.into_inner(),
        page_token,
    ) {
        Ok(data) => {
            let mut context = base_context(
                &flash_messages,
                &user,
                "index",
                &server_config.auth_service_url,
            );
            context.insert("record_types", &data.record_types);
            context.insert("current_type", &data.current_type);
            context.insert("columns", &data.columns);
            context.insert("records", &data.rows);
            context.insert("page_token", &data.page_token.to_string());

            let mut response = render_template(&tera, "main/index.html", &context);
            // Any row may be mid-edit, so the listing is never cached.
            response
                .headers_mut()
                .insert(header::CACHE_CONTROL, HeaderValue::from_static("no-store"));
            response
        }
        Err(ServiceError::Unauthorized) => {
            FlashMessage::error("Not enough rights.").send();
            redirect("/na")
        }
        Err(ServiceError::NotFound) => {
            FlashMessage::error("Unknown record type.").send();
            redirect("/")
        }
        Err(err) => {
            log::error!("Failed to load the records listing: {err}");
            HttpResponse::InternalServerError().finish()
        }
    }
}

#[post("/logout")]
pub async fn logout(user: Identity) -> impl Responder {
    user.logout();
    redirect("/")
}

#[get("/na")]
pub async fn not_assigned(
    user: AuthenticatedUser,
    flash_messages: IncomingFlashMessages,
    server_config: web::Data<ServerConfig>,
    tera: web::Data<Tera>,
) -> impl Responder {
    let context = base_context(
        &flash_messages,
        &user,
        "index",
        &server_config.auth_service_url,
    );
    render_template(&tera, "main/not_assigned.html", &context)
}
