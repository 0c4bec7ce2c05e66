//! Route serving the record detail page.

use actix_session::Session;
use actix_web::http::header::{self, HeaderValue};
use actix_web::{HttpResponse, Responder, get, web};
use actix_web_flash_messages::{FlashMessage, IncomingFlashMessages};
use tera::Tera;

use crate::domain::auth::AuthenticatedUser;
use crate::editing::store::HttpSessionStore;
use crate::models::config::ServerConfig;
use crate::repository::DieselRepository;
use crate::routes::{base_context, redirect, render_template};
use crate::services::{ServiceError, record as record_service};

#[get("/record/{record_id}")]
pub async fn show_record(
    user: AuthenticatedUser,
    repo: web::Data<DieselRepository>,
    session: Session,
    record_id: web::Path<i32>,
    flash_messages: IncomingFlashMessages,
    server_config: web::Data<ServerConfig>,
    tera: web::Data<Tera>,
) -> impl Responder {
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

    match record_service::load_record_page(
        repo.get_ref(),
        &store,
        &user,
        record_id.into_inner(),
        page_token,
    ) {
        Ok(data) => {
            let mut context = base_context(
                &flash_messages,
                &user,
                "index",
                &server_config.auth_service_url,
            );
            context.insert("record", &data.record);
            context.insert("record_type", &data.record_type);
            context.insert("fields", &data.fields);
            context.insert("fragments", &data.fragments);
            context.insert("revisions", &data.revisions);
            context.insert("page_token", &data.page_token.to_string());

            let mut response = render_template(&tera, "record/index.html", &context);
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
            FlashMessage::error("Record not found.").send();
            redirect("/")
        }
        Err(err) => {
            log::error!("Failed to load the record page: {err}");
            HttpResponse::InternalServerError().finish()
        }
    }
}
