//! Routes serving the per-type display settings page.

use actix_web::{HttpResponse, Responder, get, post, web};
use actix_web_flash_messages::{FlashMessage, IncomingFlashMessages};
use tera::Tera;

use crate::domain::auth::AuthenticatedUser;
use crate::dto::settings::SettingsQuery;
use crate::forms::settings::DisplayConfigForm;
use crate::models::config::ServerConfig;
use crate::repository::DieselRepository;
use crate::routes::{base_context, redirect, render_template};
use crate::services::{ServiceError, settings as settings_service};

#[get("/settings/display")]
pub async fn show_settings(
    user: AuthenticatedUser,
    repo: web::Data<DieselRepository>,
    params: web::Query<SettingsQuery>,
    flash_messages: IncomingFlashMessages,
    server_config: web::Data<ServerConfig>,
    tera: web::Data<Tera>,
) -> impl Responder {
    match settings_service::load_settings_page(repo.get_ref(), &user, params.into_inner()) {
        Ok(data) => {
            let mut context = base_context(
                &flash_messages,
                &user,
                "settings",
                &server_config.auth_service_url,
            );
            context.insert("record_types", &data.record_types);
            context.insert("current_type", &data.current_type);
            context.insert("fields", &data.fields);
            context.insert("formatters", &data.formatters);
            context.insert("configs", &data.configs);
            render_template(&tera, "settings/display.html", &context)
        }
        Err(ServiceError::Unauthorized) => {
            FlashMessage::error("Not enough rights.").send();
            redirect("/na")
        }
        Err(ServiceError::NotFound) => {
            FlashMessage::error("Unknown record type.").send();
            redirect("/settings/display")
        }
        Err(err) => {
            log::error!("Failed to load the display settings: {err}");
            HttpResponse::InternalServerError().finish()
        }
    }
}

#[post("/settings/display")]
pub async fn save_settings(
    user: AuthenticatedUser,
    repo: web::Data<DieselRepository>,
    web::Form(form): web::Form<DisplayConfigForm>,
) -> impl Responder {
    match settings_service::save_display_config(form, &user, repo.get_ref()) {
        Ok(()) => {
            FlashMessage::success("Display settings saved.").send();
            redirect("/settings/display")
        }
        Err(ServiceError::Unauthorized) => {
            FlashMessage::error("Not enough rights.").send();
            redirect("/na")
        }
        Err(ServiceError::Form(message)) => {
            FlashMessage::error(message).send();
            redirect("/settings/display")
        }
        Err(err) => {
            log::error!("Failed to save the display settings: {err}");
            FlashMessage::error("Could not save the display settings.").send();
            redirect("/settings/display")
        }
    }
}
