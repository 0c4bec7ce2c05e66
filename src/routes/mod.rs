//! HTTP route handlers plus the rendering and redirect helpers they share.

use actix_web::HttpResponse;
use actix_web::http::header::LOCATION;
use actix_web_flash_messages::{IncomingFlashMessages, Level};
use tera::{Context, Tera};

use crate::domain::auth::AuthenticatedUser;

pub mod field;
pub mod main;
pub mod record;
pub mod settings;

/// Maps a flash message level onto the alert class the templates expect.
pub fn alert_level_to_str(level: &Level) -> &'static str {
    match level {
        Level::Error => "danger",
        Level::Warning => "warning",
        Level::Success => "success",
        Level::Info | Level::Debug => "info",
    }
}

/// Template context shared by every full page: pending alerts, the signed-in
/// user, the active navigation entry and the home URL.
pub fn base_context(
    flash_messages: &IncomingFlashMessages,
    user: &AuthenticatedUser,
    current_page: &str,
    home_url: &str,
) -> Context {
    let alerts = flash_messages
        .iter()
        .map(|f| (f.content(), alert_level_to_str(&f.level())))
        .collect::<Vec<_>>();
    let mut context = Context::new();
    context.insert("alerts", &alerts);
    context.insert("current_user", user);
    context.insert("current_page", current_page);
    context.insert("home_url", home_url);
    context
}

/// Renders a template, answering with a 500 when rendering fails.
pub fn render_template(tera: &Tera, template: &str, context: &Context) -> HttpResponse {
    match tera.render(template, context) {
        Ok(body) => HttpResponse::Ok()
            .content_type("text/html; charset=utf-8")
            .body(body),
        Err(err) => {
            log::error!("Failed to render template {template}: {err}");
            HttpResponse::InternalServerError().finish()
        }
    }
}

/// See-other redirect to `location`.
pub fn redirect(location: &str) -> HttpResponse {
    HttpResponse::SeeOther()
        .insert_header((LOCATION, location))
        .finish()
}
