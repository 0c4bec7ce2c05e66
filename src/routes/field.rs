//! Partial-update endpoints behind the edit and save actions.
//!
//! Both endpoints answer with the re-rendered field sub-tree only; the
//! client script swaps it into the page by wrapper id.

use actix_session::Session;
use actix_web::{HttpResponse, Responder, post, web};
use tera::{Context, Tera};

use crate::domain::auth::AuthenticatedUser;
use crate::domain::types::PageToken;
use crate::editing::render::FieldFragment;
use crate::editing::store::HttpSessionStore;
use crate::forms::field::FieldActionForm;
use crate::repository::DieselRepository;
use crate::routes::render_template;
use crate::services::{ServiceError, ServiceResult, field as field_service};

#[post("/field/edit")]
pub async fn field_edit(
    user: AuthenticatedUser,
    repo: web::Data<DieselRepository>,
    session: Session,
    tera: web::Data<Tera>,
    body: web::Bytes,
) -> impl Responder {
    run_action(session, &tera, &body, |store, form, page| {
        field_service::start_edit(repo.get_ref(), store, &user, form, page)
    })
}

#[post("/field/save")]
pub async fn field_save(
    user: AuthenticatedUser,
    repo: web::Data<DieselRepository>,
    session: Session,
    tera: web::Data<Tera>,
    body: web::Bytes,
) -> impl Responder {
    run_action(session, &tera, &body, |store, form, page| {
        field_service::save_field(repo.get_ref(), store, &user, form, page)
    })
}

/// Parses the action body, opens the page scope and renders the fragment
/// the service hands back.
fn run_action(
    session: Session,
    tera: &Tera,
    body: &[u8],
    action: impl FnOnce(&HttpSessionStore, &FieldActionForm, PageToken) -> ServiceResult<FieldFragment>,
) -> HttpResponse {
    let form = match FieldActionForm::parse(body) {
        Ok(form) => form,
        Err(err) => {
            log::error!("Rejected a malformed field action body: {err}");
            return HttpResponse::BadRequest().finish();
        }
    };
    let page = match PageToken::parse(&form.page) {
        Ok(page) => page,
        Err(err) => {
            log::error!("Rejected a field action with a bad page token: {err}");
            return HttpResponse::BadRequest().finish();
        }
    };
    let store = match HttpSessionStore::open(session, page) {
        Ok(store) => store,
        Err(err) => {
            log::error!("Failed to open the page scope: {err}");
            return HttpResponse::InternalServerError().finish();
        }
    };

    match action(&store, &form, page) {
        Ok(fragment) => {
            let mut context = Context::new();
            context.insert("fragment", &fragment);
            render_template(tera, "editing/field.html", &context)
        }
        Err(ServiceError::Unauthorized) => {
            log::error!("Unauthorized field action on {}.", form.path);
            HttpResponse::Unauthorized().finish()
        }
        Err(ServiceError::NotFound) => HttpResponse::NotFound().finish(),
        Err(err @ (ServiceError::Form(_) | ServiceError::Path(_))) => {
            log::error!("Rejected a field action on {}: {err}", form.path);
            HttpResponse::BadRequest().finish()
        }
        Err(err) => {
            log::error!("Failed to run the field action on {}: {err}", form.path);
            HttpResponse::InternalServerError().finish()
        }
    }
}
