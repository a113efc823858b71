pub mod answer_handlers;
pub mod organisation_handlers;
pub mod presentation_handlers;
pub mod question_handlers;
pub mod slide_handlers;

use actix_web::{HttpRequest, web};
use sqlx::PgPool;

use crate::errors::AppError;
use crate::models::organisation::{self, Organisation};
use crate::models::presentation::{self, Presentation};
use crate::models::question::{self, Question};

/// Resolve the organisation from its URL slug.
pub(crate) async fn load_organisation(pool: &PgPool, slug: &str) -> Result<Organisation, AppError> {
    organisation::find_by_slug(pool, slug)
        .await?
        .ok_or(AppError::NotFound)
}

/// Organisation + presentation, with the presentation scoped to that organisation.
pub(crate) async fn load_presentation(
    pool: &PgPool,
    org_slug: &str,
    presentation_id: i64,
) -> Result<(Organisation, Presentation), AppError> {
    let org = load_organisation(pool, org_slug).await?;
    let presentation = presentation::find_in_organisation(pool, org.id, presentation_id)
        .await?
        .ok_or(AppError::NotFound)?;
    Ok((org, presentation))
}

pub(crate) async fn load_question(
    pool: &PgPool,
    org_slug: &str,
    question_id: i64,
) -> Result<(Organisation, Question), AppError> {
    let org = load_organisation(pool, org_slug).await?;
    let question = question::find_in_organisation(pool, org.id, question_id)
        .await?
        .ok_or(AppError::NotFound)?;
    Ok((org, question))
}

/// Identity of the calling user, supplied by the session layer in front of us.
pub(crate) fn user_id(req: &HttpRequest) -> Result<i64, AppError> {
    req.headers()
        .get("X-User-Id")
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.parse::<i64>().ok())
        .ok_or_else(|| AppError::Validation("missing or invalid X-User-Id header".into()))
}

/// Register the organisation index and all organisation-scoped routes.
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.route("/organisations", web::get().to(organisation_handlers::list));
    cfg.service(
        web::scope("/organisations/{org}")
            // Presentations and slides
            .route("/presentations", web::get().to(presentation_handlers::list))
            .route("/presentations", web::post().to(presentation_handlers::create))
            .route("/presentations/{presentation}", web::get().to(presentation_handlers::detail))
            .route("/presentations/{presentation}", web::put().to(presentation_handlers::update))
            .route("/presentations/{presentation}", web::delete().to(presentation_handlers::delete))
            .route("/presentations/{presentation}/slides", web::post().to(slide_handlers::create))
            .route("/presentations/{presentation}/slides/new", web::get().to(slide_handlers::new_form))
            .route("/presentations/{presentation}/slides/{slide}", web::get().to(slide_handlers::detail))
            .route("/presentations/{presentation}/slides/{slide}", web::put().to(slide_handlers::update))
            .route("/presentations/{presentation}/slides/{slide}", web::delete().to(slide_handlers::delete))
            .route("/presentations/{presentation}/slides/{slide}/up", web::post().to(slide_handlers::move_up))
            .route("/presentations/{presentation}/slides/{slide}/down", web::post().to(slide_handlers::move_down))
            .route("/presentations/{presentation}/slides/{slide}/image", web::put().to(slide_handlers::upload_image))
            // Questions and answers
            .route("/questions", web::get().to(question_handlers::list))
            .route("/questions", web::post().to(question_handlers::create))
            .route("/questions/{question}", web::get().to(question_handlers::detail))
            .route("/questions/{question}", web::put().to(question_handlers::update))
            .route("/questions/{question}", web::delete().to(question_handlers::delete))
            .route("/questions/{question}/submissions", web::post().to(question_handlers::submit))
            .route("/questions/{question}/answers", web::post().to(answer_handlers::create))
            .route("/questions/{question}/answers/new", web::get().to(answer_handlers::new_form))
            .route("/questions/{question}/answers/{answer}", web::get().to(answer_handlers::detail))
            .route("/questions/{question}/answers/{answer}", web::put().to(answer_handlers::update))
            .route("/questions/{question}/answers/{answer}", web::delete().to(answer_handlers::delete))
            .route("/questions/{question}/answers/{answer}/up", web::post().to(answer_handlers::move_up))
            .route("/questions/{question}/answers/{answer}/down", web::post().to(answer_handlers::move_down)),
    );
}
