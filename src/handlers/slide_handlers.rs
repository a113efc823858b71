use actix_web::{HttpResponse, web};
use serde::{Deserialize, Serialize};
use sqlx::PgPool;

use crate::config::AppConfig;
use crate::errors::AppError;
use crate::media;
use crate::models::organisation::Organisation;
use crate::models::presentation::Presentation;
use crate::models::question;
use crate::models::slide::{self, NewSlide, Slide, SlideUpdate, SlideWithNeighbors};
use crate::navigation::{NavCapabilities, ViewKind};
use crate::ordering::{Direction, Reposition};
use super::load_presentation;

#[derive(Serialize)]
pub struct SlideDetailResponse {
    #[serde(flatten)]
    pub slide: SlideWithNeighbors,
    pub nav: NavCapabilities,
}

#[derive(Serialize)]
pub struct SlideFormResponse {
    pub presentation: Presentation,
    pub nav: NavCapabilities,
}

#[derive(Serialize)]
pub struct DeleteResponse {
    pub resequenced: Vec<Reposition>,
}

#[derive(Serialize)]
pub struct MoveResponse {
    pub moved: bool,
    pub slides: Vec<Slide>,
}

#[derive(Deserialize)]
pub struct ImageQuery {
    pub filename: String,
}

async fn load_slide(
    pool: &PgPool,
    org_slug: &str,
    presentation_id: i64,
    slide_id: i64,
) -> Result<(Organisation, Presentation, Slide), AppError> {
    let (org, presentation) = load_presentation(pool, org_slug, presentation_id).await?;
    let found = slide::find_in_presentation(pool, presentation.id, slide_id)
        .await?
        .ok_or(AppError::NotFound)?;
    Ok((org, presentation, found))
}

/// A slide may only show a question of its own organisation.
async fn check_question(pool: &PgPool, organisation_id: i64, question_id: Option<i64>) -> Result<(), AppError> {
    if let Some(id) = question_id {
        question::find_in_organisation(pool, organisation_id, id)
            .await?
            .ok_or_else(|| AppError::Validation(format!("unknown question {id}")))?;
    }
    Ok(())
}

/// GET .../slides/new: context for the new-slide form.
pub async fn new_form(
    pool: web::Data<PgPool>,
    path: web::Path<(String, i64)>,
) -> Result<HttpResponse, AppError> {
    let (org_slug, presentation_id) = path.into_inner();
    let (org, presentation) = load_presentation(&pool, &org_slug, presentation_id).await?;
    let nav = ViewKind::SlideNew { presentation: presentation.id }.capabilities(&org.slug);
    Ok(HttpResponse::Ok().json(SlideFormResponse { presentation, nav }))
}

/// POST /organisations/{org}/presentations/{presentation}/slides
pub async fn create(
    pool: web::Data<PgPool>,
    path: web::Path<(String, i64)>,
    body: web::Json<NewSlide>,
) -> Result<HttpResponse, AppError> {
    let (org_slug, presentation_id) = path.into_inner();
    let (org, presentation) = load_presentation(&pool, &org_slug, presentation_id).await?;
    check_question(&pool, org.id, body.question_id).await?;
    let created = slide::create(&pool, presentation.id, &body).await?;
    Ok(HttpResponse::Created().json(created))
}

/// GET .../slides/{slide}: slide with previous/next links.
pub async fn detail(
    pool: web::Data<PgPool>,
    path: web::Path<(String, i64, i64)>,
) -> Result<HttpResponse, AppError> {
    let (org_slug, presentation_id, slide_id) = path.into_inner();
    let (org, presentation, found) = load_slide(&pool, &org_slug, presentation_id, slide_id).await?;
    let nav = ViewKind::SlideDetail {
        presentation: presentation.id,
        slide: found.id,
    }
    .capabilities(&org.slug);
    let slide = slide::with_neighbors(&pool, found).await?;

    Ok(HttpResponse::Ok().json(SlideDetailResponse { slide, nav }))
}

/// PUT .../slides/{slide}
pub async fn update(
    pool: web::Data<PgPool>,
    path: web::Path<(String, i64, i64)>,
    body: web::Json<SlideUpdate>,
) -> Result<HttpResponse, AppError> {
    let (org_slug, presentation_id, slide_id) = path.into_inner();
    let (org, _, found) = load_slide(&pool, &org_slug, presentation_id, slide_id).await?;
    check_question(&pool, org.id, body.question_id).await?;
    let updated = slide::update(&pool, found.id, &body).await?;
    Ok(HttpResponse::Ok().json(updated))
}

/// DELETE .../slides/{slide}
pub async fn delete(
    pool: web::Data<PgPool>,
    path: web::Path<(String, i64, i64)>,
) -> Result<HttpResponse, AppError> {
    let (org_slug, presentation_id, slide_id) = path.into_inner();
    let (_, _, found) = load_slide(&pool, &org_slug, presentation_id, slide_id).await?;
    let resequenced = slide::delete(&pool, found.id).await?;
    Ok(HttpResponse::Ok().json(DeleteResponse { resequenced }))
}

async fn move_slide(
    pool: web::Data<PgPool>,
    path: web::Path<(String, i64, i64)>,
    direction: Direction,
) -> Result<HttpResponse, AppError> {
    let (org_slug, presentation_id, slide_id) = path.into_inner();
    let (_, presentation, found) = load_slide(&pool, &org_slug, presentation_id, slide_id).await?;
    let moved = slide::move_slide(&pool, found.id, direction).await?;
    let slides = slide::list_ordered(&pool, presentation.id).await?;
    Ok(HttpResponse::Ok().json(MoveResponse { moved, slides }))
}

/// POST .../slides/{slide}/up
pub async fn move_up(
    pool: web::Data<PgPool>,
    path: web::Path<(String, i64, i64)>,
) -> Result<HttpResponse, AppError> {
    move_slide(pool, path, Direction::Up).await
}

/// POST .../slides/{slide}/down
pub async fn move_down(
    pool: web::Data<PgPool>,
    path: web::Path<(String, i64, i64)>,
) -> Result<HttpResponse, AppError> {
    move_slide(pool, path, Direction::Down).await
}

/// PUT .../slides/{slide}/image?filename=... with the raw image bytes as body.
///
/// The file is stored (under a fresh name if the filename is already taken),
/// the slide is pointed at it, and then the image is resized in place. A
/// resize failure is returned to the client but the slide keeps its new
/// (unresized) image.
pub async fn upload_image(
    pool: web::Data<PgPool>,
    config: web::Data<AppConfig>,
    path: web::Path<(String, i64, i64)>,
    query: web::Query<ImageQuery>,
    body: web::Bytes,
) -> Result<HttpResponse, AppError> {
    let (org_slug, presentation_id, slide_id) = path.into_inner();
    let (org, presentation, found) = load_slide(&pool, &org_slug, presentation_id, slide_id).await?;
    if body.is_empty() {
        return Err(AppError::Validation("image body is empty".into()));
    }

    let requested = media::upload_path(&org.slug, &presentation.slug, presentation.id, &query.filename)?;
    let media_root = config.media_root.clone();
    let stored = {
        let media_root = media_root.clone();
        web::block(move || media::store_upload(&media_root, &requested, &body))
            .await
            .map_err(|e| AppError::Io(std::io::Error::other(e)))??
    };
    let stored = stored
        .to_str()
        .ok_or_else(|| AppError::Validation("image path is not valid UTF-8".into()))?
        .to_string();

    let saved = slide::set_image(&pool, found.id, &stored).await?;

    let image = saved.image.clone();
    web::block(move || media::on_slide_saved(&media_root, image.as_deref()))
        .await
        .map_err(|e| AppError::Io(std::io::Error::other(e)))??;

    Ok(HttpResponse::Ok().json(saved))
}
