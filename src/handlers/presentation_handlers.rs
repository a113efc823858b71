use actix_web::{HttpResponse, web};
use serde::Serialize;
use sqlx::PgPool;

use crate::errors::AppError;
use crate::models::presentation::{self, NewPresentation, Presentation, PresentationUpdate};
use crate::models::slide::{self, Slide};
use crate::navigation::{NavCapabilities, ViewKind};
use super::{load_organisation, load_presentation};

#[derive(Serialize)]
pub struct PresentationListResponse {
    pub items: Vec<Presentation>,
    pub nav: NavCapabilities,
}

#[derive(Serialize)]
pub struct PresentationDetailResponse {
    pub presentation: Presentation,
    pub slides: Vec<Slide>,
    pub nav: NavCapabilities,
}

/// GET /organisations/{org}/presentations
pub async fn list(pool: web::Data<PgPool>, path: web::Path<String>) -> Result<HttpResponse, AppError> {
    let org_slug = path.into_inner();
    let org = load_organisation(&pool, &org_slug).await?;
    let items = presentation::list_ordered(&pool, org.id).await?;

    Ok(HttpResponse::Ok().json(PresentationListResponse {
        items,
        nav: ViewKind::PresentationList.capabilities(&org.slug),
    }))
}

/// POST /organisations/{org}/presentations
pub async fn create(
    pool: web::Data<PgPool>,
    path: web::Path<String>,
    body: web::Json<NewPresentation>,
) -> Result<HttpResponse, AppError> {
    let org = load_organisation(&pool, &path.into_inner()).await?;
    let created = presentation::create(&pool, org.id, &body).await?;
    Ok(HttpResponse::Created().json(created))
}

/// GET /organisations/{org}/presentations/{presentation}: presentation with its ordered slides.
pub async fn detail(
    pool: web::Data<PgPool>,
    path: web::Path<(String, i64)>,
) -> Result<HttpResponse, AppError> {
    let (org_slug, presentation_id) = path.into_inner();
    let (org, presentation) = load_presentation(&pool, &org_slug, presentation_id).await?;
    let slides = slide::list_ordered(&pool, presentation.id).await?;

    Ok(HttpResponse::Ok().json(PresentationDetailResponse {
        nav: ViewKind::PresentationDetail { presentation: presentation.id }.capabilities(&org.slug),
        presentation,
        slides,
    }))
}

/// PUT /organisations/{org}/presentations/{presentation}
pub async fn update(
    pool: web::Data<PgPool>,
    path: web::Path<(String, i64)>,
    body: web::Json<PresentationUpdate>,
) -> Result<HttpResponse, AppError> {
    let (org_slug, presentation_id) = path.into_inner();
    let (_, existing) = load_presentation(&pool, &org_slug, presentation_id).await?;
    let updated = presentation::update(&pool, existing.id, &body).await?;
    Ok(HttpResponse::Ok().json(updated))
}

/// DELETE /organisations/{org}/presentations/{presentation}
pub async fn delete(
    pool: web::Data<PgPool>,
    path: web::Path<(String, i64)>,
) -> Result<HttpResponse, AppError> {
    let (org_slug, presentation_id) = path.into_inner();
    let (_, existing) = load_presentation(&pool, &org_slug, presentation_id).await?;
    presentation::delete(&pool, existing.id).await?;
    Ok(HttpResponse::NoContent().finish())
}
