use actix_web::{HttpResponse, web};
use sqlx::PgPool;

use crate::errors::AppError;
use crate::models::organisation;

/// GET /organisations
pub async fn list(pool: web::Data<PgPool>) -> Result<HttpResponse, AppError> {
    let organisations = organisation::list(&pool).await?;
    Ok(HttpResponse::Ok().json(organisations))
}
