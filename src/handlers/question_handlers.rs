use actix_web::{HttpRequest, HttpResponse, web};
use serde::{Deserialize, Serialize};
use sqlx::PgPool;

use crate::errors::AppError;
use crate::models::answer::{self, Answer};
use crate::models::question::{self, NewQuestion, Question, QuestionPage};
use crate::models::user_answer::{self, Selection, UserAnswer};
use crate::navigation::{NavCapabilities, ViewKind};
use super::{load_organisation, load_question, user_id};

#[derive(Deserialize)]
pub struct PageQuery {
    pub page: Option<i64>,
    pub per_page: Option<i64>,
}

#[derive(Serialize)]
pub struct QuestionListResponse {
    #[serde(flatten)]
    pub page: QuestionPage,
    pub nav: NavCapabilities,
}

#[derive(Serialize)]
pub struct QuestionDetailResponse {
    pub question: Question,
    pub answers: Vec<Answer>,
    pub nav: NavCapabilities,
}

#[derive(Deserialize)]
pub struct SubmissionRequest {
    pub selections: Vec<Selection>,
}

#[derive(Serialize)]
pub struct SubmissionResponse {
    pub recorded: Vec<UserAnswer>,
}

/// GET /organisations/{org}/questions?page=&per_page=
pub async fn list(
    pool: web::Data<PgPool>,
    path: web::Path<String>,
    query: web::Query<PageQuery>,
) -> Result<HttpResponse, AppError> {
    let org = load_organisation(&pool, &path.into_inner()).await?;
    let page = question::list_for_organisation(
        &pool,
        org.id,
        query.page.unwrap_or(1),
        query.per_page.unwrap_or(25),
    )
    .await?;

    Ok(HttpResponse::Ok().json(QuestionListResponse {
        page,
        nav: ViewKind::QuestionList.capabilities(&org.slug),
    }))
}

/// POST /organisations/{org}/questions
pub async fn create(
    pool: web::Data<PgPool>,
    path: web::Path<String>,
    body: web::Json<NewQuestion>,
) -> Result<HttpResponse, AppError> {
    let org = load_organisation(&pool, &path.into_inner()).await?;
    let created = question::create(&pool, Some(org.id), &body).await?;
    Ok(HttpResponse::Created().json(created))
}

/// GET /organisations/{org}/questions/{question}: question with its ordered answers.
pub async fn detail(
    pool: web::Data<PgPool>,
    path: web::Path<(String, i64)>,
) -> Result<HttpResponse, AppError> {
    let (org_slug, question_id) = path.into_inner();
    let (org, found) = load_question(&pool, &org_slug, question_id).await?;
    let answers = answer::list_ordered(&pool, found.id).await?;

    Ok(HttpResponse::Ok().json(QuestionDetailResponse {
        nav: ViewKind::QuestionDetail { question: found.id }.capabilities(&org.slug),
        question: found,
        answers,
    }))
}

/// PUT /organisations/{org}/questions/{question}
pub async fn update(
    pool: web::Data<PgPool>,
    path: web::Path<(String, i64)>,
    body: web::Json<NewQuestion>,
) -> Result<HttpResponse, AppError> {
    let (org_slug, question_id) = path.into_inner();
    let (_, found) = load_question(&pool, &org_slug, question_id).await?;
    let updated = question::update(&pool, found.id, &body).await?;
    Ok(HttpResponse::Ok().json(updated))
}

/// DELETE /organisations/{org}/questions/{question}
pub async fn delete(
    pool: web::Data<PgPool>,
    path: web::Path<(String, i64)>,
) -> Result<HttpResponse, AppError> {
    let (org_slug, question_id) = path.into_inner();
    let (_, found) = load_question(&pool, &org_slug, question_id).await?;
    question::delete(&pool, found.id).await?;
    Ok(HttpResponse::NoContent().finish())
}

/// POST /organisations/{org}/questions/{question}/submissions
pub async fn submit(
    req: HttpRequest,
    pool: web::Data<PgPool>,
    path: web::Path<(String, i64)>,
    body: web::Json<SubmissionRequest>,
) -> Result<HttpResponse, AppError> {
    let user = user_id(&req)?;
    let (org_slug, question_id) = path.into_inner();
    let (_, found) = load_question(&pool, &org_slug, question_id).await?;
    let recorded = user_answer::submit(&pool, user, found.id, &body.selections).await?;
    Ok(HttpResponse::Created().json(SubmissionResponse { recorded }))
}
