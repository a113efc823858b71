use actix_web::{HttpResponse, web};
use serde::Serialize;
use sqlx::PgPool;

use crate::errors::AppError;
use crate::models::answer::{self, Answer, AnswerUpdate, AnswerWithNeighbors, NewAnswer};
use crate::models::question::Question;
use crate::navigation::{NavCapabilities, ViewKind};
use crate::ordering::{Direction, Reposition};
use super::load_question;

#[derive(Serialize)]
pub struct AnswerDetailResponse {
    #[serde(flatten)]
    pub answer: AnswerWithNeighbors,
    pub nav: NavCapabilities,
}

#[derive(Serialize)]
pub struct AnswerFormResponse {
    pub question: Question,
    pub nav: NavCapabilities,
}

#[derive(Serialize)]
pub struct DeleteResponse {
    pub resequenced: Vec<Reposition>,
}

#[derive(Serialize)]
pub struct MoveResponse {
    pub moved: bool,
    pub answers: Vec<Answer>,
}

async fn load_answer(
    pool: &PgPool,
    org_slug: &str,
    question_id: i64,
    answer_id: i64,
) -> Result<(String, Question, Answer), AppError> {
    let (org, question) = load_question(pool, org_slug, question_id).await?;
    let found = answer::find_in_question(pool, question.id, answer_id)
        .await?
        .ok_or(AppError::NotFound)?;
    Ok((org.slug, question, found))
}

/// GET .../answers/new: context for the new-answer form.
pub async fn new_form(
    pool: web::Data<PgPool>,
    path: web::Path<(String, i64)>,
) -> Result<HttpResponse, AppError> {
    let (org_slug, question_id) = path.into_inner();
    let (org, question) = load_question(&pool, &org_slug, question_id).await?;
    let nav = ViewKind::AnswerNew { question: question.id }.capabilities(&org.slug);
    Ok(HttpResponse::Ok().json(AnswerFormResponse { question, nav }))
}

/// POST /organisations/{org}/questions/{question}/answers
pub async fn create(
    pool: web::Data<PgPool>,
    path: web::Path<(String, i64)>,
    body: web::Json<NewAnswer>,
) -> Result<HttpResponse, AppError> {
    let (org_slug, question_id) = path.into_inner();
    let (_, question) = load_question(&pool, &org_slug, question_id).await?;
    let created = answer::create(&pool, question.id, &body).await?;
    Ok(HttpResponse::Created().json(created))
}

/// GET .../answers/{answer}
pub async fn detail(
    pool: web::Data<PgPool>,
    path: web::Path<(String, i64, i64)>,
) -> Result<HttpResponse, AppError> {
    let (org_slug, question_id, answer_id) = path.into_inner();
    let (org_slug, question, found) = load_answer(&pool, &org_slug, question_id, answer_id).await?;
    let nav = ViewKind::AnswerDetail {
        question: question.id,
        answer: found.id,
    }
    .capabilities(&org_slug);
    let answer = answer::with_neighbors(&pool, found).await?;

    Ok(HttpResponse::Ok().json(AnswerDetailResponse { answer, nav }))
}

/// PUT .../answers/{answer}
pub async fn update(
    pool: web::Data<PgPool>,
    path: web::Path<(String, i64, i64)>,
    body: web::Json<AnswerUpdate>,
) -> Result<HttpResponse, AppError> {
    let (org_slug, question_id, answer_id) = path.into_inner();
    let (_, _, found) = load_answer(&pool, &org_slug, question_id, answer_id).await?;
    let updated = answer::update(&pool, found.id, &body).await?;
    Ok(HttpResponse::Ok().json(updated))
}

/// DELETE .../answers/{answer}
pub async fn delete(
    pool: web::Data<PgPool>,
    path: web::Path<(String, i64, i64)>,
) -> Result<HttpResponse, AppError> {
    let (org_slug, question_id, answer_id) = path.into_inner();
    let (_, _, found) = load_answer(&pool, &org_slug, question_id, answer_id).await?;
    let resequenced = answer::delete(&pool, found.id).await?;
    Ok(HttpResponse::Ok().json(DeleteResponse { resequenced }))
}

async fn move_answer(
    pool: web::Data<PgPool>,
    path: web::Path<(String, i64, i64)>,
    direction: Direction,
) -> Result<HttpResponse, AppError> {
    let (org_slug, question_id, answer_id) = path.into_inner();
    let (_, question, found) = load_answer(&pool, &org_slug, question_id, answer_id).await?;
    let moved = answer::move_answer(&pool, found.id, direction).await?;
    let answers = answer::list_ordered(&pool, question.id).await?;
    Ok(HttpResponse::Ok().json(MoveResponse { moved, answers }))
}

/// POST .../answers/{answer}/up
pub async fn move_up(
    pool: web::Data<PgPool>,
    path: web::Path<(String, i64, i64)>,
) -> Result<HttpResponse, AppError> {
    move_answer(pool, path, Direction::Up).await
}

/// POST .../answers/{answer}/down
pub async fn move_down(
    pool: web::Data<PgPool>,
    path: web::Path<(String, i64, i64)>,
) -> Result<HttpResponse, AppError> {
    move_answer(pool, path, Direction::Down).await
}
