//! Slide ordering against the database: position assignment on create,
//! re-sequencing on delete, neighbour lookup and moving slides.

#[macro_use]
mod common;

use quizdeck::models::slide::{self, NewSlide, Slide};
use quizdeck::ordering::{Direction, Reposition};
use common::*;

async fn add_slide(pool: &sqlx::PgPool, presentation_id: i64, description: &str) -> Slide {
    slide::create(
        pool,
        presentation_id,
        &NewSlide {
            description: description.to_string(),
            ..Default::default()
        },
    )
    .await
    .expect("Failed to create slide")
}

fn positions(slides: &[Slide]) -> Vec<(String, i64)> {
    slides
        .iter()
        .map(|s| (s.description.clone(), s.position))
        .collect()
}

#[tokio::test]
async fn test_create_appends_to_presentation() {
    let db = require_db!();
    let pool = db.pool();
    let org = create_test_org(pool).await;
    let deck = create_test_presentation(pool, org.id, "Deck").await;

    let a = add_slide(pool, deck.id, "a").await;
    let b = add_slide(pool, deck.id, "b").await;
    let c = add_slide(pool, deck.id, "c").await;
    assert_eq!((a.position, b.position, c.position), (1, 2, 3));

    let d = add_slide(pool, deck.id, "d").await;
    assert_eq!(d.position, 4);
}

#[tokio::test]
async fn test_positions_are_independent_per_presentation() {
    let db = require_db!();
    let pool = db.pool();
    let org = create_test_org(pool).await;
    let first = create_test_presentation(pool, org.id, "First").await;
    let second = create_test_presentation(pool, org.id, "Second").await;

    add_slide(pool, first.id, "a").await;
    add_slide(pool, first.id, "b").await;
    let other = add_slide(pool, second.id, "x").await;

    assert_eq!(other.position, 1);
}

#[tokio::test]
async fn test_explicit_position_is_kept() {
    let db = require_db!();
    let pool = db.pool();
    let org = create_test_org(pool).await;
    let deck = create_test_presentation(pool, org.id, "Deck").await;

    let placed = slide::create(
        pool,
        deck.id,
        &NewSlide {
            description: "placed".into(),
            position: Some(5),
            ..Default::default()
        },
    )
    .await
    .unwrap();
    assert_eq!(placed.position, 5);
}

#[tokio::test]
async fn test_list_ordered_is_ascending() {
    let db = require_db!();
    let pool = db.pool();
    let org = create_test_org(pool).await;
    let deck = create_test_presentation(pool, org.id, "Deck").await;

    assert!(slide::list_ordered(pool, deck.id).await.unwrap().is_empty());

    for name in ["a", "b", "c"] {
        add_slide(pool, deck.id, name).await;
    }
    let slides = slide::list_ordered(pool, deck.id).await.unwrap();
    assert_eq!(
        positions(&slides),
        vec![("a".to_string(), 1), ("b".to_string(), 2), ("c".to_string(), 3)]
    );
}

#[tokio::test]
async fn test_delete_resequences_remaining_slides() {
    let db = require_db!();
    let pool = db.pool();
    let org = create_test_org(pool).await;
    let deck = create_test_presentation(pool, org.id, "Deck").await;

    let _a = add_slide(pool, deck.id, "a").await;
    let b = add_slide(pool, deck.id, "b").await;
    let c = add_slide(pool, deck.id, "c").await;
    let d = add_slide(pool, deck.id, "d").await;

    let plan = slide::delete(pool, b.id).await.unwrap();
    assert_eq!(
        plan,
        vec![
            Reposition { id: c.id, from: 3, to: 2 },
            Reposition { id: d.id, from: 4, to: 3 },
        ]
    );

    let slides = slide::list_ordered(pool, deck.id).await.unwrap();
    assert_eq!(
        positions(&slides),
        vec![("a".to_string(), 1), ("c".to_string(), 2), ("d".to_string(), 3)]
    );
    assert!(slide::find_by_id(pool, b.id).await.unwrap().is_none());
}

#[tokio::test]
async fn test_delete_last_slide_changes_nothing_else() {
    let db = require_db!();
    let pool = db.pool();
    let org = create_test_org(pool).await;
    let deck = create_test_presentation(pool, org.id, "Deck").await;

    add_slide(pool, deck.id, "a").await;
    let last = add_slide(pool, deck.id, "b").await;

    let plan = slide::delete(pool, last.id).await.unwrap();
    assert!(plan.is_empty());
}

#[tokio::test]
async fn test_delete_missing_slide_is_not_found() {
    let db = require_db!();
    let pool = db.pool();

    let err = slide::delete(pool, i64::MAX).await.unwrap_err();
    assert!(matches!(err, quizdeck::errors::AppError::NotFound));
}

#[tokio::test]
async fn test_neighbors() {
    let db = require_db!();
    let pool = db.pool();
    let org = create_test_org(pool).await;
    let deck = create_test_presentation(pool, org.id, "Deck").await;

    let a = add_slide(pool, deck.id, "a").await;
    let b = add_slide(pool, deck.id, "b").await;
    let c = add_slide(pool, deck.id, "c").await;

    assert!(slide::previous_of(pool, &a).await.unwrap().is_none());
    assert!(slide::next_of(pool, &c).await.unwrap().is_none());

    let around_b = slide::with_neighbors(pool, b.clone()).await.unwrap();
    assert_eq!(around_b.previous.map(|s| s.id), Some(a.id));
    assert_eq!(around_b.next.map(|s| s.id), Some(c.id));
}

#[tokio::test]
async fn test_neighbors_skip_gaps() {
    let db = require_db!();
    let pool = db.pool();
    let org = create_test_org(pool).await;
    let deck = create_test_presentation(pool, org.id, "Deck").await;

    let mk = |pos: i64, name: &'static str| NewSlide {
        description: name.into(),
        position: Some(pos),
        ..Default::default()
    };
    let low = slide::create(pool, deck.id, &mk(2, "low")).await.unwrap();
    let mid = slide::create(pool, deck.id, &mk(7, "mid")).await.unwrap();
    let high = slide::create(pool, deck.id, &mk(20, "high")).await.unwrap();

    assert_eq!(slide::previous_of(pool, &mid).await.unwrap().map(|s| s.id), Some(low.id));
    assert_eq!(slide::next_of(pool, &mid).await.unwrap().map(|s| s.id), Some(high.id));
}

#[tokio::test]
async fn test_move_slide_swaps_with_neighbor() {
    let db = require_db!();
    let pool = db.pool();
    let org = create_test_org(pool).await;
    let deck = create_test_presentation(pool, org.id, "Deck").await;

    let a = add_slide(pool, deck.id, "a").await;
    let b = add_slide(pool, deck.id, "b").await;
    add_slide(pool, deck.id, "c").await;

    assert!(slide::move_slide(pool, b.id, Direction::Up).await.unwrap());
    let slides = slide::list_ordered(pool, deck.id).await.unwrap();
    assert_eq!(
        positions(&slides),
        vec![("b".to_string(), 1), ("a".to_string(), 2), ("c".to_string(), 3)]
    );

    // already first
    assert!(!slide::move_slide(pool, b.id, Direction::Up).await.unwrap());
    assert!(slide::move_slide(pool, a.id, Direction::Down).await.unwrap());
    let slides = slide::list_ordered(pool, deck.id).await.unwrap();
    assert_eq!(
        positions(&slides),
        vec![("b".to_string(), 1), ("c".to_string(), 2), ("a".to_string(), 3)]
    );
}

#[tokio::test]
async fn test_create_in_missing_presentation_is_not_found() {
    let db = require_db!();
    let pool = db.pool();

    let err = slide::create(pool, i64::MAX, &NewSlide::default()).await.unwrap_err();
    assert!(matches!(err, quizdeck::errors::AppError::NotFound));
}

#[tokio::test]
async fn test_concurrent_creates_get_distinct_positions() {
    let db = require_db!();
    let pool = db.pool().clone();
    let org = create_test_org(&pool).await;
    let deck = create_test_presentation(&pool, org.id, "Deck").await;

    let mut tasks = tokio::task::JoinSet::new();
    for n in 0..8 {
        let pool = pool.clone();
        let deck_id = deck.id;
        tasks.spawn(async move {
            let new = NewSlide {
                description: format!("slide {n}"),
                ..Default::default()
            };
            slide::create(&pool, deck_id, &new).await
        });
    }

    let mut created = Vec::new();
    while let Some(joined) = tasks.join_next().await {
        created.push(joined.expect("create task panicked").expect("Failed to create slide").position);
    }
    created.sort_unstable();
    assert_eq!(created, (1..=8).collect::<Vec<i64>>());
}

#[tokio::test]
async fn test_concurrent_deletes_leave_dense_positions() {
    let db = require_db!();
    let pool = db.pool().clone();
    let org = create_test_org(&pool).await;
    let deck = create_test_presentation(&pool, org.id, "Deck").await;

    let mut slides = Vec::new();
    for name in ["a", "b", "c", "d", "e", "f"] {
        slides.push(add_slide(&pool, deck.id, name).await);
    }

    let mut tasks = tokio::task::JoinSet::new();
    for doomed in [&slides[0], &slides[2], &slides[4]] {
        let pool = pool.clone();
        let id = doomed.id;
        tasks.spawn(async move { slide::delete(&pool, id).await });
    }
    while let Some(joined) = tasks.join_next().await {
        joined.expect("delete task panicked").expect("Failed to delete slide");
    }

    let remaining = slide::list_ordered(&pool, deck.id).await.unwrap();
    assert_eq!(
        positions(&remaining),
        vec![("b".to_string(), 1), ("d".to_string(), 2), ("f".to_string(), 3)]
    );
}
