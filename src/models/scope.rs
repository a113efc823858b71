//! SQL side of the ordering rules in [`crate::ordering`]: every ordered table
//! is described by a [`Scope`] and shares the same locking, counting,
//! re-sequencing and swapping queries.
//!
//! All functions take a `PgConnection` so callers can run them inside the
//! transaction that also performs the insert or delete.

use sqlx::PgConnection;

use crate::errors::AppError;
use crate::ordering::{self, Direction, Positioned, Reposition};

/// An ordered child table and the parent it is scoped by.
#[derive(Debug, Clone, Copy)]
pub struct Scope {
    pub table: &'static str,
    pub parent_table: &'static str,
    pub parent_column: &'static str,
}

pub const PRESENTATIONS: Scope = Scope {
    table: "presentations",
    parent_table: "organisations",
    parent_column: "organisation_id",
};

pub const SLIDES: Scope = Scope {
    table: "slides",
    parent_table: "presentations",
    parent_column: "presentation_id",
};

pub const ANSWERS: Scope = Scope {
    table: "answers",
    parent_table: "questions",
    parent_column: "question_id",
};

#[derive(Debug, Clone, sqlx::FromRow)]
pub struct PositionRow {
    pub id: i64,
    pub position: i64,
}

impl Positioned for PositionRow {
    fn id(&self) -> i64 {
        self.id
    }
    fn position(&self) -> i64 {
        self.position
    }
}

/// Take a row lock on the parent so concurrent creates/deletes in the same
/// scope run one after another. Fails with `NotFound` if the parent is gone.
pub async fn lock_parent(conn: &mut PgConnection, scope: Scope, parent_id: i64) -> Result<(), AppError> {
    let sql = format!("SELECT id FROM {} WHERE id = $1 FOR UPDATE", scope.parent_table);
    sqlx::query_scalar::<_, i64>(&sql)
        .bind(parent_id)
        .fetch_optional(&mut *conn)
        .await?
        .ok_or(AppError::NotFound)?;
    Ok(())
}

pub async fn count_siblings(conn: &mut PgConnection, scope: Scope, parent_id: i64) -> Result<i64, AppError> {
    let sql = format!("SELECT COUNT(*) FROM {} WHERE {} = $1", scope.table, scope.parent_column);
    let count = sqlx::query_scalar::<_, i64>(&sql)
        .bind(parent_id)
        .fetch_one(&mut *conn)
        .await?;
    Ok(count)
}

/// Position a new record should get: the explicit one if set, else count + 1.
pub async fn assign_position(
    conn: &mut PgConnection,
    scope: Scope,
    parent_id: i64,
    requested: Option<i64>,
) -> Result<i64, AppError> {
    let count = count_siblings(conn, scope, parent_id).await?;
    let position = ordering::assign_position(requested, count);
    log::debug!(
        "Assigned position {} in {} {} ({} existing)",
        position,
        scope.parent_table,
        parent_id,
        count
    );
    Ok(position)
}

pub async fn sibling_positions(
    conn: &mut PgConnection,
    scope: Scope,
    parent_id: i64,
) -> Result<Vec<PositionRow>, AppError> {
    let sql = format!(
        "SELECT id, position FROM {} WHERE {} = $1 ORDER BY position, id",
        scope.table, scope.parent_column
    );
    let rows = sqlx::query_as::<_, PositionRow>(&sql)
        .bind(parent_id)
        .fetch_all(&mut *conn)
        .await?;
    Ok(rows)
}

pub async fn apply_repositions(
    conn: &mut PgConnection,
    scope: Scope,
    plan: &[Reposition],
) -> Result<(), AppError> {
    let sql = format!(
        "UPDATE {} SET position = $1, modified_at = NOW() WHERE id = $2",
        scope.table
    );
    for change in plan {
        sqlx::query(&sql)
            .bind(change.to)
            .bind(change.id)
            .execute(&mut *conn)
            .await?;
    }
    Ok(())
}

/// Renumber the surviving siblings of `parent_id` to 1..N in their current order.
pub async fn resequence(
    conn: &mut PgConnection,
    scope: Scope,
    parent_id: i64,
) -> Result<Vec<Reposition>, AppError> {
    let siblings = sibling_positions(conn, scope, parent_id).await?;
    let plan = ordering::resequence(&siblings);
    apply_repositions(conn, scope, &plan).await?;
    if !plan.is_empty() {
        log::info!(
            "Re-sequenced {} of {} {} in {} {}",
            plan.len(),
            siblings.len(),
            scope.table,
            scope.parent_table,
            parent_id
        );
    }
    Ok(plan)
}

/// Swap the record with its neighbour in `direction`. Returns false when it
/// is already at that end.
pub async fn move_within(
    conn: &mut PgConnection,
    scope: Scope,
    parent_id: i64,
    id: i64,
    direction: Direction,
) -> Result<bool, AppError> {
    let siblings = sibling_positions(conn, scope, parent_id).await?;
    let current = siblings
        .iter()
        .find(|s| s.id == id)
        .ok_or(AppError::NotFound)?;

    match ordering::swap_plan(&siblings, current, direction) {
        Some(plan) => {
            apply_repositions(conn, scope, &plan).await?;
            Ok(true)
        }
        None => Ok(false),
    }
}

/// Parent id of a child row, or `NotFound`.
pub async fn parent_of(conn: &mut PgConnection, scope: Scope, id: i64) -> Result<i64, AppError> {
    let sql = format!("SELECT {} FROM {} WHERE id = $1", scope.parent_column, scope.table);
    sqlx::query_scalar::<_, i64>(&sql)
        .bind(id)
        .fetch_optional(&mut *conn)
        .await?
        .ok_or(AppError::NotFound)
}
