use crate::models::DbAvailability;
use agenda_core::models::availability::NewAvailability;
use chrono::Utc;
use eyre::Result;
use sqlx::{Pool, Postgres};
use uuid::Uuid;

pub async fn list_availabilities(pool: &Pool<Postgres>, owner: Uuid) -> Result<Vec<DbAvailability>> {
    let availabilities = sqlx::query_as::<_, DbAvailability>(
        r#"
        SELECT id, profile_id, day_of_week, start_time, end_time, created_at
        FROM availabilities
        WHERE profile_id = $1
        ORDER BY day_of_week ASC, start_time ASC
        "#,
    )
    .bind(owner)
    .fetch_all(pool)
    .await?;

    Ok(availabilities)
}

/// Replaces the owner's whole availability set
///
/// The delete and the batch insert share one transaction: if the insert
/// fails, the previous set is still there.
pub async fn replace_availabilities(
    pool: &Pool<Postgres>,
    owner: Uuid,
    entries: &[NewAvailability],
) -> Result<Vec<DbAvailability>> {
    let mut tx = pool.begin().await?;

    let deleted = sqlx::query(
        r#"
        DELETE FROM availabilities
        WHERE profile_id = $1
        "#,
    )
    .bind(owner)
    .execute(&mut *tx)
    .await?
    .rows_affected();

    let mut inserted = if entries.is_empty() {
        Vec::new()
    } else {
        let ids: Vec<Uuid> = entries.iter().map(|_| Uuid::new_v4()).collect();
        let days: Vec<i16> = entries.iter().map(|e| e.day_of_week).collect();
        let starts: Vec<String> = entries.iter().map(|e| e.start_time.clone()).collect();
        let ends: Vec<String> = entries.iter().map(|e| e.end_time.clone()).collect();

        sqlx::query_as::<_, DbAvailability>(
            r#"
            INSERT INTO availabilities (id, profile_id, day_of_week, start_time, end_time, created_at)
            SELECT batch.id, $2, batch.day_of_week, batch.start_time, batch.end_time, $6
            FROM UNNEST($1::uuid[], $3::int2[], $4::text[], $5::text[])
                AS batch(id, day_of_week, start_time, end_time)
            RETURNING id, profile_id, day_of_week, start_time, end_time, created_at
            "#,
        )
        .bind(&ids)
        .bind(owner)
        .bind(&days)
        .bind(&starts)
        .bind(&ends)
        .bind(Utc::now())
        .fetch_all(&mut *tx)
        .await?
    };

    tx.commit().await?;

    tracing::debug!(
        "Replaced availability: owner={}, removed={}, inserted={}",
        owner,
        deleted,
        inserted.len()
    );

    // RETURNING order is unspecified
    inserted.sort_by(|a, b| (a.day_of_week, &a.start_time).cmp(&(b.day_of_week, &b.start_time)));
    Ok(inserted)
}
