use crate::models::DbService;
use chrono::Utc;
use eyre::Result;
use sqlx::{Pool, Postgres};
use uuid::Uuid;

// Every query filters on profile_id = owner; ids alone never address a row.

pub async fn list_services(pool: &Pool<Postgres>, owner: Uuid) -> Result<Vec<DbService>> {
    let services = sqlx::query_as::<_, DbService>(
        r#"
        SELECT id, profile_id, name, duration, created_at, updated_at
        FROM services
        WHERE profile_id = $1
        ORDER BY created_at DESC
        "#,
    )
    .bind(owner)
    .fetch_all(pool)
    .await?;

    Ok(services)
}

pub async fn get_service(pool: &Pool<Postgres>, owner: Uuid, id: Uuid) -> Result<Option<DbService>> {
    let service = sqlx::query_as::<_, DbService>(
        r#"
        SELECT id, profile_id, name, duration, created_at, updated_at
        FROM services
        WHERE id = $1 AND profile_id = $2
        "#,
    )
    .bind(id)
    .bind(owner)
    .fetch_optional(pool)
    .await?;

    Ok(service)
}

pub async fn create_service(
    pool: &Pool<Postgres>,
    owner: Uuid,
    name: &str,
    duration: i32,
) -> Result<DbService> {
    let id = Uuid::new_v4();
    let now = Utc::now();

    tracing::debug!("Creating service: id={}, owner={}, name={}, duration={}", id, owner, name, duration);

    let service = sqlx::query_as::<_, DbService>(
        r#"
        INSERT INTO services (id, profile_id, name, duration, created_at, updated_at)
        VALUES ($1, $2, $3, $4, $5, $5)
        RETURNING id, profile_id, name, duration, created_at, updated_at
        "#,
    )
    .bind(id)
    .bind(owner)
    .bind(name)
    .bind(duration)
    .bind(now)
    .fetch_one(pool)
    .await?;

    Ok(service)
}

/// Returns `None` when no service with this id belongs to `owner`
pub async fn update_service(
    pool: &Pool<Postgres>,
    owner: Uuid,
    id: Uuid,
    name: &str,
    duration: i32,
) -> Result<Option<DbService>> {
    let service = sqlx::query_as::<_, DbService>(
        r#"
        UPDATE services
        SET name = $3, duration = $4, updated_at = $5
        WHERE id = $1 AND profile_id = $2
        RETURNING id, profile_id, name, duration, created_at, updated_at
        "#,
    )
    .bind(id)
    .bind(owner)
    .bind(name)
    .bind(duration)
    .bind(Utc::now())
    .fetch_optional(pool)
    .await?;

    Ok(service)
}

/// Returns whether a row was deleted
pub async fn delete_service(pool: &Pool<Postgres>, owner: Uuid, id: Uuid) -> Result<bool> {
    let result = sqlx::query(
        r#"
        DELETE FROM services
        WHERE id = $1 AND profile_id = $2
        "#,
    )
    .bind(id)
    .bind(owner)
    .execute(pool)
    .await?;

    Ok(result.rows_affected() > 0)
}
