use crate::models::DbProfile;
use agenda_core::slug::slug_candidates;
use chrono::Utc;
use eyre::{Result, eyre};
use sqlx::{PgConnection, Pool, Postgres};
use uuid::Uuid;

// Upper bound on `base-N` probes before giving up on a slug.
const MAX_SLUG_ATTEMPTS: usize = 1000;

pub async fn get_profile_by_id(pool: &Pool<Postgres>, owner: Uuid) -> Result<Option<DbProfile>> {
    tracing::debug!("Getting profile for owner: {}", owner);

    let profile = sqlx::query_as::<_, DbProfile>(
        r#"
        SELECT id, business_name, unique_slug, created_at, updated_at
        FROM profiles
        WHERE id = $1
        "#,
    )
    .bind(owner)
    .fetch_optional(pool)
    .await?;

    Ok(profile)
}

pub async fn profile_exists(pool: &Pool<Postgres>, owner: Uuid) -> Result<bool> {
    let exists = sqlx::query_scalar::<_, bool>("SELECT EXISTS (SELECT 1 FROM profiles WHERE id = $1)")
        .bind(owner)
        .fetch_one(pool)
        .await?;

    Ok(exists)
}

async fn slug_taken(conn: &mut PgConnection, slug: &str) -> Result<bool> {
    let taken = sqlx::query_scalar::<_, bool>(
        "SELECT EXISTS (SELECT 1 FROM profiles WHERE unique_slug = $1)",
    )
    .bind(slug)
    .fetch_one(conn)
    .await?;

    Ok(taken)
}

/// Returns the first free slug among `base`, `base-1`, `base-2`, ...
pub async fn next_available_slug(conn: &mut PgConnection, base: &str) -> Result<String> {
    for candidate in slug_candidates(base).take(MAX_SLUG_ATTEMPTS) {
        if !slug_taken(&mut *conn, &candidate).await? {
            return Ok(candidate);
        }
    }
    Err(eyre!("No free slug found for base '{}'", base))
}

/// Creates the owner's profile or renames it
///
/// The slug is resolved only when the profile is created; renames keep it.
pub async fn upsert_profile(
    pool: &Pool<Postgres>,
    owner: Uuid,
    business_name: &str,
    base_slug: &str,
) -> Result<DbProfile> {
    let now = Utc::now();
    let mut tx = pool.begin().await?;

    let existing = sqlx::query_scalar::<_, Uuid>("SELECT id FROM profiles WHERE id = $1 FOR UPDATE")
        .bind(owner)
        .fetch_optional(&mut *tx)
        .await?;

    let profile = if existing.is_some() {
        tracing::debug!("Updating profile: owner={}, business_name={}", owner, business_name);
        sqlx::query_as::<_, DbProfile>(
            r#"
            UPDATE profiles
            SET business_name = $2, updated_at = $3
            WHERE id = $1
            RETURNING id, business_name, unique_slug, created_at, updated_at
            "#,
        )
        .bind(owner)
        .bind(business_name)
        .bind(now)
        .fetch_one(&mut *tx)
        .await?
    } else {
        let slug = next_available_slug(&mut *tx, base_slug).await?;
        tracing::debug!("Creating profile: owner={}, slug={}", owner, slug);

        // A concurrent first save for the same owner turns into a rename
        sqlx::query_as::<_, DbProfile>(
            r#"
            INSERT INTO profiles (id, business_name, unique_slug, created_at, updated_at)
            VALUES ($1, $2, $3, $4, $4)
            ON CONFLICT (id)
            DO UPDATE SET business_name = EXCLUDED.business_name, updated_at = EXCLUDED.updated_at
            RETURNING id, business_name, unique_slug, created_at, updated_at
            "#,
        )
        .bind(owner)
        .bind(business_name)
        .bind(&slug)
        .bind(now)
        .fetch_one(&mut *tx)
        .await?
    };

    tx.commit().await?;
    Ok(profile)
}
