use eyre::Result;
use sqlx::{Pool, Postgres};
use tracing::info;

pub async fn initialize_database(pool: &Pool<Postgres>) -> Result<()> {
    info!("Initializing database schema...");

    // Create profiles table; the id is the owner's identity
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS profiles (
            id UUID PRIMARY KEY,
            business_name VARCHAR(100) NOT NULL,
            unique_slug VARCHAR(64) NOT NULL UNIQUE,
            created_at TIMESTAMP WITH TIME ZONE NOT NULL DEFAULT NOW(),
            updated_at TIMESTAMP WITH TIME ZONE NOT NULL DEFAULT NOW()
        );
        "#,
    )
    .execute(pool)
    .await?;

    // Create services table
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS services (
            id UUID PRIMARY KEY DEFAULT gen_random_uuid(),
            profile_id UUID NOT NULL REFERENCES profiles(id) ON DELETE CASCADE,
            name VARCHAR(100) NOT NULL,
            duration INTEGER NOT NULL,
            created_at TIMESTAMP WITH TIME ZONE NOT NULL DEFAULT NOW(),
            updated_at TIMESTAMP WITH TIME ZONE NOT NULL DEFAULT NOW(),
            CONSTRAINT valid_duration CHECK (duration BETWEEN 15 AND 480)
        );
        "#,
    )
    .execute(pool)
    .await?;

    // Create availabilities table
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS availabilities (
            id UUID PRIMARY KEY DEFAULT gen_random_uuid(),
            profile_id UUID NOT NULL REFERENCES profiles(id) ON DELETE CASCADE,
            day_of_week SMALLINT NOT NULL,
            start_time VARCHAR(5) NOT NULL,
            end_time VARCHAR(5) NOT NULL,
            created_at TIMESTAMP WITH TIME ZONE NOT NULL DEFAULT NOW(),
            CONSTRAINT valid_day_of_week CHECK (day_of_week BETWEEN 0 AND 6),
            CONSTRAINT valid_start_time CHECK (start_time ~ '^([01][0-9]|2[0-3]):[0-5][0-9]$'),
            CONSTRAINT valid_end_time CHECK (end_time ~ '^([01][0-9]|2[0-3]):[0-5][0-9]$'),
            CONSTRAINT valid_time_range CHECK (start_time COLLATE "C" < end_time COLLATE "C")
        );
        "#,
    )
    .execute(pool)
    .await?;

    // Create indexes, one statement each since prepared statements reject batches
    let indexes = [
        "CREATE INDEX IF NOT EXISTS idx_services_profile_id ON services(profile_id)",
        "CREATE INDEX IF NOT EXISTS idx_services_created_at ON services(profile_id, created_at)",
        "CREATE INDEX IF NOT EXISTS idx_availabilities_profile_day ON availabilities(profile_id, day_of_week)",
    ];
    for statement in indexes {
        sqlx::query(statement).execute(pool).await?;
    }

    info!("Database schema initialized successfully.");
    Ok(())
}
