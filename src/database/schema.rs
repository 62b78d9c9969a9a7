use crate::database::{DatabaseError, Result};
/// Database schema definitions. Embedded collections (family members, result
/// lines, poll options, tags) live in `*_json` text columns; the original
/// system kept them as subdocuments and nothing joins against them.
use sqlx::SqlitePool;

pub async fn create_schema(pool: &SqlitePool) -> Result<()> {
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS candidates (
            id TEXT PRIMARY KEY,
            name TEXT NOT NULL,
            name_bn TEXT,
            party TEXT NOT NULL,
            constituency TEXT NOT NULL,
            photo_url TEXT,
            biography TEXT,
            education TEXT,
            occupation TEXT,
            assets TEXT,
            liabilities TEXT,
            criminal_cases TEXT,
            family_json TEXT NOT NULL DEFAULT '[]',
            media_json TEXT NOT NULL DEFAULT '[]',
            created_at TEXT NOT NULL,
            updated_at TEXT NOT NULL
        )
        "#,
    )
    .execute(pool)
    .await?;

    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS elections (
            id TEXT PRIMARY KEY,
            parliament INTEGER NOT NULL UNIQUE,
            name TEXT NOT NULL,
            date TEXT NOT NULL,
            results_json TEXT NOT NULL DEFAULT '[]',
            stats_json TEXT
        )
        "#,
    )
    .execute(pool)
    .await?;

    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS constituencies (
            id TEXT PRIMARY KEY,
            seat INTEGER NOT NULL UNIQUE,
            name TEXT NOT NULL,
            division TEXT NOT NULL,
            district TEXT NOT NULL,
            results_json TEXT NOT NULL DEFAULT '[]',
            stats_json TEXT
        )
        "#,
    )
    .execute(pool)
    .await?;

    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS alliances (
            id TEXT PRIMARY KEY,
            party TEXT NOT NULL,
            alliance TEXT NOT NULL,
            candidate_count INTEGER NOT NULL DEFAULT 0,
            parliament INTEGER NOT NULL
        )
        "#,
    )
    .execute(pool)
    .await?;

    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS polls (
            id TEXT PRIMARY KEY,
            question_en TEXT NOT NULL,
            question_bn TEXT NOT NULL,
            options_json TEXT NOT NULL DEFAULT '[]',
            open INTEGER NOT NULL DEFAULT 1,
            created_at TEXT NOT NULL
        )
        "#,
    )
    .execute(pool)
    .await?;

    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS posts (
            id TEXT PRIMARY KEY,
            slug TEXT NOT NULL UNIQUE,
            title TEXT NOT NULL,
            body TEXT NOT NULL,
            cover_url TEXT,
            tags_json TEXT NOT NULL DEFAULT '[]',
            published INTEGER NOT NULL DEFAULT 0,
            published_at TEXT
        )
        "#,
    )
    .execute(pool)
    .await?;

    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS admins (
            id TEXT PRIMARY KEY,
            email TEXT NOT NULL UNIQUE,
            name TEXT NOT NULL,
            verification_code TEXT,
            code_expires_at TEXT,
            created_at TEXT NOT NULL
        )
        "#,
    )
    .execute(pool)
    .await?;

    create_indexes(pool).await?;

    Ok(())
}

async fn create_indexes(pool: &SqlitePool) -> Result<()> {
    let indexes = vec![
        "CREATE INDEX IF NOT EXISTS idx_candidates_party ON candidates(party)",
        "CREATE INDEX IF NOT EXISTS idx_candidates_constituency ON candidates(constituency)",
        "CREATE INDEX IF NOT EXISTS idx_constituencies_division ON constituencies(division)",
        "CREATE INDEX IF NOT EXISTS idx_constituencies_district ON constituencies(district)",
        "CREATE INDEX IF NOT EXISTS idx_alliances_parliament ON alliances(parliament)",
        "CREATE INDEX IF NOT EXISTS idx_posts_published ON posts(published)",
    ];

    for index_sql in indexes {
        sqlx::query(index_sql).execute(pool).await?;
    }

    Ok(())
}

/// Verify that every expected table exists.
pub async fn verify_schema(pool: &SqlitePool) -> Result<()> {
    let tables: Vec<String> =
        sqlx::query_scalar("SELECT name FROM sqlite_master WHERE type='table' ORDER BY name")
            .fetch_all(pool)
            .await?;

    let expected_tables = vec![
        "admins",
        "alliances",
        "candidates",
        "constituencies",
        "elections",
        "polls",
        "posts",
    ];

    for expected in &expected_tables {
        if !tables.iter().any(|name| name == expected) {
            return Err(DatabaseError::Integrity(format!(
                "Missing table: {}",
                expected
            )));
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use sqlx::sqlite::SqlitePoolOptions;

    #[tokio::test]
    async fn schema_creation_is_idempotent_and_verifiable() {
        let pool = SqlitePoolOptions::new()
            .max_connections(1)
            .connect("sqlite::memory:")
            .await
            .unwrap();

        create_schema(&pool).await.unwrap();
        create_schema(&pool).await.unwrap();
        verify_schema(&pool).await.unwrap();
    }
}
