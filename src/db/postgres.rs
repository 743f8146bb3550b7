use sqlx::{postgres::PgPoolOptions, PgPool, Row};

use crate::{
    error::AppResult,
    models::{BookRow, MoodTag},
    services::catalog::CatalogStore,
};

/// Creates a PostgreSQL connection pool
pub async fn create_pool(database_url: &str) -> anyhow::Result<PgPool> {
    let pool = PgPoolOptions::new()
        .max_connections(5)
        .connect(database_url)
        .await?;

    Ok(pool)
}

/// Applies the schema migrations bundled with the crate
pub async fn run_migrations(pool: &PgPool) -> anyhow::Result<()> {
    sqlx::migrate!("./migrations").run(pool).await?;
    Ok(())
}

/// Catalog store backed by the `books` / `mood_tags` tables
#[derive(Clone)]
pub struct PgCatalogStore {
    pool: PgPool,
}

impl PgCatalogStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait::async_trait]
impl CatalogStore for PgCatalogStore {
    async fn list_active_books(&self) -> AppResult<Vec<BookRow>> {
        let rows = sqlx::query(
            r#"
            SELECT b.id, b.title, b.author, b.pace, b.complexity, b.emotional_intensity,
                   b.page_count, b.average_rating,
                   COALESCE(
                       array_agg(bt.mood_tag_id ORDER BY bt.mood_tag_id)
                           FILTER (WHERE bt.mood_tag_id IS NOT NULL),
                       '{}'::BIGINT[]
                   ) AS mood_tag_ids
            FROM books b
            LEFT JOIN book_mood_tags bt ON bt.book_id = b.id
            WHERE b.is_active = true
            GROUP BY b.id
            ORDER BY b.id
            "#,
        )
        .fetch_all(&self.pool)
        .await?;

        let books = rows
            .into_iter()
            .map(|row| -> Result<BookRow, sqlx::Error> {
                Ok(BookRow {
                    id: row.try_get("id")?,
                    title: row.try_get("title")?,
                    author: row.try_get("author")?,
                    pace: row.try_get("pace")?,
                    complexity: row.try_get("complexity")?,
                    emotional_intensity: row.try_get("emotional_intensity")?,
                    page_count: row.try_get("page_count")?,
                    mood_tag_ids: row.try_get("mood_tag_ids")?,
                    average_rating: row.try_get("average_rating")?,
                })
            })
            .collect::<Result<Vec<_>, sqlx::Error>>()?;

        tracing::debug!(count = books.len(), "Fetched active books");

        Ok(books)
    }

    async fn list_mood_tags(&self) -> AppResult<Vec<MoodTag>> {
        let rows = sqlx::query("SELECT id, name FROM mood_tags ORDER BY id")
            .fetch_all(&self.pool)
            .await?;

        let tags = rows
            .into_iter()
            .map(|row| -> Result<MoodTag, sqlx::Error> {
                Ok(MoodTag {
                    id: row.try_get("id")?,
                    name: row.try_get("name")?,
                })
            })
            .collect::<Result<Vec<_>, sqlx::Error>>()?;

        Ok(tags)
    }

    fn name(&self) -> &'static str {
        "postgres"
    }
}
