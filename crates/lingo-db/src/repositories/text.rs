use sqlx::{Executor, Postgres};

use crate::models::{NewTextRow, TextRow};

pub async fn get_all<'e, E>(executor: E) -> Result<Vec<TextRow>, sqlx::Error>
where
    E: Executor<'e, Database = Postgres>,
{
    sqlx::query_as(
        // language=PostgreSQL
        r#"
            SELECT id, user_id, language_id, title, author, body, source_url, source_type, uploaded_at
            FROM texts
            ORDER BY uploaded_at DESC, id DESC
        "#,
    )
    .fetch_all(executor)
    .await
}

pub async fn get_by_id<'e, E>(executor: E, text_id: i64) -> Result<Option<TextRow>, sqlx::Error>
where
    E: Executor<'e, Database = Postgres>,
{
    sqlx::query_as(
        // language=PostgreSQL
        r#"
            SELECT id, user_id, language_id, title, author, body, source_url, source_type, uploaded_at
            FROM texts
            WHERE id = $1
        "#,
    )
    .bind(text_id)
    .fetch_optional(executor)
    .await
}

/// Insert a text. The body is indexed with the `simple` text search
/// configuration so words match it regardless of language.
pub async fn add_new<'e, E>(executor: E, text: &NewTextRow<'_>) -> Result<TextRow, sqlx::Error>
where
    E: Executor<'e, Database = Postgres>,
{
    sqlx::query_as(
        // language=PostgreSQL
        r#"
            INSERT INTO texts (user_id, language_id, title, author, body, ts_parsed_text, source_url, source_type)
            VALUES ($1, $2, $3, $4, $5, to_tsvector('simple', $5), $6, $7)
            RETURNING id, user_id, language_id, title, author, body, source_url, source_type, uploaded_at
        "#,
    )
    .bind(text.user_id)
    .bind(text.language_id)
    .bind(text.title)
    .bind(text.author)
    .bind(text.body)
    .bind(text.source_url)
    .bind(text.source_type)
    .fetch_one(executor)
    .await
}
