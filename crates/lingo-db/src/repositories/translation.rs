use sqlx::{Executor, Postgres};

use crate::models::{TranslationRow, UserTranslationRow};

pub async fn add<'e, E>(
    executor: E,
    word_id: i64,
    translation: &str,
    target_language_id: &str,
) -> Result<Option<TranslationRow>, sqlx::Error>
where
    E: Executor<'e, Database = Postgres>,
{
    sqlx::query_as(
        // language=PostgreSQL
        r#"
            INSERT INTO translations (word_id, translation, target_language_id)
            VALUES ($1, $2, $3)
            RETURNING id, word_id, translation, target_language_id
        "#,
    )
    .bind(word_id)
    .bind(translation)
    .bind(target_language_id)
    .fetch_optional(executor)
    .await
}

pub async fn add_to_users_translations<'e, E>(
    executor: E,
    user_id: i64,
    translation_id: i64,
    context: Option<&str>,
) -> Result<Option<UserTranslationRow>, sqlx::Error>
where
    E: Executor<'e, Database = Postgres>,
{
    sqlx::query_as(
        // language=PostgreSQL
        r#"
            INSERT INTO users_translations (user_id, translation_id, context)
            VALUES ($1, $2, $3)
            RETURNING user_id, translation_id, context
        "#,
    )
    .bind(user_id)
    .bind(translation_id)
    .bind(context)
    .fetch_optional(executor)
    .await
}
