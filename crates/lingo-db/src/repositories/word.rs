use sqlx::{Executor, Postgres};

use crate::models::{UserWordRow, WordRow};

pub async fn get_all<'e, E>(executor: E) -> Result<Vec<WordRow>, sqlx::Error>
where
    E: Executor<'e, Database = Postgres>,
{
    sqlx::query_as(
        // language=PostgreSQL
        r#"
            SELECT id, word, language_id
            FROM words
            ORDER BY id
        "#,
    )
    .fetch_all(executor)
    .await
}

pub async fn get_by_id<'e, E>(executor: E, word_id: i64) -> Result<Option<WordRow>, sqlx::Error>
where
    E: Executor<'e, Database = Postgres>,
{
    sqlx::query_as(
        // language=PostgreSQL
        r#"
            SELECT id, word, language_id
            FROM words
            WHERE id = $1
        "#,
    )
    .bind(word_id)
    .fetch_optional(executor)
    .await
}

/// Words of a language that the user has any status for.
pub async fn get_by_language_and_user<'e, E>(
    executor: E,
    language_id: &str,
    user_id: i64,
) -> Result<Vec<WordRow>, sqlx::Error>
where
    E: Executor<'e, Database = Postgres>,
{
    sqlx::query_as(
        // language=PostgreSQL
        r#"
            SELECT w.id, w.word, w.language_id
            FROM words w
            JOIN users_words uw ON uw.word_id = w.id
            WHERE w.language_id = $1 AND uw.user_id = $2
            ORDER BY w.id
        "#,
    )
    .bind(language_id)
    .bind(user_id)
    .fetch_all(executor)
    .await
}

/// Words occurring in a text that the user has a status for, each with the
/// translations into `target_language_id` aggregated into aligned arrays.
///
/// With `simple` set only the translations the user saved are aggregated,
/// otherwise every translation of the word into that language is, with the
/// user's context where they saved it.
pub async fn get_user_words_in_text<'e, E>(
    executor: E,
    user_id: i64,
    text_id: i64,
    target_language_id: &str,
    simple: bool,
) -> Result<Vec<UserWordRow>, sqlx::Error>
where
    E: Executor<'e, Database = Postgres>,
{
    // Every array uses the same FILTER and ORDER BY so the indexes line up
    sqlx::query_as(
        // language=PostgreSQL
        r#"
            SELECT
                w.id AS word_id,
                w.word,
                uw.word_status AS status,
                COALESCE(
                    array_agg(t.id ORDER BY t.id)
                        FILTER (WHERE t.id IS NOT NULL AND (NOT $4::boolean OR ut.user_id IS NOT NULL)),
                    '{}'::bigint[]
                ) AS translation_ids,
                COALESCE(
                    array_agg(t.translation ORDER BY t.id)
                        FILTER (WHERE t.id IS NOT NULL AND (NOT $4::boolean OR ut.user_id IS NOT NULL)),
                    '{}'::text[]
                ) AS translation_texts,
                COALESCE(
                    array_agg(ut.context ORDER BY t.id)
                        FILTER (WHERE t.id IS NOT NULL AND (NOT $4::boolean OR ut.user_id IS NOT NULL)),
                    '{}'::text[]
                ) AS translation_contexts
            FROM texts tx
            JOIN words w
                ON w.language_id = tx.language_id
                AND tx.ts_parsed_text @@ plainto_tsquery('simple', w.word)
            JOIN users_words uw
                ON uw.word_id = w.id AND uw.user_id = $1
            LEFT JOIN translations t
                ON t.word_id = w.id AND t.target_language_id = $3
            LEFT JOIN users_translations ut
                ON ut.translation_id = t.id AND ut.user_id = $1
            WHERE tx.id = $2
            GROUP BY w.id, w.word, uw.word_status
            ORDER BY w.id
        "#,
    )
    .bind(user_id)
    .bind(text_id)
    .bind(target_language_id)
    .bind(simple)
    .fetch_all(executor)
    .await
}

/// Words of a language the user has a status for, each with every translation
/// the user saved (in any target language) aggregated into aligned arrays.
pub async fn get_user_words_by_language<'e, E>(
    executor: E,
    language_id: &str,
    user_id: i64,
) -> Result<Vec<UserWordRow>, sqlx::Error>
where
    E: Executor<'e, Database = Postgres>,
{
    sqlx::query_as(
        // language=PostgreSQL
        r#"
            SELECT
                w.id AS word_id,
                w.word,
                uw.word_status AS status,
                COALESCE(
                    array_agg(t.id ORDER BY t.id) FILTER (WHERE t.id IS NOT NULL),
                    '{}'::bigint[]
                ) AS translation_ids,
                COALESCE(
                    array_agg(t.translation ORDER BY t.id) FILTER (WHERE t.id IS NOT NULL),
                    '{}'::text[]
                ) AS translation_texts,
                COALESCE(
                    array_agg(ut.context ORDER BY t.id) FILTER (WHERE t.id IS NOT NULL),
                    '{}'::text[]
                ) AS translation_contexts,
                COALESCE(
                    array_agg(t.target_language_id ORDER BY t.id) FILTER (WHERE t.id IS NOT NULL),
                    '{}'::text[]
                ) AS language_ids
            FROM words w
            JOIN users_words uw
                ON uw.word_id = w.id AND uw.user_id = $2
            LEFT JOIN (
                translations t
                JOIN users_translations ut
                    ON ut.translation_id = t.id AND ut.user_id = $2
            ) ON t.word_id = w.id
            WHERE w.language_id = $1
            GROUP BY w.id, w.word, uw.word_status
            ORDER BY w.id
        "#,
    )
    .bind(language_id)
    .bind(user_id)
    .fetch_all(executor)
    .await
}

pub async fn get_word_in_language<'e, E>(
    executor: E,
    word: &str,
    language_id: &str,
) -> Result<Option<WordRow>, sqlx::Error>
where
    E: Executor<'e, Database = Postgres>,
{
    sqlx::query_as(
        // language=PostgreSQL
        r#"
            SELECT id, word, language_id
            FROM words
            WHERE word = $1 AND language_id = $2
        "#,
    )
    .bind(word)
    .bind(language_id)
    .fetch_optional(executor)
    .await
}

pub async fn add_new<'e, E>(
    executor: E,
    word: &str,
    language_id: &str,
) -> Result<Option<WordRow>, sqlx::Error>
where
    E: Executor<'e, Database = Postgres>,
{
    sqlx::query_as(
        // language=PostgreSQL
        r#"
            INSERT INTO words (word, language_id)
            VALUES ($1, $2)
            RETURNING id, word, language_id
        "#,
    )
    .bind(word)
    .bind(language_id)
    .fetch_optional(executor)
    .await
}

/// Delete a word. Statuses, translations and saved translations cascade.
pub async fn remove<'e, E>(executor: E, word_id: i64) -> Result<Option<WordRow>, sqlx::Error>
where
    E: Executor<'e, Database = Postgres>,
{
    sqlx::query_as(
        // language=PostgreSQL
        r#"
            DELETE FROM words
            WHERE id = $1
            RETURNING id, word, language_id
        "#,
    )
    .bind(word_id)
    .fetch_optional(executor)
    .await
}

pub async fn get_status<'e, E>(
    executor: E,
    word_id: i64,
    user_id: i64,
) -> Result<Option<String>, sqlx::Error>
where
    E: Executor<'e, Database = Postgres>,
{
    sqlx::query_scalar(
        // language=PostgreSQL
        r#"
            SELECT word_status
            FROM users_words
            WHERE word_id = $1 AND user_id = $2
        "#,
    )
    .bind(word_id)
    .bind(user_id)
    .fetch_optional(executor)
    .await
}

pub async fn add_status<'e, E>(
    executor: E,
    word_id: i64,
    user_id: i64,
    word_status: &str,
) -> Result<Option<String>, sqlx::Error>
where
    E: Executor<'e, Database = Postgres>,
{
    sqlx::query_scalar(
        // language=PostgreSQL
        r#"
            INSERT INTO users_words (word_id, user_id, word_status)
            VALUES ($1, $2, $3)
            RETURNING word_status
        "#,
    )
    .bind(word_id)
    .bind(user_id)
    .bind(word_status)
    .fetch_optional(executor)
    .await
}

pub async fn update_status<'e, E>(
    executor: E,
    word_id: i64,
    user_id: i64,
    word_status: &str,
) -> Result<Option<String>, sqlx::Error>
where
    E: Executor<'e, Database = Postgres>,
{
    sqlx::query_scalar(
        // language=PostgreSQL
        r#"
            UPDATE users_words
            SET word_status = $3
            WHERE word_id = $1 AND user_id = $2
            RETURNING word_status
        "#,
    )
    .bind(word_id)
    .bind(user_id)
    .bind(word_status)
    .fetch_optional(executor)
    .await
}
