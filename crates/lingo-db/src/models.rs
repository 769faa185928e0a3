use chrono::{DateTime, Utc};
use sqlx::FromRow;

/// Word row - one entry of the shared vocabulary
#[derive(Debug, Clone, PartialEq, Eq, FromRow)]
pub struct WordRow {
    /// Unique word identifier
    pub id: i64,
    /// Word text, unique together with `language_id`
    pub word: String,
    /// Language the word belongs to
    pub language_id: String,
}

/// One word joined with a user's status and that user's translations.
///
/// The translation columns are aggregated arrays: index `i` of every array
/// describes the same translation.
#[derive(Debug, Clone, PartialEq, Eq, FromRow)]
pub struct UserWordRow {
    pub word_id: i64,
    pub word: String,
    pub status: String,
    pub translation_ids: Vec<i64>,
    pub translation_texts: Vec<String>,
    pub translation_contexts: Vec<Option<String>>,
    /// Only selected by the by-language view
    #[sqlx(default)]
    pub language_ids: Vec<String>,
}

/// Translation row
#[derive(Debug, Clone, PartialEq, Eq, FromRow)]
pub struct TranslationRow {
    pub id: i64,
    pub word_id: i64,
    pub translation: String,
    pub target_language_id: String,
}

/// A translation saved into a user's personal list
#[derive(Debug, Clone, PartialEq, Eq, FromRow)]
pub struct UserTranslationRow {
    pub user_id: i64,
    pub translation_id: i64,
    pub context: Option<String>,
}

/// Source text row
#[derive(Debug, Clone, PartialEq, Eq, FromRow)]
pub struct TextRow {
    pub id: i64,
    /// Uploader (nullable once the user is deleted)
    pub user_id: Option<i64>,
    pub language_id: String,
    pub title: String,
    pub author: Option<String>,
    pub body: String,
    pub source_url: Option<String>,
    pub source_type: Option<String>,
    pub uploaded_at: DateTime<Utc>,
}

/// Columns of a text to insert. The search vector is derived from `body`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NewTextRow<'a> {
    pub user_id: Option<i64>,
    pub language_id: &'a str,
    pub title: &'a str,
    pub author: Option<&'a str>,
    pub body: &'a str,
    pub source_url: Option<&'a str>,
    pub source_type: Option<&'a str>,
}
