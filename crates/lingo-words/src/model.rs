//! Caller-facing domain types.
//!
//! Rows from `lingo-db` are converted here; everything serialises in
//! camelCase.

use chrono::{DateTime, Utc};
use lingo_db::models::{TextRow, TranslationRow, WordRow};
use serde::{Deserialize, Serialize};
use validator::Validate;

/// A vocabulary word, shared by every user.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Word {
    pub id: i64,
    pub word: String,
    pub language_id: String,
}

impl From<WordRow> for Word {
    fn from(row: WordRow) -> Self {
        Self {
            id: row.id,
            word: row.word,
            language_id: row.language_id,
        }
    }
}

/// A word that has not been stored yet.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct NewWord {
    #[validate(length(min = 1, max = 255))]
    pub word: String,
    #[validate(length(min = 1, max = 16))]
    pub language_id: String,
}

/// A translation of a word into a target language, with the context the user
/// saved it with.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Translation {
    pub id: i64,
    pub word_id: i64,
    pub target_language_id: String,
    pub translation: String,
    pub context: Option<String>,
}

impl Translation {
    pub(crate) fn from_row(row: TranslationRow, context: Option<String>) -> Self {
        Self {
            id: row.id,
            word_id: row.word_id,
            target_language_id: row.target_language_id,
            translation: row.translation,
            context,
        }
    }
}

/// Link between a user and a translation they saved.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserTranslation {
    pub user_id: i64,
    pub translation_id: i64,
    pub context: Option<String>,
}

/// A word as one user sees it: their status and every translation known for
/// it. Rebuilt on each read, never stored.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserWord {
    pub id: i64,
    pub word: String,
    pub status: String,
    pub translations: Vec<Translation>,
}

/// Translation supplied when a user adds a new word.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct NewTranslation {
    #[validate(length(min = 1, max = 255))]
    pub translation: String,
    #[validate(length(min = 1, max = 16))]
    pub target_language_id: String,
    #[serde(default)]
    pub context: Option<String>,
}

/// Input of [`crate::WordService::add_new_user_word`].
///
/// Only the first translation is persisted; any further entries are ignored.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct NewUserWord {
    #[validate(length(min = 1, max = 255))]
    pub word: String,
    #[validate(length(min = 1, max = 32))]
    pub status: String,
    #[validate(length(min = 1), nested)]
    pub translations: Vec<NewTranslation>,
}

/// A language given either by its id or as a full language object.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum LanguageRef {
    Id(String),
    Language(Language),
}

impl LanguageRef {
    pub fn id(&self) -> &str {
        match self {
            Self::Id(id) => id,
            Self::Language(language) => &language.id,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Language {
    pub id: String,
    #[serde(default)]
    pub name: Option<String>,
}

/// Authenticated user as handed over by the request layer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub id: i64,
    pub username: String,
    #[serde(default)]
    pub knows: Option<LanguageRef>,
    pub learns: LanguageRef,
}

/// The user reduced to what the word services need, with the learned language
/// resolved to its id.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Learner {
    pub user_id: i64,
    pub learning_language_id: String,
}

impl From<&User> for Learner {
    fn from(user: &User) -> Self {
        Self {
            user_id: user.id,
            learning_language_id: user.learns.id().to_string(),
        }
    }
}

/// Source text a user reads in the language they learn.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Text {
    pub id: i64,
    pub user_id: Option<i64>,
    pub language_id: String,
    pub title: String,
    pub author: Option<String>,
    pub body: String,
    #[serde(rename = "sourceURL")]
    pub source_url: Option<String>,
    pub source_type: Option<String>,
    pub uploaded_at: DateTime<Utc>,
}

impl From<TextRow> for Text {
    fn from(row: TextRow) -> Self {
        Self {
            id: row.id,
            user_id: row.user_id,
            language_id: row.language_id,
            title: row.title,
            author: row.author,
            body: row.body,
            source_url: row.source_url,
            source_type: row.source_type,
            uploaded_at: row.uploaded_at,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct NewText {
    #[serde(default)]
    pub user_id: Option<i64>,
    #[validate(length(min = 1, max = 16))]
    pub language_id: String,
    #[validate(length(min = 1, max = 255))]
    pub title: String,
    #[serde(default)]
    pub author: Option<String>,
    #[validate(length(min = 1))]
    pub body: String,
    #[serde(default, rename = "sourceURL")]
    pub source_url: Option<String>,
    #[serde(default)]
    pub source_type: Option<String>,
}
