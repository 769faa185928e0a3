//! In-memory store for service tests.
//!
//! Mirrors the constraints of the PostgreSQL schema (unique words per
//! language, foreign keys, cascade on word delete) so the services see the
//! same failures they would see from the database. A unit of work writes to
//! its own copy of the tables; commit swaps that copy in, and dropping or
//! rolling back discards it.

use std::collections::{BTreeMap, BTreeSet};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use chrono::Utc;
use lingo_db::{
    StoreError, WordStore, WordUnit,
    models::{NewTextRow, TextRow, TranslationRow, UserTranslationRow, UserWordRow, WordRow},
};
use tokio_util::sync::CancellationToken;

/// Unit operation that can be made to fail.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Op {
    InsertWord,
    InsertStatus,
    InsertTranslation,
    LinkTranslation,
    Commit,
}

/// Failure raised by an injected fault.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Fault {
    Unique,
    ForeignKey,
    Connection,
}

impl Fault {
    fn into_error(self) -> StoreError {
        match self {
            Self::Unique => StoreError::UniqueViolation {
                constraint: "injected".to_string(),
            },
            Self::ForeignKey => StoreError::ForeignKeyViolation {
                constraint: "injected".to_string(),
            },
            Self::Connection => StoreError::Database(sqlx::Error::PoolTimedOut),
        }
    }
}

#[derive(Debug, Clone, Default)]
struct Tables {
    next_id: i64,
    languages: BTreeSet<String>,
    users: BTreeSet<i64>,
    texts: BTreeMap<i64, TextRow>,
    words: BTreeMap<i64, WordRow>,
    /// (word id, user id) -> status
    statuses: BTreeMap<(i64, i64), String>,
    translations: BTreeMap<i64, TranslationRow>,
    /// (user id, translation id) -> context
    links: BTreeMap<(i64, i64), Option<String>>,
}

impl Tables {
    fn next_id(&mut self) -> i64 {
        self.next_id += 1;
        self.next_id
    }
}

#[derive(Debug, Default)]
struct Shared {
    tables: Tables,
    fault: Option<(Op, Fault)>,
    cancel_after: Option<(Op, CancellationToken)>,
    commits: usize,
    rollbacks: usize,
}

#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    shared: Arc<Mutex<Shared>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_language(&self, language_id: &str) {
        let mut shared = self.shared.lock().unwrap();
        shared.tables.languages.insert(language_id.to_string());
    }

    pub fn add_user(&self) -> i64 {
        let mut shared = self.shared.lock().unwrap();
        let id = shared.tables.next_id();
        shared.tables.users.insert(id);
        id
    }

    /// Seed a text as stored, bypassing the service.
    pub fn add_text(&self, language_id: &str, body: &str) -> i64 {
        let mut shared = self.shared.lock().unwrap();
        let id = shared.tables.next_id();
        shared.tables.texts.insert(
            id,
            TextRow {
                id,
                user_id: None,
                language_id: language_id.to_string(),
                title: format!("text {id}"),
                author: None,
                body: body.to_string(),
                source_url: None,
                source_type: None,
                uploaded_at: Utc::now(),
            },
        );
        id
    }

    /// Make every later `op` fail with `fault`.
    pub fn fail_on(&self, op: Op, fault: Fault) {
        self.shared.lock().unwrap().fault = Some((op, fault));
    }

    /// Cancel `token` once `op` has succeeded.
    pub fn cancel_after(&self, op: Op, token: CancellationToken) {
        self.shared.lock().unwrap().cancel_after = Some((op, token));
    }

    pub fn word_count(&self) -> usize {
        self.shared.lock().unwrap().tables.words.len()
    }

    pub fn status_count(&self) -> usize {
        self.shared.lock().unwrap().tables.statuses.len()
    }

    pub fn translation_count(&self) -> usize {
        self.shared.lock().unwrap().tables.translations.len()
    }

    pub fn link_count(&self) -> usize {
        self.shared.lock().unwrap().tables.links.len()
    }

    pub fn commits(&self) -> usize {
        self.shared.lock().unwrap().commits
    }

    pub fn rollbacks(&self) -> usize {
        self.shared.lock().unwrap().rollbacks
    }

    fn tables(&self) -> Tables {
        self.shared.lock().unwrap().tables.clone()
    }

    fn check(&self, op: Op) -> Result<(), StoreError> {
        match self.shared.lock().unwrap().fault {
            Some((failing, fault)) if failing == op => Err(fault.into_error()),
            _ => Ok(()),
        }
    }

    fn done(&self, op: Op) {
        if let Some((after, token)) = &self.shared.lock().unwrap().cancel_after {
            if *after == op {
                token.cancel();
            }
        }
    }
}

/// Lowercased tokens of a text body, the way the `simple` search
/// configuration splits it.
fn tokens(body: &str) -> BTreeSet<String> {
    body.split(|c: char| !c.is_alphanumeric())
        .filter(|token| !token.is_empty())
        .map(str::to_lowercase)
        .collect()
}

fn occurs_in(word: &str, body_tokens: &BTreeSet<String>) -> bool {
    let word_tokens = tokens(word);
    !word_tokens.is_empty() && word_tokens.is_subset(body_tokens)
}

fn user_word_row(
    word: &WordRow,
    status: &str,
    translations: &[(&TranslationRow, Option<String>)],
    with_languages: bool,
) -> UserWordRow {
    UserWordRow {
        word_id: word.id,
        word: word.word.clone(),
        status: status.to_string(),
        translation_ids: translations.iter().map(|(t, _)| t.id).collect(),
        translation_texts: translations
            .iter()
            .map(|(t, _)| t.translation.clone())
            .collect(),
        translation_contexts: translations.iter().map(|(_, c)| c.clone()).collect(),
        language_ids: if with_languages {
            translations
                .iter()
                .map(|(t, _)| t.target_language_id.clone())
                .collect()
        } else {
            Vec::new()
        },
    }
}

#[async_trait]
impl WordStore for MemoryStore {
    type Unit = MemoryUnit;

    async fn begin(&self) -> Result<MemoryUnit, StoreError> {
        Ok(MemoryUnit {
            store: self.clone(),
            tables: self.tables(),
        })
    }

    async fn all_words(&self) -> Result<Vec<WordRow>, StoreError> {
        Ok(self.tables().words.into_values().collect())
    }

    async fn word_by_id(&self, word_id: i64) -> Result<Option<WordRow>, StoreError> {
        Ok(self.tables().words.get(&word_id).cloned())
    }

    async fn words_by_language_and_user(
        &self,
        language_id: &str,
        user_id: i64,
    ) -> Result<Vec<WordRow>, StoreError> {
        let tables = self.tables();
        Ok(tables
            .words
            .values()
            .filter(|w| w.language_id == language_id)
            .filter(|w| tables.statuses.contains_key(&(w.id, user_id)))
            .cloned()
            .collect())
    }

    async fn user_words_in_text(
        &self,
        user_id: i64,
        text_id: i64,
        target_language_id: &str,
        simple: bool,
    ) -> Result<Vec<UserWordRow>, StoreError> {
        let tables = self.tables();
        let Some(text) = tables.texts.get(&text_id) else {
            return Ok(Vec::new());
        };
        let body_tokens = tokens(&text.body);

        let mut rows = Vec::new();
        for word in tables.words.values() {
            if word.language_id != text.language_id || !occurs_in(&word.word, &body_tokens) {
                continue;
            }
            let Some(status) = tables.statuses.get(&(word.id, user_id)) else {
                continue;
            };
            let translations: Vec<_> = tables
                .translations
                .values()
                .filter(|t| t.word_id == word.id && t.target_language_id == target_language_id)
                .filter_map(|t| match tables.links.get(&(user_id, t.id)) {
                    Some(context) => Some((t, context.clone())),
                    None if !simple => Some((t, None)),
                    None => None,
                })
                .collect();
            rows.push(user_word_row(word, status, &translations, false));
        }
        Ok(rows)
    }

    async fn user_words_by_language(
        &self,
        language_id: &str,
        user_id: i64,
    ) -> Result<Vec<UserWordRow>, StoreError> {
        let tables = self.tables();
        let mut rows = Vec::new();
        for word in tables.words.values().filter(|w| w.language_id == language_id) {
            let Some(status) = tables.statuses.get(&(word.id, user_id)) else {
                continue;
            };
            let translations: Vec<_> = tables
                .translations
                .values()
                .filter(|t| t.word_id == word.id)
                .filter_map(|t| {
                    tables
                        .links
                        .get(&(user_id, t.id))
                        .map(|context| (t, context.clone()))
                })
                .collect();
            rows.push(user_word_row(word, status, &translations, true));
        }
        Ok(rows)
    }

    async fn word_in_language(
        &self,
        word: &str,
        language_id: &str,
    ) -> Result<Option<WordRow>, StoreError> {
        Ok(self
            .tables()
            .words
            .into_values()
            .find(|w| w.word == word && w.language_id == language_id))
    }

    async fn word_status(&self, word_id: i64, user_id: i64) -> Result<Option<String>, StoreError> {
        Ok(self.tables().statuses.get(&(word_id, user_id)).cloned())
    }

    async fn all_texts(&self) -> Result<Vec<TextRow>, StoreError> {
        Ok(self.tables().texts.into_values().rev().collect())
    }

    async fn text_by_id(&self, text_id: i64) -> Result<Option<TextRow>, StoreError> {
        Ok(self.tables().texts.get(&text_id).cloned())
    }
}

/// Unit of work over a private copy of the tables.
#[derive(Debug)]
pub struct MemoryUnit {
    store: MemoryStore,
    tables: Tables,
}

fn foreign_key(constraint: &str) -> StoreError {
    StoreError::ForeignKeyViolation {
        constraint: constraint.to_string(),
    }
}

fn unique(constraint: &str) -> StoreError {
    StoreError::UniqueViolation {
        constraint: constraint.to_string(),
    }
}

#[async_trait]
impl WordUnit for MemoryUnit {
    async fn insert_word(
        &mut self,
        word: &str,
        language_id: &str,
    ) -> Result<Option<WordRow>, StoreError> {
        self.store.check(Op::InsertWord)?;
        if !self.tables.languages.contains(language_id) {
            return Err(foreign_key("words_language_id_fkey"));
        }
        if self
            .tables
            .words
            .values()
            .any(|w| w.word == word && w.language_id == language_id)
        {
            return Err(unique("uq_words_word_language"));
        }

        let row = WordRow {
            id: self.tables.next_id(),
            word: word.to_string(),
            language_id: language_id.to_string(),
        };
        self.tables.words.insert(row.id, row.clone());
        self.store.done(Op::InsertWord);
        Ok(Some(row))
    }

    async fn delete_word(&mut self, word_id: i64) -> Result<Option<WordRow>, StoreError> {
        let Some(row) = self.tables.words.remove(&word_id) else {
            return Ok(None);
        };

        self.tables.statuses.retain(|(word, _), _| *word != word_id);
        let removed: BTreeSet<i64> = self
            .tables
            .translations
            .values()
            .filter(|t| t.word_id == word_id)
            .map(|t| t.id)
            .collect();
        self.tables.translations.retain(|id, _| !removed.contains(id));
        self.tables
            .links
            .retain(|(_, translation), _| !removed.contains(translation));

        Ok(Some(row))
    }

    async fn insert_status(
        &mut self,
        word_id: i64,
        user_id: i64,
        word_status: &str,
    ) -> Result<Option<String>, StoreError> {
        self.store.check(Op::InsertStatus)?;
        if !self.tables.words.contains_key(&word_id) {
            return Err(foreign_key("users_words_word_id_fkey"));
        }
        if !self.tables.users.contains(&user_id) {
            return Err(foreign_key("users_words_user_id_fkey"));
        }
        if self.tables.statuses.contains_key(&(word_id, user_id)) {
            return Err(unique("users_words_pkey"));
        }

        self.tables
            .statuses
            .insert((word_id, user_id), word_status.to_string());
        self.store.done(Op::InsertStatus);
        Ok(Some(word_status.to_string()))
    }

    async fn update_status(
        &mut self,
        word_id: i64,
        user_id: i64,
        word_status: &str,
    ) -> Result<Option<String>, StoreError> {
        Ok(self
            .tables
            .statuses
            .get_mut(&(word_id, user_id))
            .map(|status| {
                *status = word_status.to_string();
                status.clone()
            }))
    }

    async fn insert_translation(
        &mut self,
        word_id: i64,
        translation: &str,
        target_language_id: &str,
    ) -> Result<Option<TranslationRow>, StoreError> {
        self.store.check(Op::InsertTranslation)?;
        if !self.tables.words.contains_key(&word_id) {
            return Err(foreign_key("translations_word_id_fkey"));
        }
        if !self.tables.languages.contains(target_language_id) {
            return Err(foreign_key("translations_target_language_id_fkey"));
        }

        let row = TranslationRow {
            id: self.tables.next_id(),
            word_id,
            translation: translation.to_string(),
            target_language_id: target_language_id.to_string(),
        };
        self.tables.translations.insert(row.id, row.clone());
        self.store.done(Op::InsertTranslation);
        Ok(Some(row))
    }

    async fn link_user_translation(
        &mut self,
        user_id: i64,
        translation_id: i64,
        context: Option<&str>,
    ) -> Result<Option<UserTranslationRow>, StoreError> {
        self.store.check(Op::LinkTranslation)?;
        if !self.tables.users.contains(&user_id) {
            return Err(foreign_key("users_translations_user_id_fkey"));
        }
        if !self.tables.translations.contains_key(&translation_id) {
            return Err(foreign_key("users_translations_translation_id_fkey"));
        }
        if self.tables.links.contains_key(&(user_id, translation_id)) {
            return Err(unique("users_translations_pkey"));
        }

        let context = context.map(str::to_string);
        self.tables
            .links
            .insert((user_id, translation_id), context.clone());
        self.store.done(Op::LinkTranslation);
        Ok(Some(UserTranslationRow {
            user_id,
            translation_id,
            context,
        }))
    }

    async fn insert_text(&mut self, text: &NewTextRow<'_>) -> Result<TextRow, StoreError> {
        if !self.tables.languages.contains(text.language_id) {
            return Err(foreign_key("texts_language_id_fkey"));
        }
        if let Some(user_id) = text.user_id {
            if !self.tables.users.contains(&user_id) {
                return Err(foreign_key("texts_user_id_fkey"));
            }
        }

        let row = TextRow {
            id: self.tables.next_id(),
            user_id: text.user_id,
            language_id: text.language_id.to_string(),
            title: text.title.to_string(),
            author: text.author.map(str::to_string),
            body: text.body.to_string(),
            source_url: text.source_url.map(str::to_string),
            source_type: text.source_type.map(str::to_string),
            uploaded_at: Utc::now(),
        };
        self.tables.texts.insert(row.id, row.clone());
        Ok(row)
    }

    async fn commit(self) -> Result<(), StoreError> {
        self.store.check(Op::Commit)?;
        let mut shared = self.store.shared.lock().unwrap();
        shared.tables = self.tables;
        shared.commits += 1;
        Ok(())
    }

    async fn rollback(self) -> Result<(), StoreError> {
        self.store.shared.lock().unwrap().rollbacks += 1;
        Ok(())
    }
}
