//! Store seam between the vocabulary services and the database.
//!
//! [`WordStore`] covers reads of words, statuses and texts, and opening a
//! unit of work. Every write goes
//! through a [`WordUnit`], which is only made durable by [`WordUnit::commit`].
//! A unit that is dropped or rolled back leaves nothing behind.

use std::fmt;

use async_trait::async_trait;
use sqlx::{PgPool, Postgres, Transaction};

use crate::{
    error::StoreError,
    models::{NewTextRow, TextRow, TranslationRow, UserTranslationRow, UserWordRow, WordRow},
    repositories::{text as text_repo, translation as translation_repo, word as word_repo},
};

/// Read access to the vocabulary tables and the entry point for writes.
#[async_trait]
pub trait WordStore: Send + Sync {
    /// Unit of work type produced by [`WordStore::begin`].
    type Unit: WordUnit;

    /// Open a unit of work. Nothing written through it is visible to other
    /// readers until it is committed.
    async fn begin(&self) -> Result<Self::Unit, StoreError>;

    async fn all_words(&self) -> Result<Vec<WordRow>, StoreError>;

    async fn word_by_id(&self, word_id: i64) -> Result<Option<WordRow>, StoreError>;

    async fn words_by_language_and_user(
        &self,
        language_id: &str,
        user_id: i64,
    ) -> Result<Vec<WordRow>, StoreError>;

    async fn user_words_in_text(
        &self,
        user_id: i64,
        text_id: i64,
        target_language_id: &str,
        simple: bool,
    ) -> Result<Vec<UserWordRow>, StoreError>;

    async fn user_words_by_language(
        &self,
        language_id: &str,
        user_id: i64,
    ) -> Result<Vec<UserWordRow>, StoreError>;

    async fn word_in_language(
        &self,
        word: &str,
        language_id: &str,
    ) -> Result<Option<WordRow>, StoreError>;

    async fn word_status(&self, word_id: i64, user_id: i64) -> Result<Option<String>, StoreError>;

    /// All texts, newest first.
    async fn all_texts(&self) -> Result<Vec<TextRow>, StoreError>;

    async fn text_by_id(&self, text_id: i64) -> Result<Option<TextRow>, StoreError>;
}

/// Writes scoped to one unit of work. `None` means no row was affected.
#[async_trait]
pub trait WordUnit: Send {
    async fn insert_word(
        &mut self,
        word: &str,
        language_id: &str,
    ) -> Result<Option<WordRow>, StoreError>;

    async fn delete_word(&mut self, word_id: i64) -> Result<Option<WordRow>, StoreError>;

    async fn insert_status(
        &mut self,
        word_id: i64,
        user_id: i64,
        word_status: &str,
    ) -> Result<Option<String>, StoreError>;

    async fn update_status(
        &mut self,
        word_id: i64,
        user_id: i64,
        word_status: &str,
    ) -> Result<Option<String>, StoreError>;

    async fn insert_translation(
        &mut self,
        word_id: i64,
        translation: &str,
        target_language_id: &str,
    ) -> Result<Option<TranslationRow>, StoreError>;

    async fn link_user_translation(
        &mut self,
        user_id: i64,
        translation_id: i64,
        context: Option<&str>,
    ) -> Result<Option<UserTranslationRow>, StoreError>;

    async fn insert_text(&mut self, text: &NewTextRow<'_>) -> Result<TextRow, StoreError>;

    async fn commit(self) -> Result<(), StoreError>;

    async fn rollback(self) -> Result<(), StoreError>;
}

/// PostgreSQL-backed store.
#[derive(Debug, Clone)]
pub struct PgStore {
    pool: PgPool,
}

impl PgStore {
    pub const fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub const fn pool(&self) -> &PgPool {
        &self.pool
    }
}

#[async_trait]
impl WordStore for PgStore {
    type Unit = PgUnit;

    async fn begin(&self) -> Result<PgUnit, StoreError> {
        let tx = self.pool.begin().await?;
        Ok(PgUnit { tx })
    }

    async fn all_words(&self) -> Result<Vec<WordRow>, StoreError> {
        Ok(word_repo::get_all(&self.pool).await?)
    }

    async fn word_by_id(&self, word_id: i64) -> Result<Option<WordRow>, StoreError> {
        Ok(word_repo::get_by_id(&self.pool, word_id).await?)
    }

    async fn words_by_language_and_user(
        &self,
        language_id: &str,
        user_id: i64,
    ) -> Result<Vec<WordRow>, StoreError> {
        Ok(word_repo::get_by_language_and_user(&self.pool, language_id, user_id).await?)
    }

    async fn user_words_in_text(
        &self,
        user_id: i64,
        text_id: i64,
        target_language_id: &str,
        simple: bool,
    ) -> Result<Vec<UserWordRow>, StoreError> {
        Ok(word_repo::get_user_words_in_text(
            &self.pool,
            user_id,
            text_id,
            target_language_id,
            simple,
        )
        .await?)
    }

    async fn user_words_by_language(
        &self,
        language_id: &str,
        user_id: i64,
    ) -> Result<Vec<UserWordRow>, StoreError> {
        Ok(word_repo::get_user_words_by_language(&self.pool, language_id, user_id).await?)
    }

    async fn word_in_language(
        &self,
        word: &str,
        language_id: &str,
    ) -> Result<Option<WordRow>, StoreError> {
        Ok(word_repo::get_word_in_language(&self.pool, word, language_id).await?)
    }

    async fn word_status(&self, word_id: i64, user_id: i64) -> Result<Option<String>, StoreError> {
        Ok(word_repo::get_status(&self.pool, word_id, user_id).await?)
    }

    async fn all_texts(&self) -> Result<Vec<TextRow>, StoreError> {
        Ok(text_repo::get_all(&self.pool).await?)
    }

    async fn text_by_id(&self, text_id: i64) -> Result<Option<TextRow>, StoreError> {
        Ok(text_repo::get_by_id(&self.pool, text_id).await?)
    }
}

/// A PostgreSQL transaction. Dropping it without committing rolls it back.
pub struct PgUnit {
    tx: Transaction<'static, Postgres>,
}

impl fmt::Debug for PgUnit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PgUnit").finish_non_exhaustive()
    }
}

#[async_trait]
impl WordUnit for PgUnit {
    async fn insert_word(
        &mut self,
        word: &str,
        language_id: &str,
    ) -> Result<Option<WordRow>, StoreError> {
        Ok(word_repo::add_new(&mut *self.tx, word, language_id).await?)
    }

    async fn delete_word(&mut self, word_id: i64) -> Result<Option<WordRow>, StoreError> {
        Ok(word_repo::remove(&mut *self.tx, word_id).await?)
    }

    async fn insert_status(
        &mut self,
        word_id: i64,
        user_id: i64,
        word_status: &str,
    ) -> Result<Option<String>, StoreError> {
        Ok(word_repo::add_status(&mut *self.tx, word_id, user_id, word_status).await?)
    }

    async fn update_status(
        &mut self,
        word_id: i64,
        user_id: i64,
        word_status: &str,
    ) -> Result<Option<String>, StoreError> {
        Ok(word_repo::update_status(&mut *self.tx, word_id, user_id, word_status).await?)
    }

    async fn insert_translation(
        &mut self,
        word_id: i64,
        translation: &str,
        target_language_id: &str,
    ) -> Result<Option<TranslationRow>, StoreError> {
        Ok(translation_repo::add(&mut *self.tx, word_id, translation, target_language_id).await?)
    }

    async fn link_user_translation(
        &mut self,
        user_id: i64,
        translation_id: i64,
        context: Option<&str>,
    ) -> Result<Option<UserTranslationRow>, StoreError> {
        Ok(
            translation_repo::add_to_users_translations(&mut *self.tx, user_id, translation_id, context)
                .await?,
        )
    }

    async fn insert_text(&mut self, text: &NewTextRow<'_>) -> Result<TextRow, StoreError> {
        Ok(text_repo::add_new(&mut *self.tx, text).await?)
    }

    async fn commit(self) -> Result<(), StoreError> {
        self.tx.commit().await?;
        Ok(())
    }

    async fn rollback(self) -> Result<(), StoreError> {
        self.tx.rollback().await?;
        Ok(())
    }
}
