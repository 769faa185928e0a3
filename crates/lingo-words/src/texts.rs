use lingo_db::{WordStore, WordUnit, models::NewTextRow};
use tracing::info;
use validator::Validate;

use crate::{
    error::{WordError, expect_written},
    model::{NewText, Text},
    normalization::canonical_text,
};

const ADD_TEXT: &str = "add new text";

/// Source texts users read and look words up in.
#[derive(Debug, Clone)]
pub struct TextService<S> {
    store: S,
}

impl<S: WordStore> TextService<S> {
    pub const fn new(store: S) -> Self {
        Self { store }
    }

    /// All texts, newest first.
    pub async fn get_all(&self) -> Result<Vec<Text>, WordError> {
        let rows = self.store.all_texts().await?;
        Ok(rows.into_iter().map(Text::from).collect())
    }

    pub async fn get_by_id(&self, text_id: i64) -> Result<Text, WordError> {
        self.store
            .text_by_id(text_id)
            .await?
            .map(Text::from)
            .ok_or(WordError::NotFound {
                entity: "text",
                id: text_id,
            })
    }

    /// Store a text and index its body for word lookups. The body is stored
    /// NFC-composed so it matches canonical word text.
    pub async fn add_new(&self, new_text: &NewText) -> Result<Text, WordError> {
        new_text.validate()?;
        let body = canonical_text(&new_text.body);

        let mut unit = self.store.begin().await?;
        let row = expect_written(
            ADD_TEXT,
            unit.insert_text(&NewTextRow {
                user_id: new_text.user_id,
                language_id: &new_text.language_id,
                title: &new_text.title,
                author: new_text.author.as_deref(),
                body: &body,
                source_url: new_text.source_url.as_deref(),
                source_type: new_text.source_type.as_deref(),
            })
            .await
            .map(Some),
        )?;
        unit.commit().await?;

        info!(text_id = row.id, language_id = %row.language_id, "added new text");
        Ok(Text::from(row))
    }
}
