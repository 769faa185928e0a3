use lingo_db::{WordStore, WordUnit};

use crate::{
    error::{WordError, expect_written},
    model::{Translation, UserTranslation},
};

const ADD: &str = "add translation";
const ADD_TO_USER: &str = "add translation to user's translations";

/// Creates translations and saves them into users' personal lists.
#[derive(Debug, Clone)]
pub struct TranslationService<S> {
    store: S,
}

impl<S: WordStore> TranslationService<S> {
    pub const fn new(store: S) -> Self {
        Self { store }
    }

    /// Create a translation of a word. The returned translation has no
    /// context; context belongs to a user's saved copy.
    pub async fn add(
        &self,
        word_id: i64,
        translation: &str,
        target_language_id: &str,
    ) -> Result<Translation, WordError> {
        let mut unit = self.store.begin().await?;
        let translation = add_in(&mut unit, word_id, translation, target_language_id).await?;
        unit.commit().await?;

        Ok(translation)
    }

    /// Save a translation into a user's list, with an optional personal context.
    pub async fn add_to_users_translations(
        &self,
        user_id: i64,
        translation_id: i64,
        context: Option<&str>,
    ) -> Result<UserTranslation, WordError> {
        let mut unit = self.store.begin().await?;
        let link = add_to_users_translations_in(&mut unit, user_id, translation_id, context).await?;
        unit.commit().await?;

        Ok(link)
    }
}

pub(crate) async fn add_in<U: WordUnit>(
    unit: &mut U,
    word_id: i64,
    translation: &str,
    target_language_id: &str,
) -> Result<Translation, WordError> {
    let row = expect_written(
        ADD,
        unit.insert_translation(word_id, translation, target_language_id)
            .await,
    )?;

    Ok(Translation::from_row(row, None))
}

pub(crate) async fn add_to_users_translations_in<U: WordUnit>(
    unit: &mut U,
    user_id: i64,
    translation_id: i64,
    context: Option<&str>,
) -> Result<UserTranslation, WordError> {
    let row = expect_written(
        ADD_TO_USER,
        unit.link_user_translation(user_id, translation_id, context)
            .await,
    )?;

    Ok(UserTranslation {
        user_id: row.user_id,
        translation_id: row.translation_id,
        context: row.context,
    })
}
