//! Re-expands the flattened join rows into nested [`UserWord`]s.
//!
//! Each [`UserWordRow`] carries its translations as parallel arrays; index `i`
//! of every array belongs to the same translation. Rows whose arrays differ in
//! length are rejected rather than zipped into misaligned translations.

use lingo_db::models::UserWordRow;

use crate::{
    error::WordError,
    model::{Translation, UserWord},
};

/// Where a translation's target language comes from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TargetLanguage<'a> {
    /// Every translation targets the requested language
    Fixed(&'a str),
    /// Each translation carries its own language in `language_ids`
    PerTranslation,
}

pub fn user_words(
    rows: Vec<UserWordRow>,
    target: TargetLanguage<'_>,
) -> Result<Vec<UserWord>, WordError> {
    rows.into_iter().map(|row| user_word(row, target)).collect()
}

pub fn user_word(row: UserWordRow, target: TargetLanguage<'_>) -> Result<UserWord, WordError> {
    check_alignment(&row, target)?;

    let UserWordRow {
        word_id,
        word,
        status,
        translation_ids,
        translation_texts,
        translation_contexts,
        language_ids,
    } = row;

    let entries = translation_ids
        .into_iter()
        .zip(translation_texts)
        .zip(translation_contexts);

    let translations = match target {
        TargetLanguage::Fixed(language_id) => entries
            .map(|((id, translation), context)| Translation {
                id,
                word_id,
                target_language_id: language_id.to_string(),
                translation,
                context,
            })
            .collect(),
        TargetLanguage::PerTranslation => entries
            .zip(language_ids)
            .map(|(((id, translation), context), target_language_id)| Translation {
                id,
                word_id,
                target_language_id,
                translation,
                context,
            })
            .collect(),
    };

    Ok(UserWord {
        id: word_id,
        word,
        status,
        translations,
    })
}

fn check_alignment(row: &UserWordRow, target: TargetLanguage<'_>) -> Result<(), WordError> {
    let ids = row.translation_ids.len();
    let texts = row.translation_texts.len();
    let contexts = row.translation_contexts.len();
    let languages = match target {
        TargetLanguage::Fixed(_) => None,
        TargetLanguage::PerTranslation => Some(row.language_ids.len()),
    };

    let aligned = texts == ids && contexts == ids && languages.is_none_or(|n| n == ids);
    if aligned {
        Ok(())
    } else {
        Err(WordError::MisalignedTranslations {
            word_id: row.word_id,
            ids,
            texts,
            contexts,
            languages,
        })
    }
}
