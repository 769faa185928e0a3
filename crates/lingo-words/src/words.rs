//! Word aggregation: caller-facing reads over words, statuses and
//! translations, and the composite "user adds a new word" write.

use lingo_db::{WordStore, WordUnit};
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};
use validator::{Validate, ValidationError, ValidationErrors};

use crate::{
    error::{CreateStep, Rejection, WordError, expect_written},
    metrics,
    model::{Learner, NewTranslation, NewUserWord, NewWord, Translation, UserWord, Word},
    normalization::canonical_word,
    reshape::{self, TargetLanguage},
    translations::{self, TranslationService},
};

const ADD_WORD: &str = "add new word";
const REMOVE_WORD: &str = "remove word";
const GET_STATUS: &str = "get word status";
const ADD_STATUS: &str = "add status to word";
const UPDATE_STATUS: &str = "update word status";

/// The word aggregation service.
///
/// Reads return domain objects built from the store's rows. Every write runs
/// in its own unit of work, and [`WordService::add_new_user_word`] runs all of
/// its writes in a single one.
#[derive(Debug, Clone)]
pub struct WordService<S> {
    store: S,
    translations: TranslationService<S>,
}

impl<S: WordStore + Clone> WordService<S> {
    pub fn new(store: S) -> Self {
        Self {
            translations: TranslationService::new(store.clone()),
            store,
        }
    }

    pub const fn translations(&self) -> &TranslationService<S> {
        &self.translations
    }

    /// All words, ordered by id.
    pub async fn get_all(&self) -> Result<Vec<Word>, WordError> {
        let rows = self.store.all_words().await?;
        Ok(rows.into_iter().map(Word::from).collect())
    }

    /// A word by id. Absence is an error here, unlike the list lookups.
    pub async fn get_by_id(&self, word_id: i64) -> Result<Word, WordError> {
        self.store
            .word_by_id(word_id)
            .await?
            .map(Word::from)
            .ok_or(WordError::NotFound {
                entity: "word",
                id: word_id,
            })
    }

    /// Words of a language the user has a status for. May be empty.
    pub async fn get_by_language_and_user(
        &self,
        language_id: &str,
        user_id: i64,
    ) -> Result<Vec<Word>, WordError> {
        let rows = self
            .store
            .words_by_language_and_user(language_id, user_id)
            .await?;
        Ok(rows.into_iter().map(Word::from).collect())
    }

    /// The user's words occurring in a text, each with its translations into
    /// `target_language_id`. `simple` restricts translations to the ones the
    /// user saved; callers without a preference pass `true`.
    pub async fn get_user_words_in_text(
        &self,
        user_id: i64,
        text_id: i64,
        target_language_id: &str,
        simple: bool,
    ) -> Result<Vec<UserWord>, WordError> {
        let rows = self
            .store
            .user_words_in_text(user_id, text_id, target_language_id, simple)
            .await?;
        debug!(
            user_id,
            text_id,
            target_language_id,
            simple,
            rows = rows.len(),
            "loaded user words in text"
        );

        reshape::user_words(rows, TargetLanguage::Fixed(target_language_id))
    }

    /// The user's words in a language with every translation they saved,
    /// whatever its target language.
    pub async fn get_user_words_by_language(
        &self,
        language_id: &str,
        user_id: i64,
    ) -> Result<Vec<UserWord>, WordError> {
        let rows = self
            .store
            .user_words_by_language(language_id, user_id)
            .await?;
        debug!(
            user_id,
            language_id,
            rows = rows.len(),
            "loaded user words by language"
        );

        reshape::user_words(rows, TargetLanguage::PerTranslation)
    }

    /// Exact lookup of a word in a language. `None` when it is not stored yet.
    pub async fn get_word_in_language(
        &self,
        word: &str,
        language_id: &str,
    ) -> Result<Option<Word>, WordError> {
        let row = self
            .store
            .word_in_language(&canonical_word(word), language_id)
            .await?;
        Ok(row.map(Word::from))
    }

    /// Store a new word. A word already stored in the language is rejected as
    /// a duplicate.
    pub async fn add_new(&self, new_word: &NewWord) -> Result<Word, WordError> {
        let new_word = canonical(new_word)?;

        let mut unit = self.store.begin().await?;
        let word = add_word_in(&mut unit, &new_word).await?;
        unit.commit().await?;

        Ok(word)
    }

    /// Delete a word together with its statuses and translations.
    pub async fn remove(&self, word_id: i64) -> Result<Word, WordError> {
        let mut unit = self.store.begin().await?;
        let row = expect_written(REMOVE_WORD, unit.delete_word(word_id).await)?;
        unit.commit().await?;

        info!(word_id, "removed word");
        Ok(Word::from(row))
    }

    /// The user's status for a word. A missing status is a
    /// [`Rejection::NoMatchingRow`], but not counted as a rejected write.
    pub async fn get_status(&self, word_id: i64, user_id: i64) -> Result<String, WordError> {
        self.store
            .word_status(word_id, user_id)
            .await?
            .ok_or(WordError::rejected(GET_STATUS, Rejection::NoMatchingRow))
    }

    pub async fn add_status(
        &self,
        word_id: i64,
        user_id: i64,
        word_status: &str,
    ) -> Result<String, WordError> {
        let mut unit = self.store.begin().await?;
        let status = add_status_in(&mut unit, word_id, user_id, word_status).await?;
        unit.commit().await?;

        Ok(status)
    }

    pub async fn update_status(
        &self,
        word_id: i64,
        user_id: i64,
        word_status: &str,
    ) -> Result<String, WordError> {
        let mut unit = self.store.begin().await?;
        let status = expect_written(
            UPDATE_STATUS,
            unit.update_status(word_id, user_id, word_status).await,
        )?;
        unit.commit().await?;

        Ok(status)
    }

    /// Add a word the learner met for the first time: the word in the language
    /// they learn, their status for it and its first translation, saved into
    /// their translations.
    ///
    /// Only the first entry of `translations` is stored; the returned word
    /// lists exactly that one translation, carrying the new ids.
    ///
    /// All writes share one unit of work. If any of them fails, nothing is
    /// kept and the failing step is reported in
    /// [`WordError::UserWordAborted`].
    pub async fn add_new_user_word(
        &self,
        learner: &Learner,
        new_user_word: NewUserWord,
    ) -> Result<UserWord, WordError> {
        self.add_new_user_word_with_cancel(learner, new_user_word, &CancellationToken::new())
            .await
    }

    /// [`WordService::add_new_user_word`], checking `cancel` before every
    /// write. A cancelled call rolls back and returns
    /// [`WordError::Cancelled`].
    pub async fn add_new_user_word_with_cancel(
        &self,
        learner: &Learner,
        new_user_word: NewUserWord,
        cancel: &CancellationToken,
    ) -> Result<UserWord, WordError> {
        new_user_word.validate()?;

        let NewUserWord {
            word,
            status,
            translations,
        } = new_user_word;

        let new_word = canonical(&NewWord {
            word,
            language_id: learner.learning_language_id.clone(),
        })?;

        let ignored = translations.len().saturating_sub(1);
        let Some(translation) = translations.into_iter().next() else {
            let mut errors = ValidationErrors::new();
            errors.add("translations", ValidationError::new("length"));
            return Err(errors.into());
        };
        if ignored > 0 {
            debug!(ignored, "only the first supplied translation is stored");
        }

        let mut unit = self.store.begin().await?;

        let created = create_user_word(
            &mut unit,
            learner,
            &new_word,
            &status,
            &translation,
            cancel,
        )
        .await;

        match created {
            Ok(user_word) => {
                if let Err(err) = unit.commit().await {
                    warn!(user_id = learner.user_id, error = %err, "commit of new user word failed");
                    metrics::record_user_word_rollback(CreateStep::Commit);
                    return Err(WordError::UserWordAborted {
                        step: CreateStep::Commit,
                        source: Box::new(err.into()),
                    });
                }

                info!(
                    user_id = learner.user_id,
                    word_id = user_word.id,
                    word = %user_word.word,
                    "added new user word"
                );
                metrics::record_user_word_created();
                Ok(user_word)
            }
            Err((step, err)) => {
                if let Err(rollback_err) = unit.rollback().await {
                    warn!(error = %rollback_err, "rollback of new user word failed");
                }
                warn!(
                    user_id = learner.user_id,
                    %step,
                    error = %err,
                    "new user word rolled back"
                );
                metrics::record_user_word_rollback(step);

                match err {
                    WordError::Cancelled { .. } => Err(err),
                    err => Err(WordError::UserWordAborted {
                        step,
                        source: Box::new(err),
                    }),
                }
            }
        }
    }
}

/// The ordered writes of a new user word. Each failure is tagged with the
/// step it happened in.
async fn create_user_word<U: WordUnit>(
    unit: &mut U,
    learner: &Learner,
    new_word: &NewWord,
    status: &str,
    translation: &NewTranslation,
    cancel: &CancellationToken,
) -> Result<UserWord, (CreateStep, WordError)> {
    let step = CreateStep::InsertWord;
    check_cancelled(cancel, step)?;
    let word = add_word_in(unit, new_word)
        .await
        .map_err(|err| (step, err))?;

    let step = CreateStep::InsertStatus;
    check_cancelled(cancel, step)?;
    let status = add_status_in(unit, word.id, learner.user_id, status)
        .await
        .map_err(|err| (step, err))?;

    let step = CreateStep::InsertTranslation;
    check_cancelled(cancel, step)?;
    let stored = translations::add_in(
        unit,
        word.id,
        &translation.translation,
        &translation.target_language_id,
    )
    .await
    .map_err(|err| (step, err))?;

    let step = CreateStep::LinkTranslation;
    check_cancelled(cancel, step)?;
    let link = translations::add_to_users_translations_in(
        unit,
        learner.user_id,
        stored.id,
        translation.context.as_deref(),
    )
    .await
    .map_err(|err| (step, err))?;

    Ok(UserWord {
        id: word.id,
        word: word.word,
        status,
        translations: vec![Translation {
            context: link.context,
            ..stored
        }],
    })
}

fn check_cancelled(
    cancel: &CancellationToken,
    step: CreateStep,
) -> Result<(), (CreateStep, WordError)> {
    if cancel.is_cancelled() {
        Err((step, WordError::Cancelled { before: step }))
    } else {
        Ok(())
    }
}

fn canonical(new_word: &NewWord) -> Result<NewWord, WordError> {
    let new_word = NewWord {
        word: canonical_word(&new_word.word),
        language_id: new_word.language_id.clone(),
    };
    new_word.validate()?;
    Ok(new_word)
}

async fn add_word_in<U: WordUnit>(unit: &mut U, new_word: &NewWord) -> Result<Word, WordError> {
    let row = expect_written(
        ADD_WORD,
        unit.insert_word(&new_word.word, &new_word.language_id)
            .await,
    )?;
    Ok(Word::from(row))
}

async fn add_status_in<U: WordUnit>(
    unit: &mut U,
    word_id: i64,
    user_id: i64,
    word_status: &str,
) -> Result<String, WordError> {
    expect_written(
        ADD_STATUS,
        unit.insert_status(word_id, user_id, word_status).await,
    )
}
