//! Counters for the vocabulary write paths.
//!
//! Recorded through the `metrics` facade; the embedding application decides
//! whether an exporter is installed.

use metrics::counter;

use crate::error::{CreateStep, Rejection};

/// Record a committed composite word creation
pub fn record_user_word_created() {
    counter!("user_words_created_total").increment(1);
}

/// Record a composite word creation that was rolled back
pub fn record_user_word_rollback(step: CreateStep) {
    counter!(
        "user_word_rollbacks_total",
        "step" => step_label(step)
    )
    .increment(1);
}

/// Record a write turned down by the store
pub fn record_rejection(operation: &'static str, cause: Rejection) {
    counter!(
        "word_write_rejections_total",
        "operation" => operation,
        "cause" => cause_label(cause)
    )
    .increment(1);
}

const fn step_label(step: CreateStep) -> &'static str {
    match step {
        CreateStep::InsertWord => "insert_word",
        CreateStep::InsertStatus => "insert_status",
        CreateStep::InsertTranslation => "insert_translation",
        CreateStep::LinkTranslation => "link_translation",
        CreateStep::Commit => "commit",
    }
}

const fn cause_label(cause: Rejection) -> &'static str {
    match cause {
        Rejection::Duplicate => "duplicate",
        Rejection::MissingReference => "missing_reference",
        Rejection::NoMatchingRow => "no_matching_row",
    }
}
