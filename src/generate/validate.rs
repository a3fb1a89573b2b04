// src/generate/validate.rs
//! Cross-validation placeholder. This stage does NOT fact-check the article
//! against its source links; it attaches a fixed record so downstream
//! consumers see a stable `validation` field. Real verification against
//! `source_articles` is a future stage.

use chrono::Utc;

use crate::store::{GeneratedArticle, ValidationResult};

const PLACEHOLDER_SCORE: u32 = 85;

/// Attach the placeholder validation record. Synchronous, always succeeds.
pub fn attach_validation(mut article: GeneratedArticle) -> GeneratedArticle {
    article.validation = Some(ValidationResult {
        accuracy_score: PLACEHOLDER_SCORE,
        verified_facts: vec!["Basic source check passed (placeholder)".to_string()],
        validation_timestamp: Utc::now(),
    });
    article
}
