use chrono::{Duration, Utc};

use mneme_core::document::{Document, DocumentStatus, DocumentType};

/// An Active document timestamped `days_old` days in the past,
/// for lifecycle and time-decay tests.
pub fn aged_document(content: &str, days_old: i64, importance: f64) -> Document {
    let mut doc = Document::new(content, DocumentType::Note).with_importance(importance);
    doc.timestamp = Utc::now() - Duration::days(days_old);
    doc.created_at = doc.timestamp;
    doc.status = DocumentStatus::Active;
    doc
}
