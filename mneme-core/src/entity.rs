//! Extracted named entities and their deduplication rules.

use serde::{Deserialize, Serialize};

/// Entity category assigned by the extractor.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum EntityType {
    Person,
    Location,
    Organization,
    Topic,
    Other,
}

/// A named entity span with extractor confidence.
///
/// `text` is the case-sensitive dedup key.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Entity {
    pub text: String,
    pub entity_type: EntityType,
    /// Extractor confidence in [0, 1].
    pub score: f64,
}

impl Entity {
    pub fn new(text: impl Into<String>, entity_type: EntityType, score: f64) -> Self {
        Self {
            text: text.into(),
            entity_type,
            score: score.clamp(0.0, 1.0),
        }
    }
}

/// Identity equality on the dedup key.
impl PartialEq for Entity {
    fn eq(&self, other: &Self) -> bool {
        self.text == other.text
    }
}

impl Eq for Entity {}

/// Deduplicate by text, keeping the highest-score instance.
/// First-seen order is preserved, so extraction order survives dedup.
pub fn dedup_entities(entities: Vec<Entity>) -> Vec<Entity> {
    let mut out: Vec<Entity> = Vec::with_capacity(entities.len());
    let mut index: std::collections::HashMap<String, usize> = std::collections::HashMap::new();

    for entity in entities {
        match index.get(&entity.text) {
            Some(&i) => {
                if entity.score > out[i].score {
                    out[i] = entity;
                }
            }
            None => {
                index.insert(entity.text.clone(), out.len());
                out.push(entity);
            }
        }
    }

    out
}
