//! History of AI asset generations

use std::time::{SystemTime, UNIX_EPOCH};

use serde::{Deserialize, Serialize};
use shared::Asset;

/// One round of user feedback and the assets it produced
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GenerationRecord {
    pub id: String,
    /// Milliseconds since the Unix epoch
    pub timestamp: u64,
    pub user_input: String,
    pub generated_assets: Vec<Asset>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub context: Option<String>,
}

#[derive(Default)]
pub struct GenerationLog {
    history: Vec<GenerationRecord>,
    latest: Option<usize>,
}

impl GenerationLog {
    /// Append a record and make it the latest one
    pub fn record(&mut self, user_input: String, assets: Vec<Asset>, context: Option<String>) -> &GenerationRecord {
        let timestamp = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|d| d.as_millis() as u64)
            .unwrap_or_default();

        self.history.push(GenerationRecord {
            id: uuid::Uuid::new_v4().to_string(),
            timestamp,
            user_input,
            generated_assets: assets,
            context,
        });
        let index = self.history.len() - 1;
        self.latest = Some(index);
        &self.history[index]
    }

    /// Make an earlier record the latest one
    pub fn load_previous(&mut self, id: &str) -> bool {
        match self.history.iter().position(|r| r.id == id) {
            Some(index) => {
                self.latest = Some(index);
                true
            }
            None => false,
        }
    }

    pub fn latest(&self) -> Option<&GenerationRecord> {
        self.latest.map(|i| &self.history[i])
    }

    pub fn history(&self) -> &[GenerationRecord] {
        &self.history
    }
}
