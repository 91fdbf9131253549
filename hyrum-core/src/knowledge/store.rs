//! Knowledge file loading and lookup

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use tracing::{info, warn};

use crate::error::{HyrumError, Result};

/// Topic present in the built-in fallback store
pub const DEFAULT_TOPIC: &str = "atendimento";

const DEFAULT_TEXT: &str = "Nossa equipe de atendimento responde de segunda a sexta, \
das 9h às 18h. Para dúvidas sobre prazos, trocas ou pagamentos, consulte os termos \
e condições completos da loja.";

/// One topic of the knowledge base.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct KnowledgeRecord {
    #[serde(skip)]
    topic: String,

    /// Text injected into matching messages
    #[serde(rename = "texto_completo", default)]
    full_text: String,

    /// Any other descriptive fields, kept as written
    #[serde(flatten)]
    extra: Map<String, Value>,
}

impl KnowledgeRecord {
    pub fn new(topic: impl Into<String>, full_text: impl Into<String>) -> Self {
        Self {
            topic: topic.into(),
            full_text: full_text.into(),
            extra: Map::new(),
        }
    }

    pub fn topic(&self) -> &str {
        &self.topic
    }

    pub fn full_text(&self) -> &str {
        &self.full_text
    }

    pub fn has_full_text(&self) -> bool {
        !self.full_text.is_empty()
    }

    pub fn extra(&self) -> &Map<String, Value> {
        &self.extra
    }
}

/// Where the records of a store came from
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum KnowledgeOrigin {
    /// Parsed from this file
    File(PathBuf),
    /// Built-in fallback, used because this file does not exist
    Default { missing: PathBuf },
    /// Parsed from an in-memory string
    Inline,
}

/// Read-only topic → record mapping, in file order.
///
/// A store is never mutated after construction; reloading builds a new one.
#[derive(Debug, Clone)]
pub struct KnowledgeStore {
    records: Vec<KnowledgeRecord>,
    index: HashMap<String, usize>,
    origin: KnowledgeOrigin,
}

impl KnowledgeStore {
    /// Load the knowledge file at `path`.
    ///
    /// A missing file is not an error: the condition is logged and the
    /// built-in default store is returned instead.
    ///
    /// # Errors
    ///
    /// Returns an error if the file exists but cannot be read, is not a JSON
    /// object, or contains a record with the wrong shape.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();

        let text = match std::fs::read_to_string(path) {
            Ok(text) => text,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                warn!(path = %path.display(), "Knowledge file not found, using default terms");
                return Ok(Self::default_store().with_origin(KnowledgeOrigin::Default {
                    missing: path.to_path_buf(),
                }));
            }
            Err(source) => {
                return Err(HyrumError::KnowledgeRead {
                    path: path.to_path_buf(),
                    source,
                });
            }
        };

        let store = Self::parse(&text)
            .map_err(|e| match e {
                HyrumError::Serialization(source) => HyrumError::KnowledgeParse {
                    path: path.to_path_buf(),
                    source,
                },
                other => other,
            })?
            .with_origin(KnowledgeOrigin::File(path.to_path_buf()));

        info!(path = %path.display(), topics = store.len(), "Loaded knowledge base");
        Ok(store)
    }

    /// Parse a knowledge document held in memory.
    pub fn from_json_str(text: &str) -> Result<Self> {
        Self::parse(text)
    }

    /// Build a store from records already in memory, keeping their order.
    pub fn from_records(records: impl IntoIterator<Item = KnowledgeRecord>) -> Self {
        let mut store = Self {
            records: Vec::new(),
            index: HashMap::new(),
            origin: KnowledgeOrigin::Inline,
        };
        for record in records {
            match store.index.get(&record.topic) {
                Some(&position) => store.records[position] = record,
                None => {
                    store.index.insert(record.topic.clone(), store.records.len());
                    store.records.push(record);
                }
            }
        }
        store
    }

    /// The built-in fallback store
    pub fn default_store() -> Self {
        Self::from_records([KnowledgeRecord::new(DEFAULT_TOPIC, DEFAULT_TEXT)])
    }

    fn parse(text: &str) -> Result<Self> {
        let raw: Map<String, Value> = serde_json::from_str(text.trim_start_matches('\u{feff}'))?;

        let mut records = Vec::with_capacity(raw.len());
        for (topic, value) in raw {
            let mut record: KnowledgeRecord =
                serde_json::from_value(value).map_err(|e| HyrumError::InvalidRecord {
                    topic: topic.clone(),
                    reason: e.to_string(),
                })?;
            record.topic = topic;
            records.push(record);
        }

        Ok(Self::from_records(records))
    }

    fn with_origin(mut self, origin: KnowledgeOrigin) -> Self {
        self.origin = origin;
        self
    }

    pub fn origin(&self) -> &KnowledgeOrigin {
        &self.origin
    }

    /// Whether this store is the built-in fallback
    pub fn is_default(&self) -> bool {
        matches!(self.origin, KnowledgeOrigin::Default { .. })
    }

    /// Topic keys in load order; call again to restart.
    pub fn topics(&self) -> impl Iterator<Item = &str> + '_ {
        self.records.iter().map(|r| r.topic.as_str())
    }

    /// Records in load order
    pub fn records(&self) -> impl Iterator<Item = &KnowledgeRecord> + '_ {
        self.records.iter()
    }

    /// Exact-key lookup
    pub fn record(&self, topic: &str) -> Option<&KnowledgeRecord> {
        self.index.get(topic).map(|&i| &self.records[i])
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}
