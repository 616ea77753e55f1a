//! In-memory doubles for the storage and extraction seams.

#![allow(dead_code)]

use std::collections::{BTreeMap, HashMap, HashSet};
use std::sync::{Arc, Mutex};

use pactum_core::models::token_count::{TokenCount, TokenUsage};
use pactum_extract::{ExtractError, ExtractionOptions, ExtractionResult, Extractor, Provider};
use pactum_storage::error::StorageError;
use pactum_storage::{ObjectMeta, ObjectStore};
use serde_json::Map;

#[derive(Default)]
struct StoreState {
    objects: BTreeMap<String, Vec<u8>>,
    fail_fetch: HashSet<String>,
    fail_copy_to: HashSet<String>,
    fail_delete: HashSet<String>,
    fail_list: bool,
}

/// Bucket held in a sorted map. Clones share state, so a test can keep a
/// handle after moving the store into a pipeline.
#[derive(Clone, Default)]
pub struct MemoryStore {
    state: Arc<Mutex<StoreState>>,
}

impl MemoryStore {
    pub fn with_objects(keys: &[&str]) -> Self {
        let store = Self::default();
        for key in keys {
            store.put(key, format!("%PDF body of {key}").as_bytes());
        }
        store
    }

    pub fn put(&self, key: &str, body: &[u8]) {
        self.state
            .lock()
            .unwrap()
            .objects
            .insert(key.to_string(), body.to_vec());
    }

    pub fn contains(&self, key: &str) -> bool {
        self.state.lock().unwrap().objects.contains_key(key)
    }

    pub fn keys(&self) -> Vec<String> {
        self.state.lock().unwrap().objects.keys().cloned().collect()
    }

    pub fn fail_fetch_of(&self, key: &str) {
        self.state.lock().unwrap().fail_fetch.insert(key.to_string());
    }

    pub fn fail_copy_to(&self, key: &str) {
        self.state.lock().unwrap().fail_copy_to.insert(key.to_string());
    }

    pub fn fail_delete_of(&self, key: &str) {
        self.state.lock().unwrap().fail_delete.insert(key.to_string());
    }

    pub fn fail_listing(&self) {
        self.state.lock().unwrap().fail_list = true;
    }
}

impl ObjectStore for MemoryStore {
    async fn fetch(&self, key: &str) -> Result<Vec<u8>, StorageError> {
        let state = self.state.lock().unwrap();
        if state.fail_fetch.contains(key) {
            return Err(StorageError::GetObject("connection reset".to_string()));
        }
        state
            .objects
            .get(key)
            .cloned()
            .ok_or_else(|| StorageError::NotFound {
                key: key.to_string(),
            })
    }

    async fn store(
        &self,
        body: Vec<u8>,
        key: &str,
        _metadata: &HashMap<String, String>,
    ) -> Result<String, StorageError> {
        self.put(key, &body);
        Ok(format!("memory://{key}"))
    }

    async fn list(&self, prefix: &str) -> Result<Vec<ObjectMeta>, StorageError> {
        let state = self.state.lock().unwrap();
        if state.fail_list {
            return Err(StorageError::ListObjects("access denied".to_string()));
        }
        Ok(state
            .objects
            .iter()
            .filter(|(key, _)| key.starts_with(prefix))
            .map(|(key, body)| ObjectMeta {
                key: key.clone(),
                size: body.len() as i64,
                last_modified: None,
            })
            .collect())
    }

    async fn copy(&self, src: &str, dest: &str) -> Result<(), StorageError> {
        let mut state = self.state.lock().unwrap();
        if state.fail_copy_to.contains(dest) {
            return Err(StorageError::CopyObject("slow down".to_string()));
        }
        let body = state
            .objects
            .get(src)
            .cloned()
            .ok_or_else(|| StorageError::NotFound {
                key: src.to_string(),
            })?;
        state.objects.insert(dest.to_string(), body);
        Ok(())
    }

    async fn delete(&self, key: &str) -> Result<(), StorageError> {
        let mut state = self.state.lock().unwrap();
        if state.fail_delete.contains(key) {
            return Err(StorageError::DeleteObject("access denied".to_string()));
        }
        state.objects.remove(key);
        Ok(())
    }
}

/// What the scripted extractor answers for a given filename.
#[derive(Clone)]
pub enum Script {
    Text(String),
    Fail(String),
}

/// Extractor that replies from a per-filename script and records calls.
#[derive(Clone, Default)]
pub struct ScriptedExtractor {
    scripts: Arc<Mutex<HashMap<String, Script>>>,
    calls: Arc<Mutex<Vec<String>>>,
}

impl ScriptedExtractor {
    pub fn answer(&self, filename: &str, text: impl Into<String>) -> &Self {
        self.scripts
            .lock()
            .unwrap()
            .insert(filename.to_string(), Script::Text(text.into()));
        self
    }

    pub fn fail(&self, filename: &str, message: &str) -> &Self {
        self.scripts
            .lock()
            .unwrap()
            .insert(filename.to_string(), Script::Fail(message.to_string()));
        self
    }

    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }
}

pub const DEFAULT_ANSWER: &str =
    r#"{"extractedData": {"customerName": "Acme Foods", "capacity": 500}, "confidence": {"capacity": 0.92}, "notes": ["signed copy"]}"#;

impl Extractor for ScriptedExtractor {
    async fn extract(
        &self,
        _bytes: &[u8],
        filename: &str,
        options: &ExtractionOptions,
    ) -> Result<ExtractionResult, ExtractError> {
        self.calls.lock().unwrap().push(filename.to_string());
        let script = self.scripts.lock().unwrap().get(filename).cloned();

        let text = match script {
            Some(Script::Fail(message)) => return Err(ExtractError::Invocation(message)),
            Some(Script::Text(text)) => text,
            None => DEFAULT_ANSWER.to_string(),
        };

        Ok(ExtractionResult {
            text,
            confidence: Map::new(),
            notes: Vec::new(),
            citations: Vec::new(),
            usage: TokenUsage {
                tokens: TokenCount {
                    input: 1000,
                    output: 200,
                },
                cost_usd: 0.006,
            },
            elapsed_ms: 42,
            provider: options.provider.unwrap_or(Provider::Bedrock),
            api: "converse".to_string(),
            model_id: "test-model".to_string(),
        })
    }
}
