// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

use anyhow::{Context, Result, anyhow};
use droidcfg_app::{Document, DocumentStore, ModelRecord, Provider};
use serde_json::{Value, json};
use std::path::PathBuf;
use time::OffsetDateTime;
use time::macros::datetime;

const VENDORS: [(&str, Provider, &str); 6] = [
    ("Claude", Provider::Anthropic, "https://api.anthropic.com"),
    ("GPT", Provider::OpenAi, "https://api.openai.com/v1"),
    ("Llama", Provider::GenericChatCompletionApi, "http://localhost:11434/v1"),
    ("Mistral", Provider::GenericChatCompletionApi, "https://api.mistral.ai/v1"),
    ("Qwen", Provider::GenericChatCompletionApi, "https://openrouter.ai/api/v1"),
    ("o-series", Provider::OpenAi, "https://api.openai.com/v1"),
];
const TIERS: [&str; 6] = ["Opus", "Sonnet", "Haiku", "Turbo", "Mini", "Large"];
const VERSIONS: [&str; 5] = ["3", "3.5", "4", "4.1", "5"];
const TOKEN_LIMITS: [u64; 5] = [4_096, 8_192, 16_384, 32_768, 200_000];
const KEY_ALPHABET: &[u8] = b"abcdefghijklmnopqrstuvwxyz0123456789";

#[derive(Debug, Clone)]
struct DeterministicRng {
    state: u64,
}

impl DeterministicRng {
    fn new(seed: u64) -> Self {
        let mut state = seed ^ 0x9E37_79B9_7F4A_7C15;
        if state == 0 {
            state = 0xA409_3822_299F_31D0;
        }
        Self { state }
    }

    fn next_u64(&mut self) -> u64 {
        self.state = self
            .state
            .wrapping_mul(6_364_136_223_846_793_005)
            .wrapping_add(1_442_695_040_888_963_407);

        let mut x = self.state;
        x ^= x >> 13;
        x ^= x << 7;
        x ^= x >> 17;
        x
    }

    fn int_n(&mut self, n: usize) -> usize {
        if n <= 1 {
            return 0;
        }
        (self.next_u64() % (n as u64)) as usize
    }
}

/// Seeded generator of plausible model records.
#[derive(Debug, Clone)]
pub struct ModelFaker {
    rng: DeterministicRng,
}

impl ModelFaker {
    pub fn new(seed: u64) -> Self {
        let normalized = if seed == 0 { 1 } else { seed };
        Self {
            rng: DeterministicRng::new(normalized),
        }
    }

    pub fn int_n(&mut self, n: usize) -> usize {
        self.rng.int_n(n)
    }

    pub fn record(&mut self) -> ModelRecord {
        let (vendor, provider, base_url) = VENDORS[self.int_n(VENDORS.len())].clone();
        let tier = TIERS[self.int_n(TIERS.len())];
        let version = VERSIONS[self.int_n(VERSIONS.len())];
        let max_tokens = if self.int_n(4) == 0 {
            None
        } else {
            Some(TOKEN_LIMITS[self.int_n(TOKEN_LIMITS.len())])
        };

        ModelRecord {
            display_name: format!("{vendor} {version} {tier}"),
            model_id: format!("{}-{version}-{}", vendor.to_lowercase(), tier.to_lowercase()),
            base_url: base_url.to_owned(),
            api_key: self.api_key(),
            provider,
            max_tokens,
        }
    }

    pub fn records(&mut self, count: usize) -> Vec<ModelRecord> {
        (0..count).map(|_| self.record()).collect()
    }

    fn api_key(&mut self) -> String {
        let body: String = (0..24)
            .map(|_| char::from(KEY_ALPHABET[self.int_n(KEY_ALPHABET.len())]))
            .collect();
        format!("sk-{body}")
    }
}

pub fn sample_record() -> ModelRecord {
    ModelRecord {
        display_name: "Test Model".to_owned(),
        model_id: "test-model".to_owned(),
        base_url: "https://api.test.com".to_owned(),
        api_key: "sk-test".to_owned(),
        provider: Provider::OpenAi,
        max_tokens: Some(4096),
    }
}

pub fn demo_records() -> Vec<ModelRecord> {
    ModelFaker::new(7).records(12)
}

/// A document with extra top-level keys around `custom_models`.
pub fn sample_document_json() -> Value {
    json!({
        "theme": "dark",
        "custom_models": [
            {
                "model_display_name": "Test Model",
                "model": "test-model",
                "base_url": "https://api.test.com",
                "api_key": "sk-test",
                "provider": "openai",
                "max_tokens": 4096
            }
        ],
        "other_field": "should be preserved",
        "telemetry": {"enabled": false, "endpoints": ["a", "b"]}
    })
}

pub fn sample_document() -> Result<Document> {
    Document::parse(&sample_document_json().to_string()).context("parse sample document")
}

pub fn temp_document_path() -> Result<(tempfile::TempDir, PathBuf)> {
    let dir = tempfile::tempdir().context("create temp dir")?;
    let path = dir.path().join(".factory").join("config.json");
    Ok((dir, path))
}

pub fn fixture_now() -> OffsetDateTime {
    datetime!(2026-02-19 12:34:56 UTC)
}

/// In-memory [`DocumentStore`] that records every save.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    pub initial: Option<Document>,
    pub saves: Vec<Document>,
    pub fail_with: Option<String>,
}

impl MemoryStore {
    pub fn with_document(document: Document) -> Self {
        Self {
            initial: Some(document),
            ..Self::default()
        }
    }

    pub fn failing(message: impl Into<String>) -> Self {
        Self {
            fail_with: Some(message.into()),
            ..Self::default()
        }
    }

    pub fn save_count(&self) -> usize {
        self.saves.len()
    }

    pub fn last_saved(&self) -> Option<&Document> {
        self.saves.last()
    }
}

impl DocumentStore for MemoryStore {
    fn load(&mut self) -> Result<Option<Document>> {
        Ok(self.saves.last().cloned().or_else(|| self.initial.clone()))
    }

    fn save(&mut self, document: &Document) -> Result<()> {
        if let Some(message) = &self.fail_with {
            return Err(anyhow!("{message}"));
        }
        self.saves.push(document.clone());
        Ok(())
    }
}
