// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

use anyhow::{Context, Result, bail};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use serde_json::{Map, Value};

pub const CUSTOM_MODELS_KEY: &str = "custom_models";
pub const NEW_MODEL_NAME: &str = "New Model";

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum Provider {
    Anthropic,
    #[default]
    OpenAi,
    GenericChatCompletionApi,
    /// A provider string outside the known set, kept verbatim for round-trips.
    Unrecognized(String),
}

impl Provider {
    pub const KNOWN: [Self; 3] = [Self::Anthropic, Self::OpenAi, Self::GenericChatCompletionApi];

    pub fn as_str(&self) -> &str {
        match self {
            Self::Anthropic => "anthropic",
            Self::OpenAi => "openai",
            Self::GenericChatCompletionApi => "generic-chat-completion-api",
            Self::Unrecognized(raw) => raw,
        }
    }

    pub fn parse(value: &str) -> Self {
        match value {
            "anthropic" => Self::Anthropic,
            "openai" => Self::OpenAi,
            "generic-chat-completion-api" => Self::GenericChatCompletionApi,
            other => Self::Unrecognized(other.to_owned()),
        }
    }

    /// Position in [`Provider::KNOWN`], `None` for unrecognized values.
    pub fn position(&self) -> Option<usize> {
        Self::KNOWN.iter().position(|known| known == self)
    }

    pub fn known(index: usize) -> Self {
        Self::KNOWN[index % Self::KNOWN.len()].clone()
    }

    pub const fn badge(&self) -> &'static str {
        match self {
            Self::Anthropic => "[A]",
            Self::OpenAi => "[O]",
            Self::GenericChatCompletionApi => "[G]",
            Self::Unrecognized(_) => "[?]",
        }
    }
}

impl Serialize for Provider {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for Provider {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = Option::<String>::deserialize(deserializer)?.unwrap_or_default();
        Ok(Self::parse(&raw))
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ModelRecord {
    #[serde(rename = "model_display_name", default, deserialize_with = "nullable_string")]
    pub display_name: String,
    #[serde(rename = "model", default, deserialize_with = "nullable_string")]
    pub model_id: String,
    #[serde(default, deserialize_with = "nullable_string")]
    pub base_url: String,
    #[serde(default, deserialize_with = "nullable_string")]
    pub api_key: String,
    #[serde(default = "unset_provider")]
    pub provider: Provider,
    /// `None` is written as `0` on the wire.
    #[serde(default, with = "max_tokens_wire")]
    pub max_tokens: Option<u64>,
}

impl ModelRecord {
    pub fn placeholder() -> Self {
        Self {
            display_name: NEW_MODEL_NAME.to_owned(),
            model_id: String::new(),
            base_url: String::new(),
            api_key: String::new(),
            provider: Provider::OpenAi,
            max_tokens: None,
        }
    }

    /// Name shown in the sidebar: display name, then model id, then a stand-in.
    pub fn list_label(&self) -> &str {
        if !self.display_name.is_empty() {
            &self.display_name
        } else if !self.model_id.is_empty() {
            &self.model_id
        } else {
            "(unnamed)"
        }
    }
}

fn unset_provider() -> Provider {
    Provider::Unrecognized(String::new())
}

fn nullable_string<'de, D: Deserializer<'de>>(deserializer: D) -> Result<String, D::Error> {
    Ok(Option::<String>::deserialize(deserializer)?.unwrap_or_default())
}

mod max_tokens_wire {
    use serde::{Deserialize, Deserializer, Serializer};
    use serde_json::Value;

    pub fn serialize<S: Serializer>(value: &Option<u64>, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_u64(value.unwrap_or(0))
    }

    /// Any positive JSON integer is kept. Everything else, including negatives,
    /// floats and strings, reads as unset rather than failing the record.
    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Option<u64>, D::Error> {
        let raw = Option::<Value>::deserialize(deserializer)?;
        Ok(raw
            .as_ref()
            .and_then(Value::as_u64)
            .filter(|value| *value > 0))
    }
}

/// The persisted JSON object: typed `custom_models` plus every other top-level
/// key carried through untouched.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Document {
    pub custom_models: Vec<ModelRecord>,
    // Holds a null placeholder under `custom_models` so the key keeps its slot.
    residue: Map<String, Value>,
}

impl Document {
    pub fn new(custom_models: Vec<ModelRecord>) -> Self {
        Self {
            custom_models,
            residue: Map::new(),
        }
    }

    /// Strict parse: any problem with the root or `custom_models` is an error.
    pub fn parse(raw: &str) -> Result<Self> {
        let mut residue = parse_root(raw)?;
        let custom_models = match residue.get_mut(CUSTOM_MODELS_KEY) {
            Some(slot) => decode_models(slot.take())?,
            None => Vec::new(),
        };
        Ok(Self {
            custom_models,
            residue,
        })
    }

    /// Like [`Document::parse`], but a malformed `custom_models` array degrades
    /// to an empty list while the remaining keys are kept.
    pub fn parse_lenient(raw: &str) -> Result<Self> {
        let mut residue = parse_root(raw)?;
        let custom_models = match residue.get_mut(CUSTOM_MODELS_KEY) {
            Some(slot) => match decode_models(slot.take()) {
                Ok(models) => models,
                Err(error) => {
                    tracing::warn!("ignoring malformed {CUSTOM_MODELS_KEY}: {error:#}");
                    Vec::new()
                }
            },
            None => Vec::new(),
        };
        Ok(Self {
            custom_models,
            residue,
        })
    }

    pub fn extra(&self, key: &str) -> Option<&Value> {
        if key == CUSTOM_MODELS_KEY {
            return None;
        }
        self.residue.get(key)
    }

    pub fn extra_keys(&self) -> impl Iterator<Item = &str> {
        self.residue
            .keys()
            .map(String::as_str)
            .filter(|key| *key != CUSTOM_MODELS_KEY)
    }

    pub fn to_value(&self) -> Result<Value> {
        let mut object = self.residue.clone();
        let models = serde_json::to_value(&self.custom_models).context("encode custom_models")?;
        object.insert(CUSTOM_MODELS_KEY.to_owned(), models);
        Ok(Value::Object(object))
    }

    pub fn to_json_pretty(&self) -> Result<String> {
        serde_json::to_string_pretty(&self.to_value()?).context("serialize document")
    }
}

fn parse_root(raw: &str) -> Result<Map<String, Value>> {
    let value: Value = serde_json::from_str(raw).context("parse JSON document")?;
    match value {
        Value::Object(object) => Ok(object),
        other => bail!("document root must be a JSON object, found {}", value_kind(&other)),
    }
}

fn decode_models(value: Value) -> Result<Vec<ModelRecord>> {
    if value.is_null() {
        return Ok(Vec::new());
    }
    serde_json::from_value(value).with_context(|| format!("decode {CUSTOM_MODELS_KEY} array"))
}

const fn value_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}
