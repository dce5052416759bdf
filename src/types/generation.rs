//! Inference settings and related enums.

use bon::Builder;
use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};

/// Settings controlling a completion request.
///
/// Every field is optional; unset fields are omitted from the wire request.
/// [`InferenceSettings::merged_over`] implements the override-if-present
/// rule used when caller settings are layered on the harness defaults.
#[derive(Debug, Clone, Builder, Serialize, Deserialize, Default, PartialEq)]
pub struct InferenceSettings {
    pub max_tokens: Option<u32>,
    pub temperature: Option<f64>,
    pub top_p: Option<f64>,
    pub stop_sequences: Option<Vec<String>>,
}

impl InferenceSettings {
    /// The harness defaults applied when the caller does not override a
    /// field: 1000 max tokens, temperature 0.7, top-p 0.9, no stops.
    pub fn harness_defaults() -> Self {
        Self {
            max_tokens: Some(1000),
            temperature: Some(0.7),
            top_p: Some(0.9),
            stop_sequences: None,
        }
    }

    /// Layer `self` over `base`, field by field: a field set in `self`
    /// replaces the base value, an unset field keeps it.
    pub fn merged_over(&self, base: &Self) -> Self {
        Self {
            max_tokens: self.max_tokens.or(base.max_tokens),
            temperature: self.temperature.or(base.temperature),
            top_p: self.top_p.or(base.top_p),
            stop_sequences: self
                .stop_sequences
                .clone()
                .or_else(|| base.stop_sequences.clone()),
        }
    }
}

/// Why a completion finished.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Display, EnumString)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum FinishReason {
    Stop,
    Length,
    ToolCalls,
    ContentFilter,
}
