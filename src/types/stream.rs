//! Streaming types.

use serde::{Deserialize, Serialize};

use super::message::ChatMessage;

/// One incremental fragment decoded from the provider's response stream.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ChatDelta {
    /// A free-text fragment, forwarded to the caller in arrival order.
    Text(String),
    /// A tool-call fragment; see [`ToolCallDelta`].
    ToolCall(ToolCallDelta),
    /// Explicit end-of-stream marker.
    Done,
}

/// A partial tool call carried by one stream delta.
///
/// `index` is the call's position within the response's tool-call array and
/// is the key the aggregator assembles fragments under. The argument piece
/// is a raw slice of JSON text, meaningless until all pieces for the same
/// index have been concatenated.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ToolCallDelta {
    pub index: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub arguments: Option<String>,
}

/// Event surfaced to callers of a streaming turn.
///
/// A well-formed turn yields any number of `TextDelta`s followed by exactly
/// one `Completed`; a failed turn ends with one `Failed` instead.
#[derive(Debug, Clone, PartialEq)]
pub enum TurnEvent {
    TextDelta(String),
    Completed(ChatMessage),
    Failed(String),
}
