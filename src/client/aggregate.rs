//! Reassembly of tool-call requests from stream fragments.

use crate::types::{ToolCallDelta, ToolCallRequest};

#[derive(Debug, Default)]
struct PartialToolCall {
    id: String,
    name: String,
    arguments: String,
}

/// Accumulates [`ToolCallDelta`]s into finalized [`ToolCallRequest`]s.
///
/// Calls are keyed by the delta's `index`: the first fragment seen for an
/// index allocates an empty entry, later fragments fill it in. The id is
/// set once, the name tolerates re-setting, and argument text is always
/// appended: it is a JSON string split across arbitrarily many fragments
/// and only parseable after full concatenation. Entries that never received
/// a name are discarded as noise at the end of the stream.
#[derive(Debug, Default)]
pub struct ToolCallAggregator {
    calls: Vec<PartialToolCall>,
}

impl ToolCallAggregator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Fold one fragment into the in-progress calls.
    pub fn apply(&mut self, delta: &ToolCallDelta) {
        let index = delta.index as usize;
        while self.calls.len() <= index {
            self.calls.push(PartialToolCall::default());
        }

        let call = &mut self.calls[index];
        if call.id.is_empty() {
            if let Some(id) = &delta.id {
                call.id.clone_from(id);
            }
        }
        if let Some(name) = &delta.name {
            call.name.clone_from(name);
        }
        if let Some(fragment) = &delta.arguments {
            call.arguments.push_str(fragment);
        }
    }

    /// Whether any named call has been assembled so far.
    pub fn has_calls(&self) -> bool {
        self.calls.iter().any(|c| !c.name.is_empty())
    }

    /// Finalize: named calls in index order, nameless entries dropped.
    pub fn finish(self) -> Vec<ToolCallRequest> {
        self.calls
            .into_iter()
            .filter(|c| !c.name.is_empty())
            .map(|c| ToolCallRequest {
                id: c.id,
                name: c.name,
                arguments: c.arguments,
            })
            .collect()
    }
}
