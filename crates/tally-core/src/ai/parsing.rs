//! JSON parsing helpers for remote-assistant responses
//!
//! Remote models answer conversationally and may embed a structured
//! command as a fenced ```json block or a bare JSON object. These helpers
//! pull that fragment out; text without a usable command is simply a chat
//! reply, not an error.

use serde::Deserialize;

/// A structured command embedded in a remote response
#[derive(Debug, Clone, Deserialize)]
pub struct RemoteCommand {
    pub action: String,
    pub amount: f64,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub category: Option<String>,
}

/// Locate a candidate JSON object in free text
///
/// Prefers a fenced ```json block; otherwise takes the first balanced
/// `{...}` span.
fn find_json_fragment(text: &str) -> Option<&str> {
    if let Some(fence_start) = text.find("```json") {
        let after = &text[fence_start + "```json".len()..];
        if let Some(fence_end) = after.find("```") {
            let inner = after[..fence_end].trim();
            if !inner.is_empty() {
                return Some(inner);
            }
        }
    }

    let start = text.find('{')?;
    let mut depth = 0usize;
    for (offset, c) in text[start..].char_indices() {
        match c {
            '{' => depth += 1,
            '}' => {
                depth -= 1;
                if depth == 0 {
                    return Some(&text[start..=start + offset]);
                }
            }
            _ => {}
        }
    }
    None
}

/// Extract an embedded command from a remote response, if any
///
/// Fragments that are not valid command JSON are treated as conversational
/// text and yield None.
pub fn extract_command(text: &str) -> Option<RemoteCommand> {
    let fragment = find_json_fragment(text)?;
    match serde_json::from_str::<RemoteCommand>(fragment) {
        Ok(command) => Some(command),
        Err(e) => {
            tracing::debug!(error = %e, "Remote fragment is not a command");
            None
        }
    }
}
