//! Flattening search hits into a single context block.

use serde_json::Value;
use tracing::debug;

use rag_core::{RagError, Result, SearchHit, SourceFields};

/// Separator placed between chunks of the same parent hit.
pub const CHUNK_SEPARATOR: &str = "\n --- \n";

/// Concatenate the passage text of `hits` in ranking order.
///
/// A hit carrying inner hits under `"{index}.{field}"` contributes its
/// chunk texts joined by [`CHUNK_SEPARATOR`]; any other hit contributes
/// its `_source[field]` followed by a newline.
pub fn assemble_context(hits: &[SearchHit], fields: &SourceFields) -> Result<String> {
    let mut context = String::new();

    for hit in hits {
        let field = fields
            .primary_field(&hit.index)
            .ok_or_else(|| RagError::UnmappedIndex {
                index: hit.index.clone(),
            })?;
        let key = format!("{}.{}", hit.index, field);

        match hit.inner_hits_for(&key) {
            Some(chunks) => {
                let texts = chunks
                    .iter()
                    .map(|chunk| {
                        chunk
                            .text()
                            .ok_or_else(|| RagError::missing_field(&hit.index, "text"))
                    })
                    .collect::<Result<Vec<_>>>()?;

                debug!("Hit {} contributed {} chunks", hit.id, texts.len());
                context.push_str(&texts.join(CHUNK_SEPARATOR));
            }
            None => {
                let value = hit
                    .source
                    .get(field)
                    .ok_or_else(|| RagError::missing_field(&hit.index, field))?;

                debug!("Hit {} contributed source field {}", hit.id, field);
                context.push_str(&value_text(value));
                context.push('\n');
            }
        }
    }

    Ok(context)
}

/// Text of a source value: strings verbatim, `{"text": ..}` objects by
/// their text, anything else as compact JSON.
fn value_text(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        Value::Object(map) => match map.get("text") {
            Some(Value::String(s)) => s.clone(),
            _ => value.to_string(),
        },
        other => other.to_string(),
    }
}

/// Keep at most `max_words` whitespace-separated words.
///
/// Text that already fits is returned unchanged; otherwise the kept
/// words are re-joined with single spaces.
pub fn truncate_words(text: &str, max_words: usize) -> String {
    let words: Vec<&str> = text.split_whitespace().collect();
    if words.len() <= max_words {
        return text.to_string();
    }
    words[..max_words].join(" ")
}
