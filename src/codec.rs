// Whole-collection encoding for the persisted slot

use crate::models::Task;
use eyre::{Context, Result};
use tracing::debug;

/// Encode the full collection as a JSON array
pub fn encode(tasks: &[Task]) -> Result<Vec<u8>> {
    serde_json::to_vec(tasks).context("Failed to serialize task collection")
}

/// Decode a full collection
///
/// Decoding is all-or-nothing: a single malformed record fails the whole blob.
/// An empty or whitespace-only blob is an empty collection.
pub fn decode(bytes: &[u8]) -> Result<Vec<Task>> {
    if bytes.iter().all(u8::is_ascii_whitespace) {
        debug!("Slot is empty, decoding as empty collection");
        return Ok(Vec::new());
    }

    let tasks: Vec<Task> = serde_json::from_slice(bytes).context("Failed to parse task collection")?;
    debug!(count = tasks.len(), "Decoded task collection");
    Ok(tasks)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn task(title: &str) -> Task {
        Task::new(title, false, NaiveDate::from_ymd_opt(2024, 1, 1).unwrap(), "Personal")
    }

    #[test]
    fn test_encode_is_json_array_in_order() {
        let tasks = vec![task("first"), task("second")];
        let bytes = encode(&tasks).unwrap();

        let value: serde_json::Value = serde_json::from_slice(&bytes).unwrap();
        let array = value.as_array().unwrap();
        assert_eq!(array.len(), 2);
        assert_eq!(array[0]["title"], "first");
        assert_eq!(array[1]["title"], "second");
    }

    #[test]
    fn test_decode_preserves_fields_and_order() {
        let mut tasks = vec![task("a"), task("b"), task("c")];
        tasks[1].is_done = true;
        tasks[2].is_important = true;

        let decoded = decode(&encode(&tasks).unwrap()).unwrap();
        assert_eq!(decoded, tasks);
    }

    #[test]
    fn test_decode_empty_and_whitespace() {
        assert!(decode(b"").unwrap().is_empty());
        assert!(decode(b"  \n\t").unwrap().is_empty());
        assert!(decode(b"[]").unwrap().is_empty());
    }

    #[test]
    fn test_decode_malformed_fails_whole_blob() {
        let good = encode(&[task("ok")]).unwrap();
        let mut text = String::from_utf8(good).unwrap();
        text.insert_str(text.len() - 1, r#",{"id":"nope"}"#);

        assert!(decode(text.as_bytes()).is_err());
        assert!(decode(b"{malformed json}").is_err());
        assert!(decode(b"{\"id\":\"x\"}").is_err(), "a single object is not a collection");
    }
}
