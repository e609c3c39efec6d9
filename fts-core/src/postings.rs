//! Posting-list codec: document ids as comma-joined decimal text.
//!
//! Deliberately human-readable rather than space-optimal; the format is
//! internal to the store and not part of any external contract.

use crate::DocId;
use anyhow::{Context, Result};

const SEPARATOR: &str = ",";

/// Encode ids as decimal integers joined by a comma. Empty input yields the
/// empty string, which is never persisted.
pub fn encode(ids: &[DocId]) -> String {
    let parts: Vec<String> = ids.iter().map(|id| id.to_string()).collect();
    parts.join(SEPARATOR)
}

/// Decode a comma-joined posting list. The index was written by this
/// system, so a fragment that fails to parse means the store is corrupt;
/// the error names the offending fragment and callers should not recover.
pub fn decode(raw: &str) -> Result<Vec<DocId>> {
    raw.split(SEPARATOR)
        .map(|part| {
            part.parse::<DocId>()
                .with_context(|| format!("malformed posting list fragment {part:?}"))
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn encodes_comma_joined() {
        assert_eq!(encode(&[3, 17, 42]), "3,17,42");
        assert_eq!(encode(&[]), "");
    }

    #[test]
    fn decodes_single_id() {
        assert_eq!(decode("0").unwrap(), vec![0]);
    }

    #[test]
    fn round_trip() {
        let ids = vec![0, 5, 123, 4096];
        assert_eq!(decode(&encode(&ids)).unwrap(), ids);
    }

    #[test]
    fn rejects_garbage() {
        assert!(decode("1,x,3").is_err());
        assert!(decode("").is_err());
    }
}
