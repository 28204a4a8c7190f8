//! Deterministic document identifiers.
//!
//! An identifier is the first 8 bytes of the SHA-256 digest of a compact JSON
//! object `{"title", "url", "category"}`, rendered as 16 lowercase hex
//! characters. Empty `url` and `category` values are left out of the JSON, so
//! `("A", "", "")` and `("A", "x", "")` hash different inputs.

use std::fmt::Write as _;

use serde::Serialize;
use sha2::{Digest, Sha256};

/// Number of digest bytes kept in an identifier.
const ID_BYTES: usize = 8;

#[derive(Serialize)]
struct DocumentKey<'a> {
    title: &'a str,
    #[serde(skip_serializing_if = "str::is_empty")]
    url: &'a str,
    #[serde(skip_serializing_if = "str::is_empty")]
    category: &'a str,
}

/// Compute the identifier for a document.
///
/// ```rust
/// use ax_core::doc_id::generate;
///
/// let id = generate("Button", "https://example.com/button", "Components");
/// assert_eq!(id.len(), 16);
/// assert_eq!(id, generate("Button", "https://example.com/button", "Components"));
/// ```
pub fn generate(title: &str, url: &str, category: &str) -> String {
    let key = DocumentKey {
        title,
        url,
        category,
    };
    // Serializing borrowed strings into a Vec cannot fail.
    let payload = serde_json::to_vec(&key).unwrap_or_default();
    let digest = Sha256::digest(&payload);

    digest[..ID_BYTES]
        .iter()
        .fold(String::with_capacity(ID_BYTES * 2), |mut out, byte| {
            let _ = write!(out, "{byte:02x}");
            out
        })
}
