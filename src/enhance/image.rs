/// Base64 image embedder: `data-base64` payloads become `data:` sources

use crate::dom::Document;
use crate::{EnhancerConfig, Result};
use base64::Engine as _;
use log::debug;

/// `data:<mime>;base64,<payload>`. The payload is not validated.
pub fn data_uri(mime: &str, payload: &str) -> String {
    format!("data:{};base64,{}", mime, payload)
}

/// Standard base64 encoding of raw image bytes, as expected in `data-base64`.
pub fn encode_payload(bytes: &[u8]) -> String {
    base64::engine::general_purpose::STANDARD.encode(bytes)
}

/// Set `src` on every matching image with a non-empty payload.
///
/// Returns the number of images embedded.
pub fn embed_images(doc: &mut Document, config: &EnhancerConfig) -> Result<usize> {
    let mut embedded = 0;
    for id in doc.select(&config.image_selector)? {
        let src = match doc.dataset(id, "base64") {
            Some(payload) if !payload.is_empty() => data_uri(&config.image_mime, payload),
            _ => continue,
        };
        doc.set_attr(id, "src", &src);
        embedded += 1;
    }
    debug!("embedded {} inline image(s)", embedded);
    Ok(embedded)
}
