use encoding_rs::{Encoding, UTF_8};

/// Decode a results page into text.
///
/// A BOM wins, then the Content-Type charset, then UTF-8. Malformed sequences
/// are replaced rather than rejected: the marker scan only needs ASCII.
pub fn decode_page(bytes: &[u8], content_type: Option<&str>) -> String {
    let encoding = content_type
        .and_then(extract_charset)
        .and_then(|label| Encoding::for_label(label.as_bytes()))
        .unwrap_or(UTF_8);
    let (text, _, _) = encoding.decode(bytes);
    text.into_owned()
}

fn extract_charset(content_type: &str) -> Option<String> {
    content_type
        .split(';')
        .filter_map(|part| {
            let (key, value) = part.split_once('=')?;
            if key.trim().eq_ignore_ascii_case("charset") {
                Some(value.trim_matches([' ', '"', '\''].as_ref()).to_string())
            } else {
                None
            }
        })
        .next()
}
