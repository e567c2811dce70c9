use std::collections::HashSet;

use rand::{Rng, distr::Alphanumeric};
use url::form_urlencoded;

/// Generates a random alphanumeric token of the given length.
///
/// Used for session ids and OAuth `state` values.
pub fn generate_token(len: usize) -> String {
    rand::rng()
        .sample_iter(&Alphanumeric)
        .take(len)
        .map(char::from)
        .collect()
}

pub fn generate_session_id() -> String {
    generate_token(64)
}

pub fn generate_state() -> String {
    generate_token(32)
}

/// Returns the track ids present in both playlists.
pub fn find_duplicates(a: &HashSet<String>, b: &HashSet<String>) -> HashSet<String> {
    a.intersection(b).cloned().collect()
}

/// Extracts every `playlist` value from an url-encoded form body.
///
/// Checkbox forms submit one `playlist=<id>` pair per checked box, which the
/// usual struct-based form extractors cannot collect into a list.
pub fn parse_playlist_selection(body: &[u8]) -> Vec<String> {
    form_urlencoded::parse(body)
        .filter(|(key, _)| key == "playlist")
        .map(|(_, value)| value.into_owned())
        .filter(|value| !value.is_empty())
        .collect()
}

pub fn escape_html(input: &str) -> String {
    let mut out = String::with_capacity(input.len());
    for c in input.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#x27;"),
            _ => out.push(c),
        }
    }
    out
}

/// Builds `/find_duplicates/{first}/{second}` with both ids percent-encoded.
pub fn comparison_path(first: &str, second: &str) -> String {
    format!(
        "/find_duplicates/{}/{}",
        encode_path_segment(first),
        encode_path_segment(second)
    )
}

fn encode_path_segment(segment: &str) -> String {
    // form encoding turns spaces into '+', which a path would keep literally
    form_urlencoded::byte_serialize(segment.as_bytes())
        .collect::<String>()
        .replace('+', "%20")
}
