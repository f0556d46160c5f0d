use reqwest::Url;

use super::SetlistError;

const SETLIST_URL_PREFIX: &str = "https://www.setlist.fm/setlist";

/// Extracts the setlist id from a setlist.fm URL.
///
/// The id is the part after the last `-` of the final path segment, e.g.
/// `53aa1325` for
/// `https://www.setlist.fm/setlist/blink182/2024/autodromo-de-interlagos-sao-paulo-brazil-53aa1325.html`.
pub fn extract_setlist_id(url: &str) -> Result<String, SetlistError> {
    let url = url.trim();
    if url.is_empty() {
        return Err(SetlistError::EmptyUrl);
    }

    if !url.starts_with(SETLIST_URL_PREFIX) {
        return Err(SetlistError::NotASetlistUrl(url.to_string()));
    }

    let parsed = Url::parse(url).map_err(|_| SetlistError::NotASetlistUrl(url.to_string()))?;
    let last_segment = parsed
        .path_segments()
        .and_then(|mut segments| segments.next_back())
        .unwrap_or_default();

    let id = last_segment
        .rsplit('-')
        .next()
        .unwrap_or_default()
        .trim_end_matches(".html");

    if id.is_empty() || !id.chars().all(|c| c.is_ascii_hexdigit()) {
        return Err(SetlistError::MissingId(url.to_string()));
    }

    Ok(id.to_string())
}
