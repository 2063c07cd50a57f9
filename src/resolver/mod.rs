use std::fmt;

use url::Url;

/// Canonical YouTube video identifier: non-empty `[A-Za-z0-9_-]`, at most
/// 11 characters (the platform's bound; shorter ids are accepted as-is).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VideoId(String);

impl VideoId {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for VideoId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ResolveError {
    #[error("no YouTube video identifier found in '{0}'")]
    NoIdentifierFound(String),
}

/// Resolve a user-supplied video reference into a canonical [`VideoId`].
///
/// Accepts the long watch URL (`youtube.com/watch?v=<id>`), the short form
/// (`youtu.be/<id>`), shorts/embed/v paths, and a bare id.
/// Purely syntactic; never touches the network.
pub fn resolve(reference: &str) -> Result<VideoId, ResolveError> {
    let reference = reference.trim();

    if is_valid_id(reference) {
        return Ok(VideoId(reference.to_string()));
    }

    extract_from_url(reference)
        .map(VideoId)
        .ok_or_else(|| ResolveError::NoIdentifierFound(reference.to_string()))
}

fn extract_from_url(reference: &str) -> Option<String> {
    // Tolerate references pasted without a scheme.
    let with_scheme;
    let candidate = if reference.starts_with("http://") || reference.starts_with("https://") {
        reference
    } else {
        with_scheme = format!("https://{}", reference);
        &with_scheme
    };

    let url = Url::parse(candidate).ok()?;
    let host = url.host_str()?.to_ascii_lowercase();
    let host = host.strip_prefix("www.").unwrap_or(&host);

    if host == "youtu.be" {
        // youtu.be/<id>, trailing query (?t=5, ?si=...) handled by Url.
        let id = url.path_segments()?.next()?;
        return valid(id);
    }

    if host != "youtube.com" && !host.ends_with(".youtube.com") {
        return None;
    }

    // youtube.com/watch?v=<id>
    if url.path() == "/watch" {
        let (_, id) = url.query_pairs().find(|(k, _)| k == "v")?;
        return valid(&id);
    }

    // youtube.com/shorts/<id>, /embed/<id>, /v/<id>
    let mut segments = url.path_segments()?;
    let head = segments.next()?;
    if matches!(head, "shorts" | "embed" | "v") {
        return valid(segments.next()?);
    }

    None
}

fn valid(id: &str) -> Option<String> {
    if is_valid_id(id) {
        Some(id.to_string())
    } else {
        None
    }
}

fn is_valid_id(id: &str) -> bool {
    !id.is_empty()
        && id.len() <= 11
        && id
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_')
}
