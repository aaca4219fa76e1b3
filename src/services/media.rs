/*
 * Responsibility
 * - turn stored media paths (posts.image) into absolute URLs for responses
 * - serving the files is someone else's job
 */
use url::Url;

#[derive(Clone, Debug)]
pub struct MediaUrls {
    base: Url,
}

impl MediaUrls {
    pub fn new(base: &str) -> Result<Self, url::ParseError> {
        // Url::join drops the last segment unless the base ends with '/'
        let base = if base.ends_with('/') {
            Url::parse(base)?
        } else {
            Url::parse(&format!("{base}/"))?
        };
        Ok(Self { base })
    }

    /// Absolute paths stored by an external uploader are returned unchanged.
    pub fn url_for(&self, path: &str) -> Option<String> {
        if path.is_empty() {
            return None;
        }
        if let Ok(absolute) = Url::parse(path) {
            return Some(absolute.to_string());
        }
        match self.base.join(path.trim_start_matches('/')) {
            Ok(url) => Some(url.to_string()),
            Err(err) => {
                tracing::warn!(error = %err, path, "cannot build media url");
                None
            }
        }
    }
}
