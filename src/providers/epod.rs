use std::path::Path;

use once_cell::sync::Lazy;
use regex::Regex;

use super::{
    compile, extract_from_page, fetch_page, find_candidate, resolve_candidate, Pick, Provider,
    ProviderStrategy,
};
use crate::error::ExtractError;
use crate::fetch::Fetch;

/// Blog-style listing; the newest entry appears first, so this provider
/// is flagged for first-match semantics.
static ENTRY_PATTERNS: Lazy<Vec<Regex>> =
    Lazy::new(|| compile(&[r#"<a href="(https?://epod\.usra\.edu/blog/[^"]+\.html)""#]));

/// Inside the entry page the full-size asset is declared in embedded
/// JSON-LD metadata as the page's primary image.
static IMAGE_PATTERNS: Lazy<Vec<Regex>> =
    Lazy::new(|| compile(&[r#""@id":\s*"[^"]*#primaryimage"\s*,\s*"url":\s*"([^"]*)""#]));

pub struct Epod;

impl ProviderStrategy for Epod {
    fn fetch_image(
        &self,
        provider: &Provider,
        net: &dyn Fetch,
        dest: &Path,
    ) -> Result<String, ExtractError> {
        let listing = fetch_page(provider, provider.url, net)?;
        let entry = match find_candidate(&ENTRY_PATTERNS, &listing, Pick::First) {
            Some(e) => e,
            None => {
                log::warn!("can't parse image for {}:{}", provider.id, provider.url);
                return Err(ExtractError::NoMatch {
                    provider: provider.id.to_string(),
                    url: provider.url.to_string(),
                });
            }
        };
        let entry_url = resolve_candidate(provider.url, entry).ok_or_else(|| {
            ExtractError::AmbiguousButUnresolved {
                provider: provider.id.to_string(),
                base: provider.url.to_string(),
            }
        })?;
        extract_from_page(provider, &entry_url, &IMAGE_PATTERNS, Pick::Last, net, dest)
    }
}
