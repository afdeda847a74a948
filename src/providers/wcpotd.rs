use std::path::Path;

use once_cell::sync::Lazy;
use regex::Regex;

use super::{
    compile, extract_from_page, fetch_page, find_candidate, resolve_candidate, Pick, Provider,
    ProviderStrategy,
};
use crate::error::ExtractError;
use crate::fetch::Fetch;

/// Templated parse call expanding the {{Potd}} wikitext; the answer embeds
/// the day's index page link as a JSON-escaped anchor.
const API_QUERY: &str = "?action=parse&text={{Potd}}&contentmodel=wikitext&prop=text&format=json";

static INDEX_PATTERNS: Lazy<Vec<Regex>> =
    Lazy::new(|| compile(&[r#"Commons:Picture of the day.*?href=\\"([^"\\]*)\\""#]));

/// On the resolved page the original asset hangs off the fullImageLink
/// anchor.
static IMAGE_PATTERNS: Lazy<Vec<Regex>> =
    Lazy::new(|| compile(&[r#"fullImageLink.*?href="([^"]*)""#]));

pub struct Wcpotd;

impl ProviderStrategy for Wcpotd {
    fn fetch_image(
        &self,
        provider: &Provider,
        net: &dyn Fetch,
        dest: &Path,
    ) -> Result<String, ExtractError> {
        let api_url = format!("{}{}", provider.url, API_QUERY);
        let payload = fetch_page(provider, &api_url, net)?;
        let index_link = match find_candidate(&INDEX_PATTERNS, &payload, Pick::Last) {
            Some(l) => l,
            None => {
                log::warn!("can't parse image for {}:{}", provider.id, api_url);
                return Err(ExtractError::NoMatch {
                    provider: provider.id.to_string(),
                    url: api_url,
                });
            }
        };
        let page_url = resolve_candidate(provider.url, index_link).ok_or_else(|| {
            ExtractError::AmbiguousButUnresolved {
                provider: provider.id.to_string(),
                base: provider.url.to_string(),
            }
        })?;
        extract_from_page(provider, &page_url, &IMAGE_PATTERNS, Pick::Last, net, dest)
    }
}
