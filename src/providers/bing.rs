use std::path::Path;

use once_cell::sync::Lazy;
use regex::Regex;

use super::{compile, extract_single_page, Pick, Provider, ProviderStrategy};
use crate::error::ExtractError;
use crate::fetch::Fetch;

/// The HPImageArchive endpoint answers JSON-ish text; the image sits in a
/// field literally named "url".
static PATTERNS: Lazy<Vec<Regex>> = Lazy::new(|| compile(&[r#""url":"([^"]+)""#]));

pub struct Bing;

impl ProviderStrategy for Bing {
    fn fetch_image(
        &self,
        provider: &Provider,
        net: &dyn Fetch,
        dest: &Path,
    ) -> Result<String, ExtractError> {
        extract_single_page(provider, &PATTERNS, Pick::Last, net, dest)
    }
}
