use std::path::Path;

use once_cell::sync::Lazy;
use regex::Regex;

use super::{compile, extract_single_page, Pick, Provider, ProviderStrategy};
use crate::error::ExtractError;
use crate::fetch::Fetch;

/// The day's anchor links the full-size image under image/; older page
/// layouts only carry the inline <img>, kept as a fallback.
static PATTERNS: Lazy<Vec<Regex>> = Lazy::new(|| {
    compile(&[
        r#"<a href="(image/[^"]+)""#,
        r#"img src="([^"]+)""#,
    ])
});

pub struct Apod;

impl ProviderStrategy for Apod {
    fn fetch_image(
        &self,
        provider: &Provider,
        net: &dyn Fetch,
        dest: &Path,
    ) -> Result<String, ExtractError> {
        extract_single_page(provider, &PATTERNS, Pick::Last, net, dest)
    }
}
