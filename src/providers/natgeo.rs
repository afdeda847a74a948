use std::path::Path;

use once_cell::sync::Lazy;
use regex::Regex;

use super::{compile, extract_single_page, Pick, Provider, ProviderStrategy};
use crate::error::ExtractError;
use crate::fetch::Fetch;

static PATTERNS: Lazy<Vec<Regex>> =
    Lazy::new(|| compile(&[r#"<meta property="og:image" content="([^"]+)""#]));

pub struct NatGeo;

impl ProviderStrategy for NatGeo {
    fn fetch_image(
        &self,
        provider: &Provider,
        net: &dyn Fetch,
        dest: &Path,
    ) -> Result<String, ExtractError> {
        extract_single_page(provider, &PATTERNS, Pick::Last, net, dest)
    }
}
