use std::path::Path;

use once_cell::sync::Lazy;
use regex::Regex;

use super::{compile, extract_single_page, Pick, Provider, ProviderStrategy};
use crate::error::ExtractError;
use crate::fetch::Fetch;

/// The imagery page tags the current shot with a "Latest Image of the Day"
/// alt text; og:image covers layout drift.
static PATTERNS: Lazy<Vec<Regex>> = Lazy::new(|| {
    compile(&[
        r#"img alt="Latest Image of the Day[^"]*"[^>]*src="([^"]*)""#,
        r#"<meta property="og:image" content="([^"]+)""#,
    ])
});

pub struct Noaa;

impl ProviderStrategy for Noaa {
    fn fetch_image(
        &self,
        provider: &Provider,
        net: &dyn Fetch,
        dest: &Path,
    ) -> Result<String, ExtractError> {
        extract_single_page(provider, &PATTERNS, Pick::Last, net, dest)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fetch::fakes::FakeFetch;
    use tempfile::TempDir;

    const PAGE: &str = "http://www.nesdis.noaa.gov/content/imagery-and-data";

    fn provider() -> Provider {
        Provider {
            id: "noaa",
            url: PAGE,
            description: "NOAA Environmental Visualization Laboratory Picture of the Day",
        }
    }

    #[test]
    fn test_latest_image_alt_extracted() {
        let page = r#"<img alt="Latest Image of the Day - hurricane" class="hero" src="/sites/default/iotd.png">"#;
        let net = FakeFetch::new()
            .ok(PAGE, page)
            .ok("http://www.nesdis.noaa.gov/sites/default/iotd.png", b"noaa".to_vec());
        let dir = TempDir::new().unwrap();
        let dest = dir.path().join("noaa");

        let url = Noaa.fetch_image(&provider(), &net, &dest).unwrap();

        assert_eq!(url, "http://www.nesdis.noaa.gov/sites/default/iotd.png");
        assert_eq!(std::fs::read(&dest).unwrap(), b"noaa");
    }

    #[test]
    fn test_og_image_fallback() {
        let page = r#"<meta property="og:image" content="/share/preview.jpg">"#;
        let net = FakeFetch::new()
            .ok(PAGE, page)
            .ok("http://www.nesdis.noaa.gov/share/preview.jpg", b"x".to_vec());
        let dir = TempDir::new().unwrap();

        let url = Noaa
            .fetch_image(&provider(), &net, &dir.path().join("noaa"))
            .unwrap();

        assert_eq!(url, "http://www.nesdis.noaa.gov/share/preview.jpg");
    }

    #[test]
    fn test_unrelated_images_do_not_match() {
        let page = r#"<img alt="site logo" src="/logo.png">"#;
        let net = FakeFetch::new().ok(PAGE, page);
        let dir = TempDir::new().unwrap();

        let err = Noaa
            .fetch_image(&provider(), &net, &dir.path().join("noaa"))
            .unwrap_err();

        assert!(matches!(err, ExtractError::NoMatch { .. }));
    }
}
