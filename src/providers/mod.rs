pub mod apod;
pub mod bing;
pub mod epod;
pub mod flickr;
pub mod natgeo;
pub mod noaa;
pub mod wcpotd;

use std::path::Path;

use regex::{Regex, RegexBuilder};
use url::Url;

use crate::error::ExtractError;
use crate::fetch::Fetch;

/// A named external photo source. Registry entries are never mutated;
/// strategies that need a derived API URL build a fresh string per call.
#[derive(Debug, Clone, Copy)]
pub struct Provider {
    pub id: &'static str,
    pub url: &'static str,
    pub description: &'static str,
}

/// One extraction strategy per provider.
pub trait ProviderStrategy: Send + Sync {
    /// Resolve today's image for `provider` and download it into `dest`.
    /// Returns the final image URL; `dest` only exists on success. A
    /// matched but undownloadable URL is a failure, not a partial success.
    fn fetch_image(
        &self,
        provider: &Provider,
        net: &dyn Fetch,
        dest: &Path,
    ) -> Result<String, ExtractError>;
}

pub struct Entry {
    pub provider: Provider,
    pub strategy: Box<dyn ProviderStrategy>,
}

/// Fixed mapping from provider id to strategy, built once at startup.
/// Adding a provider means one `add` line plus one strategy module.
pub struct Registry {
    entries: Vec<Entry>,
}

impl Registry {
    pub fn new() -> Self {
        let mut registry = Self {
            entries: Vec::new(),
        };

        registry.add(
            Provider {
                id: "apod",
                url: "https://apod.nasa.gov/apod",
                description: "Astronomy Picture of the Day",
            },
            Box::new(apod::Apod),
        );
        registry.add(
            Provider {
                id: "bing",
                url: "https://www.bing.com/HPImageArchive.aspx?format=js&idx=0&n=1",
                description: "Bing's Picture of the Day",
            },
            Box::new(bing::Bing),
        );
        registry.add(
            Provider {
                id: "epod",
                url: "https://epod.usra.edu/",
                description: "Earth Science Picture of the Day",
            },
            Box::new(epod::Epod),
        );
        registry.add(
            Provider {
                id: "flickr",
                url: "https://api.flickr.com/services/rest/",
                description: "Flickr Picture of the Day",
            },
            Box::new(flickr::Flickr),
        );
        registry.add(
            Provider {
                id: "natgeo",
                url: "http://www.nationalgeographic.com/photography/photo-of-the-day/",
                description: "National Geographic",
            },
            Box::new(natgeo::NatGeo),
        );
        registry.add(
            Provider {
                id: "noaa",
                url: "http://www.nesdis.noaa.gov/content/imagery-and-data",
                description: "NOAA Environmental Visualization Laboratory Picture of the Day",
            },
            Box::new(noaa::Noaa),
        );
        registry.add(
            Provider {
                id: "wcpotd",
                url: "https://commons.wikimedia.org/w/api.php",
                description: "Wikimedia Picture of the Day",
            },
            Box::new(wcpotd::Wcpotd),
        );

        registry
    }

    fn add(&mut self, provider: Provider, strategy: Box<dyn ProviderStrategy>) {
        self.entries.push(Entry { provider, strategy });
    }

    pub fn find(&self, id: &str) -> Option<&Entry> {
        self.entries.iter().find(|e| e.provider.id == id)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Entry> {
        self.entries.iter()
    }
}

impl Default for Registry {
    fn default() -> Self {
        Self::new()
    }
}

/// Tie-break when a pattern matches more than once. The freshest or
/// largest image tends to appear last in provider markup, so `Last` is
/// the default; providers that list newest-first are flagged `First`.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Pick {
    Last,
    First,
}

/// Compile a pattern list, case-insensitive.
pub fn compile(patterns: &[&str]) -> Vec<Regex> {
    patterns
        .iter()
        .map(|p| {
            RegexBuilder::new(p)
                .case_insensitive(true)
                .build()
                .expect("static pattern")
        })
        .collect()
}

/// Try `patterns` in order and stop at the first one yielding at least one
/// match; later patterns are fallbacks for page-layout drift. Among that
/// pattern's matches, `pick` selects the canonical occurrence (capture 1).
pub fn find_candidate<'t>(patterns: &[Regex], text: &'t str, pick: Pick) -> Option<&'t str> {
    for re in patterns {
        let mut matches = re.captures_iter(text).filter_map(|c| c.get(1));
        let first = match matches.next() {
            Some(m) => m,
            None => continue,
        };
        let chosen = match pick {
            Pick::First => first,
            Pick::Last => matches.last().unwrap_or(first),
        };
        return Some(chosen.as_str());
    }
    None
}

/// Resolve `candidate` against the scheme+host of `base`. Absolute URLs
/// pass through; protocol-relative and path-relative forms are joined.
pub fn resolve_candidate(base: &str, candidate: &str) -> Option<String> {
    if candidate.starts_with("http://") || candidate.starts_with("https://") {
        return Some(candidate.to_string());
    }
    let mut root = Url::parse(base).ok()?;
    root.set_path("/");
    root.set_query(None);
    root.set_fragment(None);
    root.join(candidate).ok().map(|u| u.to_string())
}

/// Fetch a page for a provider, mapping any failure to `PageUnreachable`.
pub(crate) fn fetch_page(
    provider: &Provider,
    url: &str,
    net: &dyn Fetch,
) -> Result<String, ExtractError> {
    let outcome = net.fetch(url);
    if !outcome.is_success() {
        log::warn!("can't fetch page for {}:{}", provider.id, url);
        return Err(ExtractError::PageUnreachable {
            url: url.to_string(),
        });
    }
    Ok(outcome.text())
}

/// Shared shape for providers whose image sits behind one page fetch:
/// fetch `page_url`, run the ordered patterns, resolve, download.
pub(crate) fn extract_from_page(
    provider: &Provider,
    page_url: &str,
    patterns: &[Regex],
    pick: Pick,
    net: &dyn Fetch,
    dest: &Path,
) -> Result<String, ExtractError> {
    let page = fetch_page(provider, page_url, net)?;
    let candidate = match find_candidate(patterns, &page, pick) {
        Some(c) => c,
        None => {
            log::warn!("can't parse image for {}:{}", provider.id, page_url);
            return Err(ExtractError::NoMatch {
                provider: provider.id.to_string(),
                url: page_url.to_string(),
            });
        }
    };
    let image_url = resolve_candidate(provider.url, candidate).ok_or_else(|| {
        ExtractError::AmbiguousButUnresolved {
            provider: provider.id.to_string(),
            base: provider.url.to_string(),
        }
    })?;
    download_candidate(provider, &image_url, net, dest)?;
    Ok(image_url)
}

pub(crate) fn extract_single_page(
    provider: &Provider,
    patterns: &[Regex],
    pick: Pick,
    net: &dyn Fetch,
    dest: &Path,
) -> Result<String, ExtractError> {
    extract_from_page(provider, provider.url, patterns, pick, net, dest)
}

pub(crate) fn download_candidate(
    provider: &Provider,
    url: &str,
    net: &dyn Fetch,
    dest: &Path,
) -> Result<(), ExtractError> {
    net.download(url, dest).map_err(|err| {
        log::warn!("{}: {err}", provider.id);
        ExtractError::Download(err)
    })
}
