use std::path::Path;

use chrono::{Local, NaiveDate};

use super::{fetch_page, Provider, ProviderStrategy};
use crate::daywindow::{walk_days, DayProbe, WINDOW_DAYS};
use crate::error::ExtractError;
use crate::fetch::Fetch;

/// Key material is not baked into the binary; the same small `KEY=value`
/// config the KDE applet reads is fetched at run time.
const KEY_URL: &str = "https://autoconfig.kde.org/potd/flickr.conf";

/// Image URL fields by declared size, largest first: original, 2048px,
/// 1600px.
const SIZE_FIELDS: [&str; 3] = ["url_o", "url_k", "url_h"];

pub struct Flickr;

/// What a single day's interestingness payload amounts to.
enum DayOutcome {
    /// The API answered with an explicit error status.
    Error(String),
    /// Candidate image URLs in field-priority order (possibly none).
    Candidates(Vec<String>),
}

fn parse_api_key(text: &str) -> Option<String> {
    text.lines().find_map(|line| {
        let (key, value) = line.split_once('=')?;
        (key.trim() == "API_KEY" && !value.trim().is_empty()).then(|| value.trim().to_string())
    })
}

fn day_query_url(base: &str, api_key: &str, date: NaiveDate) -> String {
    format!(
        "{base}?api_key={api_key}\
         &method=flickr.interestingness.getList\
         &date={}\
         &extras=url_o,url_k,url_h\
         &page=1&per_page=1\
         &format=json&nojsoncallback=1",
        date.format("%Y-%m-%d")
    )
}

fn parse_day(payload: &str) -> DayOutcome {
    let value: serde_json::Value = match serde_json::from_str(payload) {
        Ok(v) => v,
        Err(err) => return DayOutcome::Error(format!("unparseable payload: {err}")),
    };

    if value.get("stat").and_then(|s| s.as_str()) == Some("fail") {
        let message = value
            .get("message")
            .and_then(|m| m.as_str())
            .unwrap_or("unknown API error");
        return DayOutcome::Error(message.to_string());
    }

    let mut candidates = Vec::new();
    if let Some(photos) = value
        .pointer("/photos/photo")
        .and_then(|p| p.as_array())
    {
        for photo in photos {
            for field in SIZE_FIELDS {
                if let Some(url) = photo.get(field).and_then(|u| u.as_str()) {
                    if !url.is_empty() {
                        candidates.push(url.to_string());
                    }
                }
            }
        }
    }
    DayOutcome::Candidates(candidates)
}

impl ProviderStrategy for Flickr {
    fn fetch_image(
        &self,
        provider: &Provider,
        net: &dyn Fetch,
        dest: &Path,
    ) -> Result<String, ExtractError> {
        let key_text = fetch_page(provider, KEY_URL, net)?;
        let api_key = parse_api_key(&key_text).ok_or_else(|| ExtractError::Api {
            provider: provider.id.to_string(),
            message: format!("no API_KEY entry at {KEY_URL}"),
        })?;

        let today = Local::now().date_naive();
        let start = today.pred_opt().unwrap_or(today);

        walk_days(start, WINDOW_DAYS, |date| {
            let query_url = day_query_url(provider.url, &api_key, date);
            let outcome = net.fetch(&query_url);
            if !outcome.is_success() {
                log::warn!("can't fetch page for {}:{}", provider.id, query_url);
                return DayProbe::Skip;
            }
            match parse_day(&outcome.text()) {
                DayOutcome::Error(message) => {
                    log::warn!("{}: API error for {date}: {message}", provider.id);
                    DayProbe::Skip
                }
                DayOutcome::Candidates(candidates) => {
                    if candidates.is_empty() {
                        log::debug!("{}: no entry for {date}", provider.id);
                        return DayProbe::Skip;
                    }
                    for candidate in candidates {
                        match net.download(&candidate, dest) {
                            Ok(()) => return DayProbe::Found(candidate),
                            Err(err) => log::warn!("{}: {err}", provider.id),
                        }
                    }
                    DayProbe::Skip
                }
            }
        })
    }
}
