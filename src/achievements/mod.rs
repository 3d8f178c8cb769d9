use lazy_static::lazy_static;
use scraper::{Html, Selector};

use crate::errors::backend_response_error;
use crate::Error;

use self::types::AchievementTag;

pub mod cache;
pub mod types;

lazy_static! {
    static ref UNLOCKED_SELECTOR: Selector =
        Selector::parse("div.achievement:not(.incomplete)").expect("static selector");
    static ref NAME_SELECTOR: Selector = Selector::parse("h2").expect("static selector");
}

/// Completed achievement entries of a profile page, in document order
///
/// A page without an achievement list yields nothing.
pub fn parse_unlocked(document: &str) -> Vec<AchievementTag> {
    let html = Html::parse_document(document);
    html.select(&UNLOCKED_SELECTOR)
        .map(|entry| AchievementTag {
            heading: entry
                .select(&NAME_SELECTOR)
                .next()
                .map(|heading| heading.text().collect()),
        })
        .collect()
}

pub fn extract_name(tag: &AchievementTag) -> Result<String, Error> {
    let heading = tag
        .heading
        .as_deref()
        .ok_or_else(|| backend_response_error("Cannot find achievement name tag"))?;
    let name = heading.trim();
    if name.is_empty() {
        return Err(backend_response_error("Failed to parse achievement name"));
    }
    Ok(name.to_string())
}

/// Names of every tag, failing on the first malformed one
pub fn extract_names(tags: &[AchievementTag]) -> Result<Vec<String>, Error> {
    tags.iter().map(extract_name).collect()
}
