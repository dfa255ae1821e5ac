//! Response parsing for both lookup stages.
//!
//! Kept free of I/O so the parsers can be tested against captured payloads.
//! The search stage only needs the redirected URL, so a pattern is enough
//! there. The rating document is read as XML: entities and CDATA are
//! decoded, and elements inside comments are ignored.

use std::sync::LazyLock;

use listings::{FilmId, RatingInfo};
use quick_xml::events::{BytesStart, Event};
use quick_xml::reader::Reader;
use regex::Regex;

use crate::error::LookupError;

const RATING_ELEMENT: &[u8] = b"kp_rating";
const VOTES_ATTRIBUTE: &[u8] = b"num_vote";

static FILM_ID_IN_URL: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"/film/(\d+)").expect("film id pattern is valid"));

/// Pull the identifier out of the URL the search request ended up at.
///
/// The search endpoint redirects straight to the film page
/// (`.../film/<digits>/`) when it finds a match.
pub fn extract_film_id(url: &str) -> Option<FilmId> {
    FILM_ID_IN_URL
        .captures(url)
        .and_then(|caps| caps.get(1))
        .and_then(|m| FilmId::parse(m.as_str()))
}

/// Parse a rating document.
///
/// Only the first `kp_rating` element is read. A missing or empty element
/// yields `RatingInfo { rating: None, votes: None }`; what to do with that
/// is the caller's policy. Text that is present but not a finite number,
/// or a document that is not well-formed XML, is an error.
pub fn parse_rating_document(body: &str) -> Result<RatingInfo, LookupError> {
    let mut reader = Reader::from_str(body);
    reader.config_mut().trim_text(true);

    let mut votes = None;
    let mut text: Option<String> = None;

    loop {
        let event = reader
            .read_event()
            .map_err(|e| LookupError::MalformedRating(format!("invalid rating document: {}", e)))?;

        match event {
            Event::Start(element) if element.name().as_ref() == RATING_ELEMENT => {
                votes = vote_count(&element);
                text = Some(String::new());
            }
            Event::Empty(element) if element.name().as_ref() == RATING_ELEMENT => {
                return Ok(RatingInfo::default());
            }
            Event::Text(chunk) => {
                if let Some(text) = text.as_mut() {
                    let decoded = chunk.unescape().map_err(|e| {
                        LookupError::MalformedRating(format!("invalid rating text: {}", e))
                    })?;
                    text.push_str(&decoded);
                }
            }
            Event::CData(chunk) => {
                if let Some(text) = text.as_mut() {
                    text.push_str(&String::from_utf8_lossy(&chunk));
                }
            }
            Event::End(element) if element.name().as_ref() == RATING_ELEMENT => break,
            Event::Eof => return Ok(RatingInfo::default()),
            _ => {}
        }
    }

    let text = text.unwrap_or_default();
    let text = text.trim();
    if text.is_empty() {
        return Ok(RatingInfo::default());
    }

    let rating: f32 = text
        .parse()
        .map_err(|_| LookupError::MalformedRating(text.to_string()))?;
    if !rating.is_finite() {
        return Err(LookupError::MalformedRating(text.to_string()));
    }

    Ok(RatingInfo {
        rating: Some(rating),
        votes,
    })
}

fn vote_count(element: &BytesStart<'_>) -> Option<u32> {
    element
        .attributes()
        .flatten()
        .find(|attr| attr.key.as_ref() == VOTES_ATTRIBUTE)
        .and_then(|attr| attr.unescape_value().ok())
        .and_then(|value| value.trim().parse().ok())
}
