//! Link harvesting from directory listings.
//!
//! The catalog root serves an HTML index of its documents. Harvesting walks
//! the tag events of that page and keeps the anchor targets that look like
//! colormap documents.

use quick_xml::events::Event;
use quick_xml::Reader;
use tracing::debug;

use crate::document::collect_attributes;

/// One tag event of a markup document
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MarkupEvent {
    Start {
        name: String,
        attributes: Vec<(String, String)>,
    },
    End {
        name: String,
    },
}

/// Tokenize a listing page into tag events.
///
/// HTML is rarely well-formed XML, so the reader runs leniently: end tags
/// need not match, attribute values may be unquoted and a self-closing tag
/// produces a start and an end event. Tokenizing stops at the first error
/// and keeps what was read so far.
pub fn tokenize_markup(markup: &str) -> Vec<MarkupEvent> {
    let mut reader = Reader::from_str(markup);
    {
        let config = reader.config_mut();
        config.check_end_names = false;
        config.allow_unmatched_ends = true;
        config.check_comments = false;
    }

    let mut events = Vec::new();
    loop {
        match reader.read_event() {
            Ok(Event::Start(tag)) => events.push(MarkupEvent::Start {
                name: String::from_utf8_lossy(tag.name().as_ref()).to_ascii_lowercase(),
                attributes: collect_attributes(&tag, true),
            }),
            Ok(Event::Empty(tag)) => {
                let name = String::from_utf8_lossy(tag.name().as_ref()).to_ascii_lowercase();
                events.push(MarkupEvent::Start {
                    name: name.clone(),
                    attributes: collect_attributes(&tag, true),
                });
                events.push(MarkupEvent::End { name });
            }
            Ok(Event::End(tag)) => events.push(MarkupEvent::End {
                name: String::from_utf8_lossy(tag.name().as_ref()).to_ascii_lowercase(),
            }),
            Ok(Event::Eof) => break,
            Ok(_) => {}
            Err(e) => {
                debug!(
                    position = reader.buffer_position(),
                    error = %e,
                    "Stopped tokenizing malformed markup"
                );
                break;
            }
        }
    }
    events
}

/// Collect the `href` targets of anchors that end with `suffix`, in
/// document order and including duplicates.
pub fn harvest_links<'a, I>(events: I, suffix: &str) -> Vec<String>
where
    I: IntoIterator<Item = &'a MarkupEvent>,
{
    let mut pending: Option<String> = None;
    let mut links = Vec::new();

    for event in events {
        match event {
            MarkupEvent::Start { name, attributes } => {
                pending = None;
                if name.eq_ignore_ascii_case("a") {
                    pending = attributes
                        .iter()
                        .find(|(key, _)| key.eq_ignore_ascii_case("href"))
                        .map(|(_, value)| value.clone());
                }
            }
            MarkupEvent::End { .. } => {
                if let Some(href) = pending.take() {
                    if href.ends_with(suffix) {
                        links.push(href);
                    }
                }
            }
        }
    }

    links
}

/// Tokenize a listing page and harvest its document links
pub fn harvest_listing(markup: &str, suffix: &str) -> Vec<String> {
    let events = tokenize_markup(markup);
    let links = harvest_links(&events, suffix);
    debug!(events = events.len(), links = links.len(), "Harvested listing");
    links
}
