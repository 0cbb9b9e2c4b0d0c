//! Feed parsing and HTML stripping.
//!
//! Handles RSS 2.0 `<item>`s and Atom `<entry>`s. Atom links come from the
//! `href` attribute; Atom `summary`/`published` stand in for RSS
//! `description`/`pubDate`.

use quick_xml::events::{BytesStart, Event};
use quick_xml::Reader;

use crate::error::SignalError;

/// One entry of a news feed, with HTML stripped from the description.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FeedItem {
    pub title: String,
    pub link: String,
    pub description: String,
    /// Raw publication date as written in the feed (RFC 2822 for RSS).
    pub pub_date: Option<String>,
}

#[derive(Clone, Copy, PartialEq, Eq)]
enum Field {
    Title,
    Link,
    Description,
    PubDate,
    /// Atom `updated`: a fallback when no `published` date is present.
    Updated,
    Other,
}

impl Field {
    fn from_tag(name: &str) -> Self {
        match name {
            "title" => Field::Title,
            "link" => Field::Link,
            "description" | "summary" => Field::Description,
            "pubDate" | "published" => Field::PubDate,
            "updated" => Field::Updated,
            _ => Field::Other,
        }
    }
}

/// Parse a feed body into at most `max_items` items, in document order.
///
/// Items without a title are dropped.
///
/// # Errors
///
/// Returns [`SignalError::Xml`] if the XML is malformed.
pub fn parse_feed(xml: &str, max_items: usize) -> Result<Vec<FeedItem>, SignalError> {
    let mut reader = Reader::from_str(xml);
    reader.config_mut().trim_text(true);

    let mut items = Vec::new();
    let mut current = FeedItem::default();
    let mut in_item = false;
    let mut field = Field::Other;

    loop {
        match reader.read_event() {
            Ok(Event::Start(e)) => {
                let name = tag_name(&e);
                if name == "item" || name == "entry" {
                    in_item = true;
                    current = FeedItem::default();
                    field = Field::Other;
                } else if in_item {
                    if name == "link" {
                        take_href(&e, &mut current);
                    }
                    // Nested markup inside a description keeps accumulating.
                    if field != Field::Description {
                        field = Field::from_tag(&name);
                    }
                }
            }
            Ok(Event::Empty(e)) => {
                if in_item && tag_name(&e) == "link" {
                    take_href(&e, &mut current);
                }
            }
            Ok(Event::End(e)) => {
                let name = std::str::from_utf8(e.name().as_ref())
                    .unwrap_or("")
                    .to_string();
                if (name == "item" || name == "entry") && in_item {
                    in_item = false;
                    if !current.title.is_empty() {
                        current.description = strip_html(&current.description);
                        items.push(std::mem::take(&mut current));
                        if items.len() >= max_items {
                            break;
                        }
                    }
                } else if Field::from_tag(&name) == field {
                    field = Field::Other;
                }
            }
            Ok(Event::Text(e)) => {
                if in_item {
                    let text = e.unescape().unwrap_or_default().into_owned();
                    append(&mut current, field, &text);
                }
            }
            Ok(Event::CData(e)) => {
                if in_item {
                    let text = String::from_utf8_lossy(e.as_ref()).into_owned();
                    append(&mut current, field, &text);
                }
            }
            Ok(Event::Eof) => break,
            Err(e) => return Err(SignalError::Xml(e)),
            _ => {}
        }
    }

    Ok(items)
}

fn tag_name(e: &BytesStart<'_>) -> String {
    std::str::from_utf8(e.name().as_ref())
        .unwrap_or("")
        .to_string()
}

fn take_href(e: &BytesStart<'_>, item: &mut FeedItem) {
    if !item.link.is_empty() {
        return;
    }
    if let Some(href) = e
        .attributes()
        .flatten()
        .find(|attr| attr.key.as_ref() == b"href")
    {
        item.link = String::from_utf8_lossy(&href.value).into_owned();
    }
}

fn append(item: &mut FeedItem, field: Field, text: &str) {
    match field {
        Field::Title => item.title.push_str(text),
        Field::Link => item.link.push_str(text.trim()),
        Field::Description => {
            if !item.description.is_empty() {
                item.description.push(' ');
            }
            item.description.push_str(text);
        }
        Field::PubDate => item.pub_date = Some(text.trim().to_string()),
        Field::Updated => {
            if item.pub_date.is_none() {
                item.pub_date = Some(text.trim().to_string());
            }
        }
        Field::Other => {}
    }
}

/// Strip HTML tags from a string and normalize whitespace.
pub(crate) fn strip_html(html: &str) -> String {
    let mut out = String::with_capacity(html.len());
    let mut in_tag = false;
    for ch in html.chars() {
        match ch {
            '<' => in_tag = true,
            '>' => {
                in_tag = false;
                out.push(' ');
            }
            _ if !in_tag => out.push(ch),
            _ => {}
        }
    }
    out.split_whitespace().collect::<Vec<_>>().join(" ")
}
