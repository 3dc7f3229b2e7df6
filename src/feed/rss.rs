//! RSS 2.0 rendering of the current items
//!
//! Items are rendered in the order given; callers pass the store's feed order
//! (newest synthetic timestamp first), which reproduces the listing rank.

use crate::config::FeedConfig;
use crate::model::Record;
use std::io::Write;

/// Writes the RSS document for `records` to `out`
pub fn write_rss<W: Write>(
    channel: &FeedConfig,
    records: &[Record],
    out: &mut W,
) -> std::io::Result<()> {
    let rss = format_rss(channel, records);
    out.write_all(rss.as_bytes())?;
    out.flush()
}

/// Formats `records` as an RSS 2.0 document
pub fn format_rss(channel: &FeedConfig, records: &[Record]) -> String {
    let mut xml = String::new();

    xml.push_str("<?xml version=\"1.0\" encoding=\"UTF-8\"?>\n");
    xml.push_str("<rss version=\"2.0\">\n<channel>\n");
    xml.push_str(&format!("<title>{}</title>\n", escape_xml(&channel.title)));
    xml.push_str(&format!("<link>{}</link>\n", escape_xml(&channel.link)));
    xml.push_str(&format!(
        "<description>{}</description>\n",
        escape_xml(&channel.description)
    ));

    for record in records {
        xml.push_str("<item>\n");
        xml.push_str(&format!("<title>{}</title>\n", escape_xml(&record.title)));
        xml.push_str(&format!("<link>{}</link>\n", escape_xml(&record.link)));
        xml.push_str(&format!(
            "<guid isPermaLink=\"false\">{}</guid>\n",
            escape_xml(&record.identity)
        ));
        xml.push_str(&format!(
            "<pubDate>{}</pubDate>\n",
            record.created_at.to_rfc2822()
        ));
        xml.push_str(&format!(
            "<description>{}</description>\n",
            escape_xml(&item_description(record))
        ));
        xml.push_str("</item>\n");
    }

    xml.push_str("</channel>\n</rss>\n");
    xml
}

/// HTML body shown for one item
fn item_description(record: &Record) -> String {
    let mut html = format!(
        "<img src=\"{}\"/><p>{}<p>Rating: {}<p>Price: {}",
        escape_xml(&record.image),
        escape_xml(&record.byline),
        escape_xml(&record.review),
        escape_xml(&record.price)
    );
    if !record.synopsis.is_empty() {
        html.push_str(&format!("<p>{}", escape_xml(&record.synopsis)));
    }
    html
}

/// Escapes the five XML special characters
pub fn escape_xml(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&apos;"),
            _ => escaped.push(c),
        }
    }
    escaped
}
