//! Converts simple HTML into WhatsApp text markup.
//!
//! `<b>`/`<strong>` become `*bold*`, `<i>`/`<em>` become `_italic_` and
//! `<s>`/`<strike>`/`<del>` become `~strike~`. Every other tag is dropped and only
//! its text is kept. Entities are decoded.
//!
//! ```rust
//! use whatsapp_webhook_rs::html;
//!
//! let text = html::from_html_with_links(
//!     r#"<p>Your order is <b>ready</b>. <a href="https://example.com/o/1">Track it</a></p>"#,
//! );
//! assert_eq!(
//!     text,
//!     "Your order is *ready*. Track it\n\nTrack it - https://example.com/o/1"
//! );
//! ```

use scraper::{ElementRef, Html};

/// An `<a href>` anchor found while converting.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Link {
    pub text: String,
    pub url: String,
}

/// Converts `html` into WhatsApp markup.
pub fn from_html(html: &str) -> String {
    from_html_collecting_links(html).0
}

/// Converts `html` and returns the anchors it contains, in document order.
pub fn from_html_collecting_links(html: &str) -> (String, Vec<Link>) {
    let fragment = Html::parse_fragment(html);
    let mut converter = Converter::default();
    converter.walk(fragment.root_element());
    (converter.out, converter.links)
}

/// Converts `html`, trims the result and appends one `text - url` line per anchor
/// after a blank line.
pub fn from_html_with_links(html: &str) -> String {
    let (text, links) = from_html_collecting_links(html);
    let mut result = text.trim().to_owned();
    if !links.is_empty() {
        result.push_str("\n\n");
        result.push_str(&format_links(&links));
    }
    result
}

/// Formats links as `text - url`, one per line.
pub fn format_links(links: &[Link]) -> String {
    links
        .iter()
        .map(|link| format!("{} - {}", link.text, link.url))
        .collect::<Vec<_>>()
        .join("\n")
}

#[derive(Default)]
struct Converter {
    out: String,
    links: Vec<Link>,
    current_link: Option<Link>,
}

impl Converter {
    fn walk(&mut self, element: ElementRef<'_>) {
        for child in element.children() {
            if let Some(text) = child.value().as_text() {
                self.out.push_str(text);
                if let Some(link) = &mut self.current_link {
                    link.text.push_str(text);
                }
            } else if let Some(child) = ElementRef::wrap(child) {
                self.element(child);
            }
        }
    }

    fn element(&mut self, element: ElementRef<'_>) {
        let name = element.value().name();

        if name == "a" {
            match element.value().attr("href") {
                Some(url) if self.current_link.is_none() => {
                    self.current_link = Some(Link {
                        text: String::new(),
                        url: url.to_owned(),
                    });
                    self.walk(element);
                    self.links.extend(self.current_link.take());
                }
                _ => self.walk(element),
            }
            return;
        }

        match markup(name) {
            Some(mark) => {
                self.out.push_str(mark);
                self.walk(element);
                self.out.push_str(mark);
            }
            None => self.walk(element),
        }
    }
}

fn markup(tag: &str) -> Option<&'static str> {
    match tag {
        "b" | "strong" => Some("*"),
        "i" | "em" => Some("_"),
        "s" | "strike" | "del" => Some("~"),
        _ => None,
    }
}
