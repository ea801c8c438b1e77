use std::borrow::Cow;

use scraper::{ElementRef, Html};

use crate::constants::LOAD_ERROR_PREFIX;

/// A completed HTTP exchange for one slide, successful or not.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoadResponse {
    pub status: u16,
    pub status_text: String,
    pub body: String,
}

impl LoadResponse {
    pub fn is_ok(&self) -> bool {
        self.status == 200
    }
}

/// Fetch target for a slide: the base URL with the decimal index appended.
pub fn slide_url(base: &str, slide: u64) -> String {
    format!("{base}{slide}")
}

/// Content to put on the surface for a response.
///
/// Anything but a 200 is a load failure; in debug mode the raw error page is
/// shown anyway, otherwise a short message with the status text replaces it.
pub fn display_content(response: &LoadResponse, debug: bool) -> Cow<'_, str> {
    if response.is_ok() || debug {
        Cow::Borrowed(&response.body)
    } else {
        Cow::Owned(format!("{LOAD_ERROR_PREFIX}{}", response.status_text))
    }
}

const BLOCK_TAGS: &[&str] = &[
    "br", "p", "div", "tr", "li", "table", "h1", "h2", "h3", "h4", "h5", "h6",
];
const CELL_TAGS: &[&str] = &["td", "th"];
const HIDDEN_TAGS: &[&str] = &["script", "style", "template"];

/// Flattens an HTML fragment into the lines of text a plain renderer shows.
pub fn to_plain_text(html: &str) -> Vec<String> {
    let fragment = Html::parse_fragment(html);
    let mut text = String::with_capacity(html.len());
    collect_text(fragment.root_element(), &mut text);

    text.lines()
        .map(|line| line.split_whitespace().collect::<Vec<_>>().join(" "))
        .filter(|line| !line.is_empty())
        .collect()
}

// Source line breaks are plain whitespace; only elements start new lines.
fn collect_text(element: ElementRef<'_>, text: &mut String) {
    let name = element.value().name();
    if HIDDEN_TAGS.contains(&name) {
        return;
    }
    let block = BLOCK_TAGS.contains(&name);
    if block {
        text.push('\n');
    }

    for child in element.children() {
        if let Some(child) = ElementRef::wrap(child) {
            collect_text(child, text);
        } else if let Some(segment) = child.value().as_text() {
            text.extend(segment.chars().map(|c| if c == '\n' || c == '\r' { ' ' } else { c }));
        }
    }

    if block {
        text.push('\n');
    } else if CELL_TAGS.contains(&name) {
        text.push(' ');
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn response(status: u16, status_text: &str, body: &str) -> LoadResponse {
        LoadResponse {
            status,
            status_text: status_text.to_string(),
            body: body.to_string(),
        }
    }

    #[test]
    fn slide_url_appends_decimal_index() {
        assert_eq!(slide_url("/slides/", 0), "/slides/0");
        assert_eq!(slide_url("/slides/", 12), "/slides/12");
        assert_eq!(slide_url("http://host/slide?n=", 7), "http://host/slide?n=7");
    }

    #[test]
    fn success_shows_body_verbatim() {
        let ok = response(200, "OK", "<p>Hello</p>");
        assert_eq!(display_content(&ok, false), "<p>Hello</p>");
        assert_eq!(display_content(&ok, true), "<p>Hello</p>");
    }

    #[test]
    fn failure_shows_status_text_unless_debugging() {
        let missing = response(404, "Not Found", "<h1>404</h1>");
        assert_eq!(display_content(&missing, false), "Load error: Not Found");
        assert_eq!(display_content(&missing, true), "<h1>404</h1>");
    }

    #[test]
    fn failure_without_reason_phrase() {
        let odd = response(599, "", "");
        assert_eq!(display_content(&odd, false), "Load error: ");
    }

    #[test]
    fn plain_text_keeps_table_rows_apart() {
        let html = r#"
            <div id="titlepane"><table><tr>
                <td class="logo"><img src="logo.png" /></td>
                <td class="title">Main Hall</td>
                <td class="clock">10:15</td>
            </tr></table></div>
            <div id="contentpane"><table>
                <tr><td class="desc"><div class="cell">Opening &amp; welcome</div></td><td class="time">Now</td></tr>
                <tr><td class="desc"><div class="cell">Keynote</div></td><td class="time">11:00</td></tr>
            </table></div>
        "#;
        assert_eq!(
            to_plain_text(html),
            vec!["Main Hall 10:15", "Opening & welcome", "Now", "Keynote", "11:00"]
        );
    }

    #[test]
    fn plain_text_skips_scripts_and_handles_stray_brackets() {
        assert_eq!(
            to_plain_text("<p>a &lt; b</p><script>var x = 1 < 2;</script><p>tail <"),
            vec!["a < b", "tail <"]
        );
        assert_eq!(to_plain_text("Load error: Not Found"), vec!["Load error: Not Found"]);
        assert!(to_plain_text("").is_empty());
    }

    #[test]
    fn plain_text_leaves_out_comments() {
        assert_eq!(
            to_plain_text("<p>Hall</p><!-- <p>draft: do not show</p> -->"),
            vec!["Hall"]
        );
    }

    #[test]
    fn plain_text_decodes_named_and_numeric_entities() {
        assert_eq!(
            to_plain_text("<p>Gr&uuml;&szlig;e &eacute;t&eacute; &ndash; 10:00</p>"),
            vec!["Grüße été – 10:00"]
        );
        assert_eq!(
            to_plain_text("<p>Caf&#233; &#x2013; Men&#252;</p>"),
            vec!["Café – Menü"]
        );
        assert_eq!(to_plain_text("<p>one&nbsp;&nbsp;two</p>"), vec!["one two"]);
    }

    #[test]
    fn plain_text_ignores_brackets_inside_attributes() {
        assert_eq!(to_plain_text("<p><img alt=\"a>b\">Room</p>"), vec!["Room"]);
    }
}
