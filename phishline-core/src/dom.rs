// Page-content scorers. HTML is parsed once into typed tags; every scorer
// works on that parsed form plus the cleaned host.

use crate::error::{Analysis, AnalysisError};
use crate::feature::Score;
use regex::RegexSet;
use scraper::{ElementRef, Html, Selector};
use std::collections::HashMap;
use std::sync::LazyLock;

const TRACKED_TAGS: &str = "a, link, img, script, iframe, embed, object, meta, form";
const RESOURCE_TAGS: &[&str] = &["img", "script", "link", "iframe", "embed", "object"];
const HEAD_TAGS: &[&str] = &["meta", "script", "link"];
const DEAD_ANCHORS: &[&str] = &["#", "javascript:void(0)", "javascript:;", ""];
const POPUP_MARKERS: &[&str] = &["window.open", "popup", "alert(", "confirm("];

static MOUSEOVER_PATTERNS: LazyLock<RegexSet> = LazyLock::new(|| {
    RegexSet::new([
        r"onmouseover.*window.status",
        r"onmouseover.*location.href",
        r"window.status.*onmouseover",
    ])
    .expect("mouseover patterns are valid")
});

static RIGHT_CLICK_PATTERNS: LazyLock<RegexSet> = LazyLock::new(|| {
    RegexSet::new([
        r"oncontextmenu.*return false",
        r"oncontextmenu.*false",
        r"event.button.*2",
        r"contextmenu.*preventdefault",
    ])
    .expect("right-click patterns are valid")
});

/// One element with its attributes copied out of the DOM.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParsedTag {
    name: String,
    attributes: HashMap<String, String>,
}

impl ParsedTag {
    pub fn new(name: &str, attributes: &[(&str, &str)]) -> Self {
        Self {
            name: name.to_lowercase(),
            attributes: attributes
                .iter()
                .map(|(key, value)| (key.to_lowercase(), value.to_string()))
                .collect(),
        }
    }

    fn from_element(element: ElementRef<'_>) -> Self {
        let value = element.value();
        Self {
            name: value.name().to_string(),
            attributes: value
                .attrs()
                .map(|(key, value)| (key.to_string(), value.to_string()))
                .collect(),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn attr(&self, name: &str) -> Option<&str> {
        self.attributes.get(name).map(String::as_str)
    }

    /// Attribute value, treating an empty value as absent.
    fn non_empty(&self, name: &str) -> Option<&str> {
        self.attr(name).filter(|value| !value.is_empty())
    }

    pub fn href(&self) -> Option<&str> {
        self.attr("href")
    }

    pub fn src(&self) -> Option<&str> {
        self.attr("src")
    }

    pub fn rel(&self) -> Option<&str> {
        self.attr("rel")
    }

    pub fn action(&self) -> Option<&str> {
        self.attr("action")
    }

    pub fn style(&self) -> Option<&str> {
        self.attr("style")
    }
}

/// A fetched page reduced to what the scorers read.
#[derive(Debug, Clone)]
pub struct ParsedPage {
    lowered: String,
    tags: Vec<ParsedTag>,
}

impl ParsedPage {
    pub fn parse(html: &str) -> Result<Self, AnalysisError> {
        let document = Html::parse_document(html);
        let selector =
            Selector::parse(TRACKED_TAGS).map_err(|e| AnalysisError::Parse(e.to_string()))?;

        let tags = document
            .select(&selector)
            .map(ParsedTag::from_element)
            .collect();

        Ok(Self {
            lowered: html.to_lowercase(),
            tags,
        })
    }

    pub fn tags_named<'a>(&'a self, names: &'a [&str]) -> impl Iterator<Item = &'a ParsedTag> {
        self.tags
            .iter()
            .filter(move |tag| names.contains(&tag.name()))
    }

    pub fn tags(&self) -> &[ParsedTag] {
        &self.tags
    }
}

/// Absolute link that does not mention the page's own host.
fn is_external(value: &str, host: &str) -> bool {
    value.starts_with("http") && !value.contains(host)
}

fn ratio(part: usize, total: usize) -> f64 {
    part as f64 / total as f64
}

pub fn favicon(page: &ParsedPage, host: &str) -> Analysis {
    let icons: Vec<&ParsedTag> = page
        .tags_named(&["link"])
        .filter(|tag| tag.rel().is_some_and(|rel| rel.to_lowercase().contains("icon")))
        .collect();

    if icons.is_empty() {
        return Ok(Score::Phishing);
    }

    let external = icons
        .iter()
        .filter_map(|tag| tag.non_empty("href"))
        .any(|href| is_external(href, host));
    Ok(Score::from_indicator(external))
}

/// Share of embedded resources loaded from another host.
pub fn request_url(page: &ParsedPage, host: &str) -> Analysis {
    let sources: Vec<&str> = page
        .tags_named(RESOURCE_TAGS)
        .filter_map(|tag| tag.non_empty("src").or_else(|| tag.non_empty("href")))
        .collect();

    if sources.is_empty() {
        return Ok(Score::Legitimate);
    }

    let external = sources.iter().filter(|src| is_external(src, host)).count();
    Ok(Score::from_ratio(ratio(external, sources.len()), 0.22, 0.61))
}

/// Share of anchors that lead nowhere or off-site.
pub fn url_of_anchor(page: &ParsedPage, host: &str) -> Analysis {
    let hrefs: Vec<&str> = page.tags_named(&["a"]).filter_map(ParsedTag::href).collect();

    if hrefs.is_empty() {
        return Ok(Score::Legitimate);
    }

    let suspicious = hrefs
        .iter()
        .filter(|href| DEAD_ANCHORS.contains(*href) || is_external(href, host))
        .count();
    Ok(Score::from_ratio(ratio(suspicious, hrefs.len()), 0.31, 0.67))
}

/// Share of meta/script/link tags pointing off-site.
pub fn links_in_tags(page: &ParsedPage, host: &str) -> Analysis {
    let tags: Vec<&ParsedTag> = page.tags_named(HEAD_TAGS).collect();

    if tags.is_empty() {
        return Ok(Score::Legitimate);
    }

    let external = tags
        .iter()
        .filter(|tag| {
            ["content", "src", "href"]
                .iter()
                .filter_map(|attr| tag.non_empty(attr))
                .any(|value| is_external(value, host))
        })
        .count();
    Ok(Score::from_ratio(ratio(external, tags.len()), 0.17, 0.81))
}

/// Server form handler: a single unsafe form is enough.
pub fn sfh(page: &ParsedPage, host: &str) -> Analysis {
    let unsafe_form = page.tags_named(&["form"]).any(|form| {
        let action = form.action().unwrap_or_default();
        action.is_empty() || action == "#" || is_external(action, host) || action.contains("mailto:")
    });
    Ok(Score::from_indicator(unsafe_form))
}

pub fn submitting_to_email(page: &ParsedPage) -> Analysis {
    Ok(Score::from_indicator(page.lowered.contains("mailto:")))
}

pub fn on_mouseover(page: &ParsedPage) -> Analysis {
    Ok(Score::from_indicator(MOUSEOVER_PATTERNS.is_match(&page.lowered)))
}

pub fn right_click(page: &ParsedPage) -> Analysis {
    Ok(Score::from_indicator(
        RIGHT_CLICK_PATTERNS.is_match(&page.lowered),
    ))
}

/// Counts distinct popup markers, not occurrences.
pub fn pop_up_window(page: &ParsedPage) -> Analysis {
    let markers = POPUP_MARKERS
        .iter()
        .filter(|marker| page.lowered.contains(*marker))
        .count();

    Ok(match markers {
        0 => Score::Legitimate,
        1 | 2 => Score::Suspicious,
        _ => Score::Phishing,
    })
}

pub fn iframe(page: &ParsedPage) -> Analysis {
    let frames: Vec<&ParsedTag> = page.tags_named(&["iframe"]).collect();

    if frames.is_empty() {
        return Ok(Score::Legitimate);
    }

    let hidden = frames.iter().filter(|frame| is_hidden_frame(frame)).count();

    Ok(if hidden == 0 {
        Score::Legitimate
    } else if hidden <= frames.len() / 2 {
        Score::Suspicious
    } else {
        Score::Phishing
    })
}

fn is_hidden_frame(frame: &ParsedTag) -> bool {
    let tiny = |attr: &str| {
        let size = frame.attr(attr).unwrap_or("100").trim();
        size == "0" || size == "1"
    };
    let style = frame
        .style()
        .unwrap_or_default()
        .replace(' ', "")
        .to_lowercase();

    tiny("width")
        || tiny("height")
        || style.contains("display:none")
        || style.contains("visibility:hidden")
}
