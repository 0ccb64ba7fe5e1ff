//! The site document: everything the homepage is rendered from.
//!
//! One JSON file describes the whole page. Every container is optional and
//! defaults to empty; only `profile` (and its `name`) must be present. Extra
//! fields are ignored so the document can carry notes for other tools.
//!
//! ```json
//! {
//!   "site": { "title": "Research Homepage", "theme": "dark" },
//!   "profile": { "name": "Ada", "avatar": "assets/photos/ada.jpg" },
//!   "toggles": { "news": true, "projects": false },
//!   "timeline": [{ "date": "2024", "title": "Launch", "description": "v1" }],
//!   "publications": [{ "year": 2023, "title": "Paper", "links": { "pdf": "..." } }]
//! }
//! ```
//!
//! Fields the normalize stage may fill in (`link`, `image`, `avatar`, `links`)
//! are plain strings where empty means "missing", so a normalized document
//! has the same shape as a raw one.

use serde::de::{self, Deserializer, MapAccess, Visitor};
use serde::ser::{SerializeMap, Serializer};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

/// Root of the site document.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SiteData {
    #[serde(default)]
    pub site: Site,
    pub profile: Profile,
    #[serde(default, skip_serializing_if = "AssetRefs::is_empty")]
    pub assets: AssetRefs,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub navigation: Vec<NavItem>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub highlights: Vec<Highlight>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub timeline: Vec<TimelineItem>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub publications: Vec<Publication>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub projects: Vec<Project>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub resources: Vec<ResourceGroup>,
    #[serde(default)]
    pub writings: Writings,
    #[serde(default)]
    pub archives: Archives,
    #[serde(default)]
    pub footer: Footer,
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub toggles: Toggles,
}

/// Feature key → enabled. See [`crate::toggles::is_enabled`].
pub type Toggles = BTreeMap<String, bool>;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Site {
    #[serde(deserialize_with = "optional_text", skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(deserialize_with = "optional_text", skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(deserialize_with = "optional_text", skip_serializing_if = "Option::is_none")]
    pub theme: Option<String>,
}

impl Site {
    pub fn title(&self) -> &str {
        self.title.as_deref().unwrap_or("Research Homepage")
    }

    pub fn theme(&self) -> &str {
        self.theme.as_deref().unwrap_or("dark")
    }

    pub fn description(&self) -> &str {
        self.description.as_deref().unwrap_or_default()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Profile {
    pub name: String,
    #[serde(default, deserialize_with = "text")]
    pub native_name: String,
    #[serde(default, deserialize_with = "text")]
    pub role: String,
    #[serde(default, deserialize_with = "text")]
    pub organization: String,
    #[serde(default, deserialize_with = "text")]
    pub location: String,
    #[serde(default, deserialize_with = "text")]
    pub tagline: String,
    #[serde(default, deserialize_with = "text")]
    pub email: String,
    /// Image path relative to the output root. Empty until normalized.
    #[serde(default, deserialize_with = "text")]
    pub avatar: String,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub socials: Vec<Social>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub actions: Vec<ProfileAction>,
}

/// Document-level asset overrides (`"assets": {...}`).
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AssetRefs {
    /// Replaces the configured placeholder image for this document.
    #[serde(deserialize_with = "optional_text", skip_serializing_if = "Option::is_none")]
    pub placeholder_image: Option<String>,
    /// Avatar used when `profile.avatar` is empty.
    #[serde(deserialize_with = "optional_text", skip_serializing_if = "Option::is_none")]
    pub avatar: Option<String>,
}

impl AssetRefs {
    fn is_empty(&self) -> bool {
        self.placeholder_image.is_none() && self.avatar.is_none()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Social {
    pub label: String,
    pub url: String,
}

/// A button in the sidebar's action row.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProfileAction {
    pub label: String,
    pub url: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub toggle: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub enabled: Option<bool>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NavItem {
    pub label: String,
    /// Anchor (`#news`) or URL. Defaults to `#` at render time.
    #[serde(default, deserialize_with = "optional_text", skip_serializing_if = "Option::is_none")]
    pub target: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub toggle: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub enabled: Option<bool>,
    /// Opens in a new tab with `rel="noopener"`.
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub external: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Highlight {
    pub title: String,
    pub description: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TimelineItem {
    #[serde(deserialize_with = "text")]
    pub date: String,
    pub title: String,
    #[serde(default, deserialize_with = "text")]
    pub description: String,
    #[serde(default, deserialize_with = "text")]
    pub link: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Publication {
    #[serde(deserialize_with = "text")]
    pub year: String,
    pub title: String,
    #[serde(default, deserialize_with = "text")]
    pub authors: String,
    #[serde(default, deserialize_with = "text")]
    pub venue: String,
    /// Short tags shown next to the venue.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub highlights: Vec<String>,
    #[serde(default)]
    pub links: LinkMap,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Project {
    pub name: String,
    #[serde(default, deserialize_with = "text")]
    pub summary: String,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub tags: Vec<String>,
    #[serde(default, deserialize_with = "text")]
    pub image: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResourceGroup {
    pub category: String,
    #[serde(default)]
    pub items: Vec<ResourceItem>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResourceItem {
    pub title: String,
    pub url: String,
    #[serde(default, deserialize_with = "optional_text", skip_serializing_if = "Option::is_none")]
    pub note: Option<String>,
}

/// The two writing streams, rendered as separate sections.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Writings {
    #[serde(deserialize_with = "block", skip_serializing_if = "Option::is_none")]
    pub blog: Option<WritingsBlock>,
    #[serde(deserialize_with = "block", skip_serializing_if = "Option::is_none")]
    pub essays: Option<WritingsBlock>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WritingsBlock {
    #[serde(deserialize_with = "optional_text", skip_serializing_if = "Option::is_none")]
    pub eyebrow: Option<String>,
    #[serde(deserialize_with = "optional_text", skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(deserialize_with = "optional_text", skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(deserialize_with = "optional_text", skip_serializing_if = "Option::is_none")]
    pub archive_link: Option<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub entries: Vec<WritingEntry>,
    /// The document wrote this block with at least one key, known or not.
    #[serde(skip)]
    pub present: bool,
}

impl WritingsBlock {
    /// True for `{}`: a block written with no keys is not rendered.
    pub fn is_empty(&self) -> bool {
        !self.present
    }
}

impl Block for WritingsBlock {
    fn mark_present(&mut self) {
        self.present = true;
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WritingEntry {
    #[serde(default, deserialize_with = "text")]
    pub date: String,
    pub title: String,
    #[serde(default, deserialize_with = "text")]
    pub summary: String,
    pub url: String,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub badges: Vec<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub actions: Vec<LinkLabel>,
}

/// A plain label + URL pair (footer links, extra writing actions).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LinkLabel {
    pub label: String,
    pub url: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Archives {
    #[serde(deserialize_with = "block", skip_serializing_if = "Option::is_none")]
    pub legacy_jemdoc: Option<ArchiveNotice>,
}

/// Panel pointing at legacy content hosted elsewhere.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ArchiveNotice {
    #[serde(deserialize_with = "optional_text", skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
    #[serde(deserialize_with = "optional_text", skip_serializing_if = "Option::is_none")]
    pub summary: Option<String>,
    #[serde(deserialize_with = "optional_text", skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
    /// The document wrote this notice with at least one key, known or not.
    #[serde(skip)]
    pub present: bool,
}

impl Block for ArchiveNotice {
    fn mark_present(&mut self) {
        self.present = true;
    }
}

impl ArchiveNotice {
    /// True for `{}`: a notice written with no keys is not rendered.
    pub fn is_empty(&self) -> bool {
        !self.present
    }

    pub fn label(&self) -> &str {
        self.label.as_deref().unwrap_or("Legacy archive")
    }

    pub fn summary(&self) -> &str {
        self.summary
            .as_deref()
            .unwrap_or("Legacy jemdoc content has been archived.")
    }

    pub fn url(&self) -> &str {
        self.url.as_deref().unwrap_or("#")
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Footer {
    #[serde(deserialize_with = "optional_text", skip_serializing_if = "Option::is_none")]
    pub note: Option<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub links: Vec<LinkLabel>,
}

// ============================================================================
// Publication links
// ============================================================================

/// Ordered `label → url` map for publication links.
///
/// Kept as a vector of pairs so the rendered order matches the document.
/// `null` URLs deserialize as empty strings; duplicate labels keep the last
/// value in the first label's position, like a JSON object would.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct LinkMap(Vec<(String, String)>);

impl LinkMap {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, label: impl Into<String>, url: impl Into<String>) {
        let label = label.into();
        let url = url.into();
        match self.0.iter_mut().find(|(l, _)| *l == label) {
            Some(entry) => entry.1 = url,
            None => self.0.push((label, url)),
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.0.iter().map(|(l, u)| (l.as_str(), u.as_str()))
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// At least one entry has a non-empty URL.
    pub fn has_any_url(&self) -> bool {
        self.0.iter().any(|(_, u)| !u.is_empty())
    }
}

impl<L: Into<String>, U: Into<String>> FromIterator<(L, U)> for LinkMap {
    fn from_iter<I: IntoIterator<Item = (L, U)>>(iter: I) -> Self {
        let mut map = LinkMap::new();
        for (label, url) in iter {
            map.insert(label, url);
        }
        map
    }
}

impl Serialize for LinkMap {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.0.len()))?;
        for (label, url) in &self.0 {
            map.serialize_entry(label, url)?;
        }
        map.end()
    }
}

impl<'de> Deserialize<'de> for LinkMap {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        struct LinkMapVisitor;

        impl<'de> Visitor<'de> for LinkMapVisitor {
            type Value = LinkMap;

            fn expecting(&self, f: &mut fmt::Formatter) -> fmt::Result {
                f.write_str("a map of link labels to URLs")
            }

            fn visit_unit<E: de::Error>(self) -> Result<LinkMap, E> {
                Ok(LinkMap::new())
            }

            fn visit_map<A: MapAccess<'de>>(self, mut access: A) -> Result<LinkMap, A::Error> {
                let mut map = LinkMap::new();
                while let Some((label, url)) = access.next_entry::<String, Option<String>>()? {
                    map.insert(label, url.unwrap_or_default());
                }
                Ok(map)
            }
        }

        deserializer.deserialize_any(LinkMapVisitor)
    }
}

// ============================================================================
// Optional object blocks
// ============================================================================

/// An object-valued block whose presence depends on whether it had any keys.
trait Block: DeserializeOwned {
    fn mark_present(&mut self);
}

/// `null` or absent → `None`; `{}` → a block that is not present; any other
/// object → a present block, even when none of its keys are recognized.
fn block<'de, D: Deserializer<'de>, T: Block>(deserializer: D) -> Result<Option<T>, D::Error> {
    let Some(map) = Option::<serde_json::Map<String, serde_json::Value>>::deserialize(deserializer)?
    else {
        return Ok(None);
    };
    let has_keys = !map.is_empty();
    let mut block = T::deserialize(serde_json::Value::Object(map)).map_err(de::Error::custom)?;
    if has_keys {
        block.mark_present();
    }
    Ok(Some(block))
}

// ============================================================================
// Lenient scalar fields
// ============================================================================

/// Text that may be written as a string, a number, or `null` (→ empty).
#[derive(Deserialize)]
#[serde(untagged)]
enum Scalar {
    Text(String),
    /// Kept as written: `2023.0` stays `"2023.0"`, 64-bit integers stay exact.
    Number(serde_json::Number),
    Bool(bool),
}

impl Scalar {
    fn into_string(self) -> String {
        match self {
            Scalar::Text(s) => s,
            Scalar::Number(n) => n.to_string(),
            Scalar::Bool(b) => b.to_string(),
        }
    }
}

fn text<'de, D: Deserializer<'de>>(deserializer: D) -> Result<String, D::Error> {
    Ok(Option::<Scalar>::deserialize(deserializer)?
        .map(Scalar::into_string)
        .unwrap_or_default())
}

fn optional_text<'de, D: Deserializer<'de>>(
    deserializer: D,
) -> Result<Option<String>, D::Error> {
    Ok(Option::<Scalar>::deserialize(deserializer)?.map(Scalar::into_string))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(json: &str) -> SiteData {
        serde_json::from_str(json).unwrap()
    }

    #[test]
    fn minimal_document_only_needs_profile_name() {
        let data = parse(r#"{"profile": {"name": "Ada"}}"#);
        assert_eq!(data.profile.name, "Ada");
        assert!(data.timeline.is_empty());
        assert!(data.toggles.is_empty());
        assert_eq!(data.site.title(), "Research Homepage");
        assert_eq!(data.site.theme(), "dark");
    }

    #[test]
    fn missing_profile_is_an_error() {
        let err = serde_json::from_str::<SiteData>(r#"{"site": {}}"#).unwrap_err();
        assert!(err.to_string().contains("profile"));
    }

    #[test]
    fn unknown_fields_are_ignored() {
        let data = parse(r#"{"profile": {"name": "Ada", "pronouns": "she"}, "extra": [1, 2]}"#);
        assert_eq!(data.profile.name, "Ada");
    }

    #[test]
    fn numeric_year_becomes_text() {
        let data = parse(
            r#"{"profile": {"name": "A"},
                "publications": [{"year": 2023, "title": "Paper"}]}"#,
        );
        assert_eq!(data.publications[0].year, "2023");
    }

    #[test]
    fn numbers_keep_their_written_form() {
        let data = parse(
            r#"{"profile": {"name": "A"},
                "publications": [
                  {"year": 2023.0, "title": "Float"},
                  {"year": 18446744073709551615, "title": "Huge"},
                  {"year": -7, "title": "Negative"}
                ]}"#,
        );
        let years: Vec<&str> = data.publications.iter().map(|p| p.year.as_str()).collect();
        assert_eq!(years, vec!["2023.0", "18446744073709551615", "-7"]);
    }

    #[test]
    fn null_link_is_empty() {
        let data = parse(
            r#"{"profile": {"name": "A"},
                "timeline": [{"date": "2024", "title": "T", "link": null}]}"#,
        );
        assert_eq!(data.timeline[0].link, "");
    }

    #[test]
    fn link_map_preserves_document_order() {
        let data = parse(
            r#"{"profile": {"name": "A"},
                "publications": [{"year": "2020", "title": "P",
                  "links": {"pdf": "a.pdf", "code": null, "arxiv": "x"}}]}"#,
        );
        let links: Vec<_> = data.publications[0].links.iter().collect();
        assert_eq!(links, vec![("pdf", "a.pdf"), ("code", ""), ("arxiv", "x")]);
    }

    #[test]
    fn null_links_is_an_empty_map() {
        let data = parse(
            r#"{"profile": {"name": "A"},
                "publications": [{"year": "2020", "title": "P", "links": null}]}"#,
        );
        assert!(data.publications[0].links.is_empty());
    }

    #[test]
    fn link_map_insert_replaces_existing_label() {
        let mut map = LinkMap::new();
        map.insert("pdf", "");
        map.insert("code", "c");
        map.insert("pdf", "p");
        let links: Vec<_> = map.iter().collect();
        assert_eq!(links, vec![("pdf", "p"), ("code", "c")]);
    }

    #[test]
    fn link_map_has_any_url() {
        let empty: LinkMap = [("pdf", "")].into_iter().collect();
        assert!(!empty.has_any_url());
        let some: LinkMap = [("pdf", ""), ("code", "c")].into_iter().collect();
        assert!(some.has_any_url());
    }

    #[test]
    fn empty_writings_block_is_empty() {
        let data = parse(r#"{"profile": {"name": "A"}, "writings": {"blog": {}}}"#);
        assert!(data.writings.blog.as_ref().unwrap().is_empty());
        assert!(data.writings.essays.is_none());
    }

    #[test]
    fn writings_block_with_any_key_is_present() {
        let data = parse(
            r#"{"profile": {"name": "A"},
                "writings": {"blog": {"entries": []}, "essays": {"draft": true}}}"#,
        );
        let blog = data.writings.blog.as_ref().unwrap();
        assert!(!blog.is_empty());
        assert!(blog.entries.is_empty());
        assert!(blog.title.is_none());
        assert!(!data.writings.essays.as_ref().unwrap().is_empty());
    }

    #[test]
    fn null_writings_block_is_absent() {
        let data = parse(r#"{"profile": {"name": "A"}, "writings": {"blog": null}}"#);
        assert!(data.writings.blog.is_none());
    }

    #[test]
    fn archive_notice_presence_follows_keys() {
        let data = parse(
            r#"{"profile": {"name": "A"}, "archives": {"legacy_jemdoc": {"note": "x"}}}"#,
        );
        assert!(!data.archives.legacy_jemdoc.as_ref().unwrap().is_empty());

        let data = parse(r#"{"profile": {"name": "A"}, "archives": {"legacy_jemdoc": {}}}"#);
        assert!(data.archives.legacy_jemdoc.as_ref().unwrap().is_empty());
    }

    #[test]
    fn malformed_block_field_is_an_error() {
        let err = serde_json::from_str::<SiteData>(
            r#"{"profile": {"name": "A"}, "writings": {"blog": {"entries": 3}}}"#,
        )
        .unwrap_err();
        assert!(err.to_string().contains("invalid type"));
    }

    #[test]
    fn archive_notice_defaults() {
        let notice = ArchiveNotice {
            url: Some("https://old.example".to_string()),
            present: true,
            ..Default::default()
        };
        assert!(!notice.is_empty());
        assert_eq!(notice.label(), "Legacy archive");
        assert_eq!(notice.summary(), "Legacy jemdoc content has been archived.");
        assert_eq!(notice.url(), "https://old.example");
    }

    #[test]
    fn serialized_document_parses_back() {
        let json = r##"{"profile": {"name": "A", "avatar": "a.png"},
            "navigation": [{"label": "News", "target": "#news", "external": true}],
            "publications": [{"year": 2021, "title": "P", "links": {"pdf": "p"}}]}"##;
        let data = parse(json);
        let again: SiteData = serde_json::from_str(&serde_json::to_string(&data).unwrap()).unwrap();
        assert_eq!(data, again);
    }
}
