//! Page composition and writing.
//!
//! The outer page (head, top navigation, footer, stylesheet links) lives in
//! `templates/base.html` so it can be restyled without a rebuild of the tool.
//! The template names the slots it wants filled:
//!
//! ```html
//! <html data-theme="$theme">
//!   <title>${title}</title>
//!   <nav>$nav</nav>
//!   <main>$content</main>
//!   <footer>$footer_note $footer_links</footer>
//! </html>
//! ```
//!
//! `$$` produces a literal `$`. Plain-text slots (`title`, `description`,
//! `logo`, `theme`, `footer_note`) are escaped; fragment slots (`nav`,
//! `content`, `footer_links`) are inserted as rendered. A slot name the
//! composer doesn't supply is an error, as is a `$` that starts no slot.

use crate::render::{NavStyle, render_footer_links, render_layout, render_nav};
use crate::types::SiteData;
use maud::{Markup, html};
use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// File name of the generated page inside the output directory.
pub const INDEX_FILE: &str = "index.html";

#[derive(Error, Debug)]
pub enum TemplateError {
    #[error("Template not found: {}", .0.display())]
    Missing(PathBuf),
    #[error("IO error reading template {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("Template references unknown placeholder '{name}' at line {line}, column {column}")]
    UnknownPlaceholder {
        name: String,
        line: usize,
        column: usize,
    },
    #[error("Invalid placeholder in template at line {line}, column {column}")]
    InvalidPlaceholder { line: usize, column: usize },
}

/// Values for template slots, already rendered to HTML.
pub type Slots = BTreeMap<&'static str, Markup>;

/// A page template read from disk.
#[derive(Debug, Clone)]
pub struct Template {
    source: String,
}

impl Template {
    pub fn new(source: impl Into<String>) -> Self {
        Self {
            source: source.into(),
        }
    }

    pub fn load(path: &Path) -> Result<Self, TemplateError> {
        if !path.is_file() {
            return Err(TemplateError::Missing(path.to_path_buf()));
        }
        let source = fs::read_to_string(path).map_err(|source| TemplateError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Ok(Self { source })
    }

    /// Fill every slot, failing on the first unknown or malformed one.
    pub fn substitute(&self, slots: &Slots) -> Result<String, TemplateError> {
        let template = self.source.as_str();
        let mut out = String::with_capacity(template.len());
        let mut rest = template;
        let mut offset = 0;

        while let Some(pos) = rest.find('$') {
            out.push_str(&rest[..pos]);
            let at = offset + pos;
            let after = &rest[pos + 1..];

            let (name, consumed) = if after.starts_with('$') {
                out.push('$');
                (None, 2)
            } else if let Some(braced) = after.strip_prefix('{') {
                let end = braced.find('}').ok_or_else(|| invalid(template, at))?;
                let name = &braced[..end];
                if identifier_len(name) != name.len() || name.is_empty() {
                    return Err(invalid(template, at));
                }
                (Some(name), end + 3)
            } else {
                let len = identifier_len(after);
                if len == 0 {
                    return Err(invalid(template, at));
                }
                (Some(&after[..len]), len + 1)
            };

            if let Some(name) = name {
                let value = slots.get(name).ok_or_else(|| {
                    let (line, column) = position(template, at);
                    TemplateError::UnknownPlaceholder {
                        name: name.to_string(),
                        line,
                        column,
                    }
                })?;
                out.push_str(&value.0);
            }

            rest = &rest[pos + consumed..];
            offset += pos + consumed;
        }

        out.push_str(rest);
        Ok(out)
    }
}

/// Byte length of the identifier (`[A-Za-z_][A-Za-z0-9_]*`) starting `s`.
fn identifier_len(s: &str) -> usize {
    let bytes = s.as_bytes();
    match bytes.first() {
        Some(b) if b.is_ascii_alphabetic() || *b == b'_' => bytes
            .iter()
            .take_while(|b| b.is_ascii_alphanumeric() || **b == b'_')
            .count(),
        _ => 0,
    }
}

fn invalid(template: &str, at: usize) -> TemplateError {
    let (line, column) = position(template, at);
    TemplateError::InvalidPlaceholder { line, column }
}

/// 1-based line and column of byte offset `at`.
fn position(template: &str, at: usize) -> (usize, usize) {
    let before = &template[..at];
    let line = before.matches('\n').count() + 1;
    let line_start = before.rfind('\n').map(|i| i + 1).unwrap_or(0);
    let column = before[line_start..].chars().count() + 1;
    (line, column)
}

/// Slot values for the homepage.
pub fn page_slots(data: &SiteData) -> Slots {
    let text = |s: &str| html! { (s) };
    let mut slots = Slots::new();
    slots.insert("title", text(data.site.title()));
    slots.insert("description", text(data.site.description()));
    slots.insert("logo", text(&data.profile.name));
    slots.insert(
        "nav",
        render_nav(&data.navigation, &data.toggles, NavStyle::TopBar),
    );
    slots.insert("content", render_layout(data));
    slots.insert("theme", text(data.site.theme()));
    slots.insert("footer_links", render_footer_links(&data.footer.links));
    slots.insert(
        "footer_note",
        text(data.footer.note.as_deref().unwrap_or_default()),
    );
    slots
}

/// Render the full page for a normalized document.
pub fn render_page(data: &SiteData, template: &Template) -> Result<String, TemplateError> {
    template.substitute(&page_slots(data))
}

/// Write `html` as the output directory's `index.html`, replacing any
/// previous page. Returns the path written.
pub fn write_index(output_dir: &Path, html: &str) -> std::io::Result<PathBuf> {
    fs::create_dir_all(output_dir)?;
    let path = output_dir.join(INDEX_FILE);
    fs::write(&path, html)?;
    Ok(path)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_helpers::*;
    use maud::PreEscaped;
    use tempfile::TempDir;

    fn slots(pairs: &[(&'static str, &str)]) -> Slots {
        pairs
            .iter()
            .map(|(k, v)| (*k, PreEscaped(v.to_string())))
            .collect()
    }

    // =========================================================================
    // Substitution
    // =========================================================================

    #[test]
    fn substitutes_bare_and_braced_names() {
        let t = Template::new("<title>$title</title><p>${title}s</p>");
        let out = t.substitute(&slots(&[("title", "Home")])).unwrap();
        assert_eq!(out, "<title>Home</title><p>Homes</p>");
    }

    #[test]
    fn double_dollar_is_literal() {
        let t = Template::new("cost: $$5 $name");
        let out = t.substitute(&slots(&[("name", "x")])).unwrap();
        assert_eq!(out, "cost: $5 x");
    }

    #[test]
    fn identifier_stops_at_non_word_char() {
        let t = Template::new("<div class=\"$theme-mode\">");
        let out = t.substitute(&slots(&[("theme", "dark")])).unwrap();
        assert_eq!(out, "<div class=\"dark-mode\">");
    }

    #[test]
    fn unused_slots_are_fine() {
        let t = Template::new("plain");
        assert_eq!(t.substitute(&slots(&[("title", "x")])).unwrap(), "plain");
    }

    #[test]
    fn unknown_placeholder_is_error_with_position() {
        let t = Template::new("<html>\n  <b>$subtitle</b>");
        let err = t.substitute(&slots(&[("title", "x")])).unwrap_err();
        match err {
            TemplateError::UnknownPlaceholder { name, line, column } => {
                assert_eq!(name, "subtitle");
                assert_eq!(line, 2);
                assert_eq!(column, 6);
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn dangling_dollar_is_invalid() {
        for source in ["price $", "price $5", "${}", "${not-ident}", "${open"] {
            let err = Template::new(source).substitute(&Slots::new()).unwrap_err();
            assert!(
                matches!(err, TemplateError::InvalidPlaceholder { line: 1, .. }),
                "{source:?} should be invalid, got {err}"
            );
        }
    }

    #[test]
    fn substituted_values_are_not_rescanned() {
        let t = Template::new("$a");
        let out = t.substitute(&slots(&[("a", "$b")])).unwrap();
        assert_eq!(out, "$b");
    }

    // =========================================================================
    // Page composition
    // =========================================================================

    #[test]
    fn page_slots_cover_base_template() {
        let slots = page_slots(&sample_data());
        let names: Vec<&str> = slots.keys().copied().collect();
        assert_eq!(
            names,
            vec![
                "content",
                "description",
                "footer_links",
                "footer_note",
                "logo",
                "nav",
                "theme",
                "title"
            ]
        );
    }

    #[test]
    fn text_slots_are_escaped() {
        let mut data = sample_data();
        data.site.title = Some("Ada & <Friends>".to_string());
        let html = render_page(&data, &Template::new("<title>$title</title>")).unwrap();
        assert_eq!(html, "<title>Ada &amp; &lt;Friends&gt;</title>");
    }

    #[test]
    fn site_defaults_fill_missing_values() {
        let mut data = sample_data();
        data.site = Default::default();
        let html = render_page(&data, &Template::new("$title|$theme|$description|")).unwrap();
        assert_eq!(html, "Research Homepage|dark||");
    }

    #[test]
    fn render_page_fills_content_and_nav() {
        let template = Template::new(BASE_TEMPLATE_FIXTURE);
        let html = render_page(&sample_data(), &template).unwrap();
        assert!(html.contains(r#"<div class="layout">"#));
        assert!(html.contains(r#"class="nav-link""#));
        assert!(html.contains("<span class=\"logo\">Ada Example</span>"));
        assert!(!html.contains("$content"));
    }

    // =========================================================================
    // Loading and writing
    // =========================================================================

    #[test]
    fn load_missing_template() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("templates/base.html");
        assert!(matches!(
            Template::load(&path),
            Err(TemplateError::Missing(p)) if p == path
        ));
    }

    #[test]
    fn write_index_creates_dir_and_overwrites() {
        let tmp = TempDir::new().unwrap();
        let out = tmp.path().join("docs");
        let path = write_index(&out, "first").unwrap();
        assert_eq!(path, out.join("index.html"));
        write_index(&out, "second").unwrap();
        assert_eq!(fs::read_to_string(path).unwrap(), "second");
    }
}
