//! HTML fragments for each part of the page.
//!
//! Every function here is pure: it takes typed data (plus toggles where
//! visibility depends on them) and returns [`Markup`]. Nothing reads files or
//! consults global state, so each renderer is tested on literal input.
//!
//! All text is interpolated through maud, which HTML-escapes it. Names,
//! summaries and URLs from the site document can contain `<` or `&` without
//! breaking the page.
//!
//! ## Page Layout
//!
//! ```text
//! div.layout
//! ├── aside.sidebar#about     render_profile_sidebar
//! └── div.content             render_sections, in Section::ALL order
//!     ├── section#news        render_timeline
//!     ├── section#publications
//!     ├── section#projects
//!     ├── section#resources
//!     ├── section#blog        render_writings
//!     ├── section#essays      render_writings
//!     └── section#archive     render_archive_notice
//! ```

use crate::toggles::is_enabled;
use crate::types::{
    ArchiveNotice, Highlight, LinkLabel, NavItem, Profile, Project, Publication, ResourceGroup,
    SiteData, TimelineItem, Toggles, WritingsBlock,
};
use maud::{Markup, PreEscaped, html};

// ============================================================================
// Navigation and sidebar
// ============================================================================

/// Where a navigation list is placed. Only the link class differs.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NavStyle {
    /// Top bar: `a.nav-link`
    TopBar,
    /// Inline in the sidebar: `a.nav-anchor`
    Sidebar,
}

impl NavStyle {
    fn class(self) -> &'static str {
        match self {
            NavStyle::TopBar => "nav-link",
            NavStyle::Sidebar => "nav-anchor",
        }
    }
}

/// One link per navigation item that survives its toggle.
pub fn render_nav(items: &[NavItem], toggles: &Toggles, style: NavStyle) -> Markup {
    let visible = items
        .iter()
        .filter(|item| is_enabled(item.toggle.as_deref(), toggles, item.enabled.unwrap_or(true)));

    html! {
        @for item in visible {
            a class=(style.class())
                href=(item.target.as_deref().unwrap_or("#"))
                target=[item.external.then_some("_blank")]
                rel=[item.external.then_some("noopener")] {
                (item.label)
            }
        }
    }
}

/// Highlights as cards.
pub fn render_highlights(highlights: &[Highlight]) -> Markup {
    html! {
        @for item in highlights {
            div.highlight-card {
                h3 { (item.title) }
                p { (item.description) }
            }
        }
    }
}

/// Highlights as `<li>` items for the sidebar's focus list.
pub fn render_focus_list(highlights: &[Highlight]) -> Markup {
    html! {
        @for item in highlights {
            li { (item.title) " \u{2014} " (item.description) }
        }
    }
}

/// The left column: portrait, identity, contact, navigation, focus, actions.
pub fn render_profile_sidebar(
    profile: &Profile,
    navigation: &[NavItem],
    highlights: &[Highlight],
    toggles: &Toggles,
) -> Markup {
    let actions = profile
        .actions
        .iter()
        .filter(|a| is_enabled(a.toggle.as_deref(), toggles, a.enabled.unwrap_or(true)));

    html! {
        aside.sidebar id="about" {
            div.avatar {
                img src=(profile.avatar) alt={ "Portrait of " (profile.name) } loading="lazy";
            }
            p.eyebrow { (profile.native_name) }
            h1 { (profile.name) }
            p.role { (profile.role) br; (profile.organization) }
            p.muted { (profile.location) }
            p.lede { (profile.tagline) }
            div.contact-row {
                @if !profile.email.is_empty() {
                    a.inline-link href={ "mailto:" (profile.email) } { (profile.email) }
                }
                @for social in &profile.socials {
                    a.inline-link href=(social.url) target="_blank" rel="noopener" { (social.label) }
                }
            }
            div.nav-column { (render_nav(navigation, toggles, NavStyle::Sidebar)) }
            div.focus {
                p.eyebrow { "Focus" }
                ul { (render_focus_list(highlights)) }
            }
            div.actions {
                @for action in actions {
                    a.inline-button href=(action.url) target="_blank" rel="noopener" { (action.label) }
                }
            }
        }
    }
}

// ============================================================================
// List sections
// ============================================================================

/// One row per entry, in document order.
pub fn render_timeline(timeline: &[TimelineItem]) -> Markup {
    html! {
        @for item in timeline {
            div.list-row {
                div.list-label { (item.date) }
                div.list-body {
                    div.item-title { (item.title) }
                    p.muted { (item.description) }
                    a.inline-link href=(item.link) target="_blank" rel="noopener" { "Read more" }
                }
            }
        }
    }
}

/// One row per paper, with tag chips and a row of capitalized link labels.
pub fn render_publications(publications: &[Publication]) -> Markup {
    html! {
        @for paper in publications {
            div.list-row {
                div.list-label { (paper.year) }
                div.list-body {
                    div.item-title { (paper.title) }
                    div.muted { (paper.authors) }
                    div.meta {
                        (paper.venue) " \u{b7} "
                        @for (i, tag) in paper.highlights.iter().enumerate() {
                            @if i > 0 { " " }
                            span.tag { (tag) }
                        }
                    }
                    div.links-row {
                        @for (i, (label, url)) in paper.links.iter().enumerate() {
                            @if i > 0 { " " }
                            a.inline-link href=(url) target="_blank" rel="noopener" { (capitalize(label)) }
                        }
                    }
                }
            }
        }
    }
}

/// One row per project: thumbnail, name, summary, tags.
pub fn render_projects(projects: &[Project]) -> Markup {
    html! {
        @for project in projects {
            div.list-row.project-row {
                div.thumb {
                    img src=(project.image) alt=(project.name) loading="lazy";
                }
                div.list-body {
                    div.item-title { (project.name) }
                    p.muted { (project.summary) }
                    div.meta {
                        @for (i, tag) in project.tags.iter().enumerate() {
                            @if i > 0 { " " }
                            span.tag { (tag) }
                        }
                    }
                }
            }
        }
    }
}

/// One block per category, each a list of links with optional notes.
pub fn render_resources(resources: &[ResourceGroup]) -> Markup {
    html! {
        @for group in resources {
            div.resource-block {
                div.item-title { (group.category) }
                ul {
                    @for item in &group.items {
                        li {
                            a.inline-link href=(item.url) target="_blank" rel="noopener" { (item.title) }
                            @if let Some(note) = item.note.as_deref().filter(|n| !n.is_empty()) {
                                " "
                                span.muted { "\u{2014} " (note) }
                            }
                        }
                    }
                }
            }
        }
    }
}

// ============================================================================
// Writings and archive
// ============================================================================

/// A writings section (`blog` or `essays`) with a card per entry.
pub fn render_writings(key: &str, block: &WritingsBlock) -> Markup {
    html! {
        section.section id=(key) {
            div.section-header {
                p.eyebrow { (block.eyebrow.as_deref().unwrap_or("Writings")) }
                h2 { (block.title.as_deref().unwrap_or("Writings")) }
                p.lede { (block.description.as_deref().unwrap_or_default()) }
            }
            div.cards-grid.writing-grid {
                @for entry in &block.entries {
                    article.card.writing-card {
                        div.card-meta {
                            span.pill { (entry.date) (PreEscaped("&nbsp;")) }
                            @for badge in &entry.badges {
                                span.badge { (badge) }
                            }
                        }
                        h3 { (entry.title) }
                        p.muted { (entry.summary) }
                        div.links-row {
                            a.btn.btn-outline href=(entry.url) target="_blank" rel="noopener" { "Read" }
                            (render_link_buttons(&entry.actions))
                        }
                    }
                }
            }
            @if let Some(more) = block.archive_link.as_deref().filter(|l| !l.is_empty()) {
                div.section-foot {
                    a.text-link href=(more) target="_blank" rel="noopener" { "View more" }
                }
            }
        }
    }
}

fn render_link_buttons(actions: &[LinkLabel]) -> Markup {
    html! {
        @for action in actions {
            a.btn.btn-ghost href=(action.url) target="_blank" rel="noopener" { (action.label) }
        }
    }
}

/// Panel pointing readers at legacy content hosted elsewhere.
pub fn render_archive_notice(archive: &ArchiveNotice) -> Markup {
    html! {
        section.section.section-compact id="archive" {
            div.panel.inline-panel {
                div {
                    p.eyebrow { "Legacy" }
                    h3 { (archive.label()) }
                    p.muted { (archive.summary()) }
                }
                a.btn.btn-outline href=(archive.url()) target="_blank" rel="noopener" { "Open archive" }
            }
        }
    }
}

/// Footer links, each opening in a new tab.
pub fn render_footer_links(links: &[LinkLabel]) -> Markup {
    html! {
        @for link in links {
            a href=(link.url) target="_blank" rel="noopener" { (link.label) }
        }
    }
}

// ============================================================================
// Section assembly
// ============================================================================

/// The content sections, in the fixed order they appear on the page.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Section {
    News,
    Publications,
    Projects,
    Resources,
    Blog,
    Essays,
    LegacyArchive,
}

impl Section {
    pub const ALL: [Section; 7] = [
        Section::News,
        Section::Publications,
        Section::Projects,
        Section::Resources,
        Section::Blog,
        Section::Essays,
        Section::LegacyArchive,
    ];

    /// The toggle key that switches this section off.
    pub fn toggle_key(self) -> &'static str {
        match self {
            Section::News => "news",
            Section::Publications => "publications",
            Section::Projects => "projects",
            Section::Resources => "resources",
            Section::Blog => "blog",
            Section::Essays => "essays",
            Section::LegacyArchive => "legacy_archive",
        }
    }

    /// Enabled by its toggle and, for writings and the archive, has content.
    pub fn is_included(self, data: &SiteData) -> bool {
        if !is_enabled(Some(self.toggle_key()), &data.toggles, true) {
            return false;
        }
        match self {
            Section::Blog => writings_block(data, self).is_some(),
            Section::Essays => writings_block(data, self).is_some(),
            Section::LegacyArchive => data
                .archives
                .legacy_jemdoc
                .as_ref()
                .is_some_and(|a| !a.is_empty()),
            _ => true,
        }
    }

    pub fn render(self, data: &SiteData) -> Markup {
        match self {
            Section::News => list_section(
                "news",
                "Updates",
                "Latest News",
                "list-stack",
                render_timeline(&data.timeline),
            ),
            Section::Publications => list_section(
                "publications",
                "Selected Works",
                "Publications",
                "list-stack",
                render_publications(&data.publications),
            ),
            Section::Projects => list_section(
                "projects",
                "Research & Services",
                "Projects",
                "list-stack",
                render_projects(&data.projects),
            ),
            Section::Resources => list_section(
                "resources",
                "Notes & Links",
                "Resources",
                "resource-list",
                render_resources(&data.resources),
            ),
            Section::Blog | Section::Essays => match writings_block(data, self) {
                Some(block) => render_writings(self.toggle_key(), block),
                None => html! {},
            },
            Section::LegacyArchive => match &data.archives.legacy_jemdoc {
                Some(archive) => render_archive_notice(archive),
                None => html! {},
            },
        }
    }
}

fn writings_block(data: &SiteData, section: Section) -> Option<&WritingsBlock> {
    let block = match section {
        Section::Blog => data.writings.blog.as_ref(),
        Section::Essays => data.writings.essays.as_ref(),
        _ => None,
    };
    block.filter(|b| !b.is_empty())
}

fn list_section(id: &str, eyebrow: &str, heading: &str, body_class: &str, body: Markup) -> Markup {
    html! {
        section.section id=(id) {
            div.section-header {
                p.eyebrow { (eyebrow) }
                h2 { (heading) }
            }
            div class=(body_class) { (body) }
        }
    }
}

/// Sections that will be rendered for `data`, in page order.
pub fn included_sections(data: &SiteData) -> Vec<Section> {
    Section::ALL
        .into_iter()
        .filter(|s| s.is_included(data))
        .collect()
}

/// Every included section, concatenated in page order.
pub fn render_sections(data: &SiteData) -> Markup {
    html! {
        @for section in included_sections(data) {
            (section.render(data))
        }
    }
}

/// Sidebar plus content column.
pub fn render_layout(data: &SiteData) -> Markup {
    html! {
        div.layout {
            (render_profile_sidebar(&data.profile, &data.navigation, &data.highlights, &data.toggles))
            div.content { (render_sections(data)) }
        }
    }
}

/// First character uppercased, the rest lowercased (`"pdf"` → `"Pdf"`).
pub fn capitalize(label: &str) -> String {
    let mut chars = label.chars();
    match chars.next() {
        Some(first) => first
            .to_uppercase()
            .chain(chars.flat_map(char::to_lowercase))
            .collect(),
        None => String::new(),
    }
}
