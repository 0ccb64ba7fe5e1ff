//! # Homepage
//!
//! Renders a personal research homepage from a single JSON data file into one
//! static HTML page. Profile, news, publications, projects, resources and
//! writings all live in `data/site.json`; the page chrome lives in
//! `templates/base.html`.
//!
//! # Architecture
//!
//! A build is one pass through five steps:
//!
//! ```text
//! 1. Load       data/site.json           →  SiteData
//! 2. Normalize  SiteData                 →  SiteData + warnings
//! 3. Render     SiteData + base.html     →  index.html (in memory)
//! 4. Prepare    static/assets, photos/   →  docs/assets/
//! 5. Write      index.html               →  docs/index.html
//! ```
//!
//! Normalize is the only step that looks at the document's content for
//! problems. It fills in missing links and images with placeholders and
//! reports each substitution as a [`normalize::Warning`]; rendering never
//! fails on content.
//!
//! # Module Map
//!
//! | Module | Role |
//! |--------|------|
//! | [`types`] | The `site.json` data model |
//! | [`load`] | Reads and parses the data file |
//! | [`normalize`] | Placeholder substitution and image resolution |
//! | [`toggles`] | Feature-flag lookup shared by navigation and sections |
//! | [`render`] | Maud fragments for the sidebar and each content section |
//! | [`page`] | `base.html` slot substitution and writing `index.html` |
//! | [`assets`] | Output directory preparation and asset lookup |
//! | [`config`] | Optional `homepage.toml` with stock defaults |
//! | [`pipeline`] | `build` and `check`, end to end |
//! | [`output`] | CLI output formatting |
//!
//! # Design Decisions
//!
//! ## Maud For Fragments, A Template For The Page
//!
//! Every fragment is built with [Maud](https://maud.lambda.xyz/), so all
//! interpolated document text is escaped. The outer page stays a plain file
//! with `$name` slots so its head, fonts and scripts can change without
//! touching the tool.
//!
//! ## Destructive Rebuilds
//!
//! The output directory is deleted and recreated on every build. Whatever is
//! in `docs/` after a build came from this build. The page is rendered first,
//! so a broken template leaves the previous site in place.

pub mod assets;
pub mod config;
pub mod load;
pub mod normalize;
pub mod output;
pub mod page;
pub mod pipeline;
pub mod render;
pub mod toggles;
pub mod types;

#[cfg(test)]
pub(crate) mod test_helpers;
