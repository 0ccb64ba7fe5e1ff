//! Shared test utilities.
//!
//! Provides fixture setup, a fixed-set asset lookup, and a sample document
//! that renders every sidebar field.
//!
//! # Usage
//!
//! ```rust
//! use crate::test_helpers::*;
//!
//! let tmp = setup_fixtures();
//! let config = BuildConfig::new(tmp.path());
//!
//! let mut data = sample_data();
//! data.toggles = toggles(&[("projects", false)]);
//! let (out, warnings) = normalize_collect(&data, &config.placeholders, &KnownAssets::all());
//! ```

use std::collections::HashSet;
use std::path::Path;
use tempfile::TempDir;

use crate::assets::{AssetLookup, copy_tree};
use crate::types::{
    Highlight, LinkMap, NavItem, Profile, Publication, SiteData, Social, TimelineItem, Toggles,
};

/// The fixture site's page template.
pub const BASE_TEMPLATE_FIXTURE: &str = include_str!("../fixtures/site/templates/base.html");

// =========================================================================
// Fixture setup
// =========================================================================

/// Copy `fixtures/site/` to a temp directory and return it.
///
/// Tests get an isolated copy they can mutate without affecting other tests
/// or the source fixtures.
pub fn setup_fixtures() -> TempDir {
    let tmp = TempDir::new().unwrap();
    let fixtures = Path::new(env!("CARGO_MANIFEST_DIR")).join("fixtures/site");
    copy_tree(&fixtures, tmp.path()).unwrap();
    tmp
}

// =========================================================================
// Asset lookup
// =========================================================================

/// Asset lookup backed by a fixed set of paths.
pub struct KnownAssets {
    paths: HashSet<String>,
    everything: bool,
}

impl KnownAssets {
    pub fn new(paths: &[&str]) -> Self {
        Self {
            paths: paths.iter().map(|p| p.to_string()).collect(),
            everything: false,
        }
    }

    /// Every path exists.
    pub fn all() -> Self {
        Self {
            paths: HashSet::new(),
            everything: true,
        }
    }

    /// No path exists.
    pub fn none() -> Self {
        Self::new(&[])
    }
}

impl AssetLookup for KnownAssets {
    fn exists(&self, relative_path: &str) -> bool {
        self.everything || self.paths.contains(relative_path)
    }
}

// =========================================================================
// Sample data
// =========================================================================

pub fn toggles(pairs: &[(&str, bool)]) -> Toggles {
    pairs.iter().map(|(k, v)| (k.to_string(), *v)).collect()
}

/// Non-overlapping occurrences of `needle` in `haystack`.
pub fn count(haystack: &str, needle: &str) -> usize {
    haystack.matches(needle).count()
}

/// A document with a complete profile, one timeline entry and one linked
/// paper. Projects and writings are left empty for tests to fill.
pub fn sample_data() -> SiteData {
    let mut links = LinkMap::new();
    links.insert("pdf", "https://papers.example/one.pdf");

    SiteData {
        site: crate::types::Site {
            title: Some("Ada Example".to_string()),
            description: Some("Research homepage".to_string()),
            theme: Some("light".to_string()),
        },
        profile: Profile {
            name: "Ada Example".to_string(),
            native_name: "エイダ".to_string(),
            role: "Research Engineer".to_string(),
            organization: "Example Lab".to_string(),
            location: "Lisbon".to_string(),
            tagline: "Builds tools for careful people.".to_string(),
            email: "ada@example.com".to_string(),
            avatar: "assets/photos/me.jpg".to_string(),
            socials: vec![Social {
                label: "GitHub".to_string(),
                url: "https://github.com/ada".to_string(),
            }],
            actions: vec![],
        },
        assets: Default::default(),
        navigation: vec![NavItem {
            label: "News".to_string(),
            target: Some("#news".to_string()),
            toggle: Some("news".to_string()),
            enabled: None,
            external: false,
        }],
        highlights: vec![Highlight {
            title: "Systems".to_string(),
            description: "Building reliable software".to_string(),
        }],
        timeline: vec![TimelineItem {
            date: "2024".to_string(),
            title: "Started at Example Lab".to_string(),
            description: "New role".to_string(),
            link: "https://lab.example".to_string(),
        }],
        publications: vec![Publication {
            year: "2023".to_string(),
            title: "On Examples".to_string(),
            authors: "A. Example".to_string(),
            venue: "ExampleConf".to_string(),
            highlights: vec![],
            links,
        }],
        projects: vec![],
        resources: vec![],
        writings: Default::default(),
        archives: Default::default(),
        footer: Default::default(),
        toggles: Toggles::new(),
    }
}
