//! Filling in missing links and images.
//!
//! The site document is curated by hand and is often incomplete: a timeline
//! entry without a link, a paper whose PDF isn't up yet, a project whose
//! screenshot was renamed. Rather than failing the build, [`normalize`]
//! substitutes placeholders and reports each substitution as a [`Warning`].
//!
//! | Field | Missing → | Warns |
//! |-------|-----------|-------|
//! | `timeline[].link` | placeholder link | no |
//! | `publications[].links` (no non-empty URL) | `{"link": placeholder}` | yes |
//! | `publications[].links[label]` (empty URL) | placeholder link | no |
//! | `projects[].image` (absent or not found) | placeholder image | yes |
//! | `profile.avatar` (then `assets.avatar`) | placeholder image | yes |
//!
//! Normalizing is idempotent: placeholders are treated as valid values, so a
//! second pass changes nothing and warns about nothing.

use crate::assets::AssetLookup;
use crate::config::PlaceholderConfig;
use crate::types::{LinkMap, SiteData};
use std::fmt;

/// Label given to the single link of a publication that had none.
pub const DEFAULT_LINK_LABEL: &str = "link";

/// A placeholder substitution made while normalizing.
#[derive(Debug, Clone, PartialEq)]
pub enum Warning {
    PublicationLinksMissing { title: String },
    ProjectImageMissing { name: String },
    ProjectImageNotFound { name: String, path: String },
    AvatarMissing,
    AvatarNotFound { path: String },
}

impl fmt::Display for Warning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Warning::PublicationLinksMissing { title } => write!(
                f,
                "Publication '{title}' missing links, applying placeholder."
            ),
            Warning::ProjectImageMissing { name } => {
                write!(f, "Project '{name}' missing image, applying placeholder.")
            }
            Warning::ProjectImageNotFound { name, path } => write!(
                f,
                "Project '{name}' image not found at {path}, applying placeholder."
            ),
            Warning::AvatarMissing => write!(f, "Profile avatar missing, applying placeholder."),
            Warning::AvatarNotFound { path } => write!(
                f,
                "Profile avatar not found at {path}, applying placeholder."
            ),
        }
    }
}

/// Return a copy of `data` with every link and image resolved.
///
/// `placeholders.image` is replaced by the document's own
/// `assets.placeholder_image` when it sets one. Each substitution that the
/// author should know about is passed to `warn` as it happens.
pub fn normalize(
    data: &SiteData,
    placeholders: &PlaceholderConfig,
    assets: &dyn AssetLookup,
    mut warn: impl FnMut(Warning),
) -> SiteData {
    let mut out = data.clone();
    let placeholder_image = data
        .assets
        .placeholder_image
        .as_deref()
        .filter(|s| !s.is_empty())
        .unwrap_or(&placeholders.image)
        .to_string();
    let placeholder_link = placeholders.link.as_str();

    for item in &mut out.timeline {
        if item.link.is_empty() {
            item.link = placeholder_link.to_string();
        }
    }

    for publication in &mut out.publications {
        if !publication.links.has_any_url() {
            warn(Warning::PublicationLinksMissing {
                title: publication.title.clone(),
            });
            publication.links = [(DEFAULT_LINK_LABEL, placeholder_link)].into_iter().collect();
            continue;
        }
        publication.links = fill_links(&publication.links, placeholder_link);
    }

    let resolver = ImageResolver {
        assets,
        placeholder: &placeholder_image,
    };

    for project in &mut out.projects {
        project.image = match resolver.check(&project.image) {
            ImageCheck::Ok => continue,
            ImageCheck::Missing => {
                warn(Warning::ProjectImageMissing {
                    name: project.name.clone(),
                });
                placeholder_image.clone()
            }
            ImageCheck::NotFound => {
                warn(Warning::ProjectImageNotFound {
                    name: project.name.clone(),
                    path: project.image.clone(),
                });
                placeholder_image.clone()
            }
        };
    }

    let avatar = if out.profile.avatar.is_empty() {
        out.assets.avatar.clone().unwrap_or_default()
    } else {
        out.profile.avatar.clone()
    };
    out.profile.avatar = match resolver.check(&avatar) {
        ImageCheck::Ok => avatar,
        ImageCheck::Missing => {
            warn(Warning::AvatarMissing);
            placeholder_image.clone()
        }
        ImageCheck::NotFound => {
            warn(Warning::AvatarNotFound { path: avatar });
            placeholder_image.clone()
        }
    };

    out
}

/// Convenience wrapper collecting warnings into a vector.
pub fn normalize_collect(
    data: &SiteData,
    placeholders: &PlaceholderConfig,
    assets: &dyn AssetLookup,
) -> (SiteData, Vec<Warning>) {
    let mut warnings = Vec::new();
    let normalized = normalize(data, placeholders, assets, |w| warnings.push(w));
    (normalized, warnings)
}

fn fill_links(links: &LinkMap, placeholder: &str) -> LinkMap {
    links
        .iter()
        .map(|(label, url)| (label, if url.is_empty() { placeholder } else { url }))
        .collect()
}

enum ImageCheck {
    Ok,
    Missing,
    NotFound,
}

struct ImageResolver<'a> {
    assets: &'a dyn AssetLookup,
    placeholder: &'a str,
}

impl ImageResolver<'_> {
    fn check(&self, path: &str) -> ImageCheck {
        if path.is_empty() {
            ImageCheck::Missing
        } else if path == self.placeholder || self.assets.exists(path) {
            ImageCheck::Ok
        } else {
            ImageCheck::NotFound
        }
    }
}
