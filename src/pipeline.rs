//! The build, end to end.
//!
//! ```text
//! load      data/site.json      →  SiteData
//! normalize SiteData            →  SiteData + warnings
//! render    SiteData + base.html →  HTML string
//! prepare   static/, photos/    →  docs/assets/
//! write     HTML                →  docs/index.html
//! ```
//!
//! Rendering runs before the output directory is cleared, so a broken
//! template fails the build without destroying the previous site.

use crate::assets::{OutputError, PreparedOutput, prepare_output};
use crate::config::{BuildConfig, ConfigError};
use crate::load::{LoadError, load_data};
use crate::normalize::{Warning, normalize, normalize_collect};
use crate::page::{Template, TemplateError, render_page, write_index};
use crate::render::{Section, included_sections};
use crate::types::SiteData;
use std::fs;
use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum BuildError {
    #[error("Config error: {0}")]
    Config(#[from] ConfigError),
    #[error(transparent)]
    Load(#[from] LoadError),
    #[error("Output error: {0}")]
    Output(#[from] OutputError),
    #[error("Template error: {0}")]
    Template(#[from] TemplateError),
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Outcome of a successful [`build`].
#[derive(Debug, Clone)]
pub struct BuildReport {
    /// Absolute path of the output directory.
    pub output_dir: PathBuf,
    pub index_path: PathBuf,
    pub prepared: PreparedOutput,
    pub warnings: usize,
    pub sections: Vec<Section>,
}

/// Outcome of a [`check`]: the normalized document and what it would render.
#[derive(Debug, Clone)]
pub struct CheckReport {
    pub data: SiteData,
    pub warnings: Vec<Warning>,
    pub sections: Vec<Section>,
}

/// Build the site described by `config`.
///
/// Each normalize warning is handed to `on_warning` as soon as it occurs.
pub fn build(
    config: &BuildConfig,
    mut on_warning: impl FnMut(&Warning),
) -> Result<BuildReport, BuildError> {
    config.validate()?;
    let raw = load_data(&config.data_path())?;

    let mut warnings = 0;
    let data = normalize(&raw, &config.placeholders, &config.asset_roots(), |w| {
        warnings += 1;
        on_warning(&w);
    });

    let template = Template::load(&config.template_path())?;
    let html = render_page(&data, &template)?;

    let output_dir = config.output_dir();
    let prepared = prepare_output(
        &output_dir,
        &config.static_assets_dir(),
        &config.photos_dir(),
    )?;
    let index_path = write_index(&output_dir, &html)?;

    Ok(BuildReport {
        output_dir: fs::canonicalize(&output_dir)?,
        index_path,
        prepared,
        warnings,
        sections: included_sections(&data),
    })
}

/// Load and normalize without touching the output directory.
pub fn check(config: &BuildConfig) -> Result<CheckReport, BuildError> {
    let raw = load_data(&config.data_path())?;
    let (data, warnings) = normalize_collect(&raw, &config.placeholders, &config.asset_roots());
    let sections = included_sections(&data);
    Ok(CheckReport {
        data,
        warnings,
        sections,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_helpers::*;

    #[test]
    fn build_fixture_site() {
        let tmp = setup_fixtures();
        let config = BuildConfig::new(tmp.path());
        let mut seen = Vec::new();
        let report = build(&config, |w| seen.push(w.clone())).unwrap();

        assert_eq!(report.index_path, config.output_dir().join("index.html"));
        assert!(report.output_dir.is_absolute());
        assert!(report.index_path.is_file());
        assert!(config.output_dir().join("assets/css/style.css").is_file());
        assert!(config.output_dir().join("assets/photos/portrait.jpg").is_file());
        assert_eq!(report.warnings, seen.len());
    }

    #[test]
    fn build_reports_missing_data() {
        let tmp = setup_fixtures();
        fs::remove_file(tmp.path().join("data/site.json")).unwrap();
        let err = build(&BuildConfig::new(tmp.path()), |_| {}).unwrap_err();
        assert!(matches!(err, BuildError::Load(LoadError::Missing(_))));
    }

    #[test]
    fn missing_template_keeps_previous_output() {
        let tmp = setup_fixtures();
        let config = BuildConfig::new(tmp.path());
        build(&config, |_| {}).unwrap();
        fs::remove_file(config.template_path()).unwrap();

        let err = build(&config, |_| {}).unwrap_err();
        assert!(matches!(err, BuildError::Template(TemplateError::Missing(_))));
        assert!(config.output_dir().join("index.html").is_file());
    }

    #[test]
    fn build_rejects_invalid_config() {
        let tmp = setup_fixtures();
        let config = BuildConfig::new(tmp.path()).with_output(".");
        let err = build(&config, |_| {}).unwrap_err();
        assert!(matches!(err, BuildError::Config(ConfigError::Validation(_))));
        assert!(tmp.path().join("data/site.json").is_file());
    }

    #[test]
    fn output_resolving_to_root_never_deletes_project() {
        let tmp = setup_fixtures();
        for output in ["docs/..", ".."] {
            let config = BuildConfig::new(tmp.path()).with_output(output);
            for _ in 0..2 {
                let err = build(&config, |_| {}).unwrap_err();
                assert!(matches!(err, BuildError::Config(ConfigError::Validation(_))));
            }
        }
        assert!(tmp.path().join("data/site.json").is_file());
        assert!(tmp.path().join("templates/base.html").is_file());
    }

    #[test]
    fn output_over_an_input_directory_is_rejected() {
        let tmp = setup_fixtures();
        for output in ["data", "templates", "static", "photos"] {
            let config = BuildConfig::new(tmp.path()).with_output(output);
            let err = build(&config, |_| {}).unwrap_err();
            assert!(matches!(err, BuildError::Config(ConfigError::Validation(_))));
        }
        assert!(tmp.path().join("data/site.json").is_file());
        assert!(tmp.path().join("templates/base.html").is_file());
        assert!(tmp.path().join("static/assets/css/style.css").is_file());
        assert!(tmp.path().join("photos/portrait.jpg").is_file());
    }

    #[test]
    fn check_does_not_write_output() {
        let tmp = setup_fixtures();
        let config = BuildConfig::new(tmp.path());
        let report = check(&config).unwrap();
        assert!(!config.output_dir().exists());
        assert_eq!(report.data.profile.name, "Ada Example");
        assert_eq!(report.sections.first(), Some(&Section::News));
    }
}
