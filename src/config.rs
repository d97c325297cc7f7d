//! Loads the site configuration from a `pagegroup.yaml` project file.
//!
//! A project file looks like this:
//!
//! ```yaml
//! base_url: https://example.org/
//! content_directory: content   # optional, relative to the project file
//! include_drafts: false        # optional
//! listings:
//!   - name: archive
//!     by: { date: "January 2006" }
//!     order: desc              # optional; dates default to desc
//!   - name: sections
//!     by: { field: Section }   # fields default to asc
//! ```

use crate::date::DateFormat;
use crate::key::Order;
use crate::page::Field;
use anyhow::{anyhow, Context, Result};
use serde::Deserialize;
use std::fs::File;
use std::path::{Path, PathBuf};
use url::Url;

const PROJECT_FILE: &str = "pagegroup.yaml";

#[derive(Deserialize)]
struct Project {
    pub base_url: Url,

    #[serde(default = "default_content_directory")]
    pub content_directory: PathBuf,

    #[serde(default)]
    pub include_drafts: bool,

    #[serde(default)]
    pub listings: Vec<ProjectListing>,
}

fn default_content_directory() -> PathBuf {
    PathBuf::from("content")
}

#[derive(Deserialize)]
struct ProjectListing {
    name: String,
    by: ProjectGrouping,
    #[serde(default)]
    order: Option<String>,
}

#[derive(Deserialize)]
#[serde(rename_all = "lowercase")]
enum ProjectGrouping {
    Field(String),
    Date(String),
}

/// How a listing's pages are grouped.
#[derive(Clone, Debug, PartialEq)]
pub enum Grouping {
    /// Group by the value of a field.
    Field(Field),

    /// Group by the formatted page date.
    Date(DateFormat),
}

/// A named grouping to compute for the site. Field names, layouts, and
/// orders are resolved when the configuration is loaded, so a bad listing is
/// reported before any page is parsed.
#[derive(Clone, Debug, PartialEq)]
pub struct ListingConfig {
    pub name: String,
    pub grouping: Grouping,
    pub order: Order,
}

impl ListingConfig {
    fn resolve(listing: ProjectListing) -> Result<ListingConfig> {
        let grouping = match listing.by {
            ProjectGrouping::Field(name) => {
                let field: Field = name.parse()?;
                // Surface unsupported fields now rather than on first use.
                field.extractor()?;
                Grouping::Field(field)
            }
            ProjectGrouping::Date(layout) => Grouping::Date(DateFormat::parse(&layout)?),
        };
        let order = match (&listing.order, &grouping) {
            (Some(order), _) => order.parse::<Order>()?,
            (None, Grouping::Field(_)) => Order::Asc,
            (None, Grouping::Date(_)) => Order::Desc,
        };
        Ok(ListingConfig {
            name: listing.name,
            grouping,
            order,
        })
    }
}

pub struct Config {
    /// The site's root URL, always with a trailing slash.
    pub base_url: Url,
    pub content_directory: PathBuf,
    pub include_drafts: bool,
    pub listings: Vec<ListingConfig>,
}

impl Config {
    /// Searches `dir` and then each of its ancestors for a `pagegroup.yaml`
    /// and loads the first one found.
    pub fn from_directory(dir: &Path) -> Result<Config> {
        let path = dir.join(PROJECT_FILE);
        if path.exists() {
            Config::from_project_file(&path)
                .with_context(|| format!("Loading configuration `{}`", path.display()))
        } else {
            match dir.parent() {
                Some(parent) => Config::from_directory(parent),
                None => Err(anyhow!(
                    "Could not find `{}` in any parent directory",
                    PROJECT_FILE
                )),
            }
        }
    }

    /// Loads the project file at `path`. Relative directories in the file
    /// are resolved against the file's parent directory.
    pub fn from_project_file(path: &Path) -> Result<Config> {
        let file = File::open(path)
            .with_context(|| format!("Opening project file `{}`", path.display()))?;
        let project: Project = serde_yaml::from_reader(file)?;
        match path.parent() {
            None => Err(anyhow!(
                "Can't get parent directory for provided project file path '{:?}'",
                path
            )),
            Some(project_root) => Config::from_project(project_root, project),
        }
    }

    /// Loads a configuration from YAML text, resolving relative directories
    /// against `project_root`.
    pub fn from_yaml(project_root: &Path, yaml: &str) -> Result<Config> {
        Config::from_project(project_root, serde_yaml::from_str(yaml)?)
    }

    fn from_project(project_root: &Path, project: Project) -> Result<Config> {
        let mut base_url = project.base_url;
        if !base_url.path().ends_with('/') {
            let path = format!("{}/", base_url.path());
            base_url.set_path(&path);
        }

        Ok(Config {
            base_url,
            content_directory: project_root.join(project.content_directory),
            include_drafts: project.include_drafts,
            listings: project
                .listings
                .into_iter()
                .map(|listing| {
                    let name = listing.name.clone();
                    ListingConfig::resolve(listing)
                        .with_context(|| format!("Resolving listing `{}`", name))
                })
                .collect::<Result<Vec<ListingConfig>>>()?,
        })
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn test_from_directory_searches_ancestors() -> Result<()> {
        let config = Config::from_directory(Path::new("./testdata/content/posts"))?;
        assert_eq!("https://example.org/", config.base_url.as_str());
        assert_eq!(Path::new("./testdata/content"), config.content_directory);
        assert!(!config.include_drafts);
        assert_eq!(
            vec!["archive", "by-weight", "sections"],
            config
                .listings
                .iter()
                .map(|l| l.name.as_str())
                .collect::<Vec<&str>>()
        );
        assert_eq!(
            ListingConfig {
                name: String::from("archive"),
                grouping: Grouping::Date(DateFormat::parse("January 2006")?),
                order: Order::Desc,
            },
            config.listings[0]
        );
        assert_eq!(Grouping::Field(Field::Weight), config.listings[1].grouping);
        assert_eq!(Order::Asc, config.listings[1].order);
        Ok(())
    }

    #[test]
    fn test_base_url_gets_trailing_slash() -> Result<()> {
        let config = Config::from_yaml(Path::new("."), "base_url: https://example.org/blog")?;
        assert_eq!("https://example.org/blog/", config.base_url.as_str());
        assert_eq!(Path::new("./content"), config.content_directory);
        assert!(config.listings.is_empty());
        Ok(())
    }

    #[test]
    fn test_unknown_field_fails() {
        let yaml = "base_url: https://example.org/\n\
                    listings:\n  - name: colours\n    by: { field: Colour }\n";
        let err = match Config::from_yaml(Path::new("."), yaml) {
            Err(err) => err,
            Ok(_) => panic!("wanted an error"),
        };
        let message = format!("{:#}", err);
        assert!(message.contains("colours"), "{}", message);
        assert!(message.contains("Colour"), "{}", message);
    }

    #[test]
    fn test_unsupported_field_fails() {
        let yaml = "base_url: https://example.org/\n\
                    listings:\n  - name: tags\n    by: { field: Tags }\n";
        assert!(Config::from_yaml(Path::new("."), yaml).is_err());
    }

    #[test]
    fn test_invalid_order_fails() {
        let yaml = "base_url: https://example.org/\n\
                    listings:\n  - name: archive\n    by: { date: \"2006\" }\n    order: newest\n";
        assert!(Config::from_yaml(Path::new("."), yaml).is_err());
    }

    #[test]
    fn test_missing_project_file() {
        assert!(Config::from_directory(Path::new("/")).is_err());
    }
}
