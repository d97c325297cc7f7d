//! Exports the [`Site`] type which stitches together the high-level steps of
//! producing listings: parsing the pages ([`crate::parser`]) and grouping them
//! ([`crate::group`]) once per configured listing.

use crate::config::{Config, Grouping, ListingConfig};
use crate::group::{self, group_by, group_by_formatted_date, PageGroup};
use crate::page::Page;
use crate::parser::{Error as ParseError, Parser};
use log::info;
use std::fmt;

/// The pages of a site, loaded according to a [`Config`].
pub struct Site {
    /// The site's pages, most recent first.
    pub pages: Vec<Page>,
}

/// A computed listing: a configured name plus its groups.
#[derive(Debug, PartialEq)]
pub struct Listing<'a> {
    pub name: String,
    pub groups: Vec<PageGroup<'a>>,
}

impl Site {
    /// Parses every page under the configured content directory. Drafts are
    /// dropped unless `include_drafts` is set.
    pub fn load(config: &Config) -> Result<Site> {
        let mut pages =
            Parser::new(&config.base_url).parse_pages(&config.content_directory)?;
        if !config.include_drafts {
            pages.retain(|page| !page.draft);
        }
        Ok(Site { pages })
    }

    /// Computes every listing in `listings`, in order. The first listing
    /// that fails aborts the whole computation.
    pub fn listings(&self, listings: &[ListingConfig]) -> Result<Vec<Listing<'_>>> {
        listings.iter().map(|listing| self.listing(listing)).collect()
    }

    /// Computes a single listing.
    pub fn listing(&self, listing: &ListingConfig) -> Result<Listing<'_>> {
        let groups = match &listing.grouping {
            Grouping::Field(field) => {
                group_by(&self.pages, *field, listing.order).map_err(|err| {
                    Error::Group {
                        listing: listing.name.clone(),
                        err,
                    }
                })?
            }
            Grouping::Date(format) => {
                group_by_formatted_date(&self.pages, format, listing.order)
            }
        };
        info!(
            "listing `{}`: {} groups over {} pages",
            listing.name,
            groups.len(),
            self.pages.len()
        );
        Ok(Listing {
            name: listing.name.clone(),
            groups,
        })
    }
}

type Result<T> = std::result::Result<T, Error>;

/// The error type for building listings. Errors can be during parsing or
/// during grouping.
#[derive(Debug)]
pub enum Error {
    /// Returned for errors during parsing.
    Parse(ParseError),

    /// Returned when a listing's grouping fails.
    Group { listing: String, err: group::Error },
}

impl fmt::Display for Error {
    /// Implements [`fmt::Display`] for [`Error`].
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Error::Parse(err) => err.fmt(f),
            Error::Group { listing, err } => {
                write!(f, "Grouping listing '{}': {}", listing, err)
            }
        }
    }
}

impl std::error::Error for Error {
    /// Implements [`std::error::Error`] for [`Error`].
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Error::Parse(err) => Some(err),
            Error::Group { listing: _, err } => Some(err),
        }
    }
}

impl From<ParseError> for Error {
    /// Converts [`ParseError`]s into [`Error`]. This allows us to use the `?`
    /// operator.
    fn from(err: ParseError) -> Error {
        Error::Parse(err)
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::key::{GroupKey, Order};
    use crate::page::Field;
    use std::path::Path;

    fn titles(group: &PageGroup) -> Vec<String> {
        group.pages.iter().map(|p| p.title.clone()).collect()
    }

    #[test]
    fn test_listings() -> anyhow::Result<()> {
        let config = Config::from_directory(Path::new("./testdata"))?;
        let site = Site::load(&config)?;
        assert_eq!(3, site.pages.len());
        assert!(site.pages.iter().all(|p| !p.draft));

        let listings = site.listings(&config.listings)?;
        assert_eq!(3, listings.len());

        let archive = &listings[0];
        assert_eq!("archive", archive.name);
        assert_eq!(2, archive.groups.len());
        assert_eq!(GroupKey::from("May 2014"), archive.groups[0].key);
        assert_eq!(vec!["Second Post", "First Post"], titles(&archive.groups[0]));
        assert_eq!(GroupKey::from("April 2014"), archive.groups[1].key);
        assert_eq!(vec!["About"], titles(&archive.groups[1]));

        let by_weight = &listings[1];
        assert_eq!(
            vec![GroupKey::Int(0), GroupKey::Int(1), GroupKey::Int(2)],
            by_weight
                .groups
                .iter()
                .map(|g| g.key.clone())
                .collect::<Vec<GroupKey>>()
        );
        assert_eq!(vec!["Second Post"], titles(&by_weight.groups[0]));
        assert_eq!(vec!["About"], titles(&by_weight.groups[1]));
        assert_eq!(vec!["First Post"], titles(&by_weight.groups[2]));

        let sections = &listings[2];
        assert_eq!(GroupKey::from(""), sections.groups[0].key);
        assert_eq!(GroupKey::from("posts"), sections.groups[1].key);
        assert_eq!(vec!["Second Post", "First Post"], titles(&sections.groups[1]));
        Ok(())
    }

    #[test]
    fn test_include_drafts() -> anyhow::Result<()> {
        let mut config = Config::from_directory(Path::new("./testdata"))?;
        config.include_drafts = true;
        let site = Site::load(&config)?;
        assert_eq!(4, site.pages.len());

        let listing = site.listing(&ListingConfig {
            name: String::from("sections"),
            grouping: Grouping::Field(Field::Section),
            order: Order::Desc,
        })?;
        assert_eq!(
            vec![
                GroupKey::from("posts"),
                GroupKey::from("notes"),
                GroupKey::from("")
            ],
            listing
                .groups
                .iter()
                .map(|g| g.key.clone())
                .collect::<Vec<GroupKey>>()
        );
        Ok(())
    }

    #[test]
    fn test_unsupported_listing_fails() -> anyhow::Result<()> {
        let config = Config::from_directory(Path::new("./testdata"))?;
        let site = Site::load(&config)?;
        match site.listing(&ListingConfig {
            name: String::from("drafts"),
            grouping: Grouping::Field(Field::Draft),
            order: Order::Asc,
        }) {
            Err(Error::Group { listing, err }) => {
                assert_eq!("drafts", listing);
                assert_eq!(group::Error::UnsupportedKeyType(Field::Draft), err);
            }
            other => panic!("wanted a grouping error, got {:?}", other),
        }
        Ok(())
    }
}
