//! Defines the [`Parser`] and [`Error`] types: the logic for loading
//! [`Page`]s from a content directory on disk.

use std::{
    fmt,
    fs::read_to_string,
    path::{Component, Path, PathBuf},
};

use log::{debug, info};
use pulldown_cmark::{Event, Parser as MarkdownParser};
use serde::Deserialize;
use url::Url;
use walkdir::WalkDir;

use crate::{date::parse_date, page::Page};

const MARKDOWN_EXTENSION: &str = "md";

/// The average number of words read per minute, used to estimate
/// [`Page::reading_time`].
const WORDS_PER_MINUTE: i64 = 213;

/// Parses [`Page`] objects from source files.
pub struct Parser<'a> {
    /// `base_url` is the site's root URL. It must end in a trailing slash.
    /// Page permalinks are `{base_url}/{section}/{slug}/`.
    base_url: &'a Url,
}

impl<'a> Parser<'a> {
    /// Constructs a new parser. See fields on [`Parser`] for argument
    /// descriptions.
    pub fn new(base_url: &'a Url) -> Parser<'a> {
        Parser { base_url }
    }

    /// Searches a `content_directory` recursively for page files (extension
    /// `.md`) and returns a list of [`Page`] objects sorted by date (most
    /// recent first, ties broken by title). Each page file must be structured
    /// as follows:
    ///
    /// 1. Initial frontmatter fence (`---`)
    /// 2. YAML frontmatter with fields `Title`, `Date`, and optionally
    ///    `Description`, `Type`, `Slug`, `Layout`, `Weight`, `Draft`, and
    ///    `Tags`
    /// 3. Terminal frontmatter fence (`---`)
    /// 4. Markdown body
    ///
    /// For example:
    ///
    /// ```md
    /// ---
    /// Title: Hello, world!
    /// Date: 2014-05-01
    /// Tags: [greet]
    /// ---
    /// # Hello
    ///
    /// World
    /// ```
    pub fn parse_pages(&self, content_directory: &Path) -> Result<Vec<Page>> {
        let mut pages = Vec::new();
        for result in WalkDir::new(content_directory)
            .sort_by(|a, b| a.file_name().cmp(b.file_name()))
        {
            let entry = result?;
            if !entry.file_type().is_file()
                || entry.path().extension().and_then(|ext| ext.to_str())
                    != Some(MARKDOWN_EXTENSION)
            {
                continue;
            }

            pages.push(self.parse_page(
                content_directory,
                // strip_prefix shouldn't fail since `content_directory` is
                // always an ancestor of the walked entries
                entry.path().strip_prefix(content_directory).unwrap(),
            )?);
        }

        pages.sort_by(|a, b| {
            b.date.cmp(&a.date).then_with(|| a.title.cmp(&b.title))
        });
        info!(
            "parsed {} pages from `{}`",
            pages.len(),
            content_directory.display()
        );
        Ok(pages)
    }

    /// Reads and parses the page at `relative_path` (relative to
    /// `content_directory`), annotating any error with the path.
    fn parse_page(
        &self,
        content_directory: &Path,
        relative_path: &Path,
    ) -> Result<Page> {
        let parsed = read_to_string(content_directory.join(relative_path))
            .map_err(Error::from)
            .and_then(|contents| self.parse_str(relative_path, &contents));

        match parsed {
            Ok(page) => {
                debug!(
                    "parsed page `{}` ({} words)",
                    relative_path.display(),
                    page.word_count
                );
                Ok(page)
            }
            Err(e) => Err(Error::Annotated(
                format!("parsing page `{}`", relative_path.display()),
                Box::new(e),
            )),
        }
    }

    /// Parses a single [`Page`] from its source text. `relative_path` is the
    /// path of the source file relative to the content directory; its first
    /// directory becomes the page's section.
    pub fn parse_str(&self, relative_path: &Path, input: &str) -> Result<Page> {
        fn frontmatter_indices(input: &str) -> Result<(usize, usize, usize)> {
            const FENCE: &str = "---";
            if !input.starts_with(FENCE) {
                return Err(Error::FrontmatterMissingStartFence);
            }
            match input[FENCE.len()..].find(FENCE) {
                None => Err(Error::FrontmatterMissingEndFence),
                Some(offset) => Ok((
                    FENCE.len(),                        // yaml_start
                    FENCE.len() + offset,               // yaml_stop
                    FENCE.len() + offset + FENCE.len(), // body_start
                )),
            }
        }

        let (yaml_start, yaml_stop, body_start) = frontmatter_indices(input)?;
        let frontmatter: Frontmatter =
            serde_yaml::from_str(&input[yaml_start..yaml_stop])?;
        let content = &input[body_start..];

        let section = section(relative_path)?;
        let slug = match frontmatter.slug {
            Some(slug) if !slug.trim().is_empty() => slug.trim().to_owned(),
            _ => slug::slugify(&frontmatter.title),
        };
        let permalink = match section.is_empty() {
            true => self.base_url.join(&format!("{}/", slug))?,
            false => self.base_url.join(&format!("{}/{}/", section, slug))?,
        };
        let word_count = word_count(content);

        Ok(Page {
            date: parse_date(&frontmatter.date)?,
            description: frontmatter.description,
            kind: frontmatter.kind.unwrap_or_else(|| section.clone()),
            section,
            slug,
            layout: frontmatter.layout,
            permalink,
            weight: frontmatter.weight,
            word_count,
            reading_time: (word_count + WORDS_PER_MINUTE - 1) / WORDS_PER_MINUTE,
            draft: frontmatter.draft,
            tags: frontmatter.tags.iter().map(|t| slug::slugify(t)).collect(),
            title: frontmatter.title,
            content: content.to_owned(),
        })
    }
}

/// Returns the first directory of `relative_path`, or the empty string if
/// the file lives at the top of the content directory.
fn section(relative_path: &Path) -> Result<String> {
    let mut components = relative_path.components();
    match (components.next(), components.next()) {
        (Some(Component::Normal(dir)), Some(_)) => match dir.to_str() {
            Some(dir) => Ok(dir.to_owned()),
            None => Err(InvalidFileNameError(relative_path.to_owned()).into()),
        },
        _ => Ok(String::new()),
    }
}

/// Counts the words in the text a markdown document renders to.
fn word_count(markdown: &str) -> i64 {
    let mut text = String::with_capacity(markdown.len());
    for event in MarkdownParser::new(markdown) {
        match event {
            Event::Text(t) | Event::Code(t) => text.push_str(&t),
            Event::SoftBreak | Event::HardBreak | Event::Rule | Event::End(_) => {
                text.push(' ')
            }
            _ => {}
        }
    }
    text.split_whitespace().count() as i64
}

#[derive(Deserialize, Clone)]
struct Frontmatter {
    #[serde(rename = "Title")]
    pub title: String,

    #[serde(rename = "Date")]
    pub date: String,

    #[serde(default, rename = "Description")]
    pub description: String,

    /// The content type; defaults to the section.
    #[serde(default, rename = "Type")]
    pub kind: Option<String>,

    /// The URL-friendly name; defaults to the slugified title.
    #[serde(default, rename = "Slug")]
    pub slug: Option<String>,

    #[serde(default, rename = "Layout")]
    pub layout: String,

    #[serde(default, rename = "Weight")]
    pub weight: i64,

    #[serde(default, rename = "Draft")]
    pub draft: bool,

    #[serde(default, rename = "Tags")]
    pub tags: Vec<String>,
}

#[derive(Debug)]
pub struct InvalidFileNameError(PathBuf);

impl fmt::Display for InvalidFileNameError {
    /// Displays an [`InvalidFileNameError`] as human-readable text.
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "invalid file name: {:?}", &self.0)
    }
}

impl std::error::Error for InvalidFileNameError {
    /// Implements the [`std::error::Error`] trait for [`InvalidFileNameError`].
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        None
    }
}

/// Represents the result of a [`Page`]-parse operation.
pub type Result<T> = std::result::Result<T, Error>;

/// Represents an error parsing a [`Page`] object.
#[derive(Debug)]
pub enum Error {
    /// Returned when a page source file is missing its starting frontmatter
    /// fence (`---`).
    FrontmatterMissingStartFence,

    /// Returned when a page source file is missing its terminal frontmatter
    /// fence (`---` i.e., the starting fence was found but the ending one was
    /// missing).
    FrontmatterMissingEndFence,

    /// Returned when there was an error parsing the frontmatter as YAML.
    DeserializeYaml(serde_yaml::Error),

    /// Returned when the frontmatter `Date` isn't a recognized timestamp.
    DateParse(chrono::ParseError),

    /// Returned when there is a problem building a page's permalink.
    UrlParse(url::ParseError),

    /// Returned for other I/O errors.
    Io(std::io::Error),

    /// Returned for WalkDir I/O errors.
    WalkDir(walkdir::Error),

    /// Returned when a source directory name isn't valid UTF-8.
    InvalidFileName(InvalidFileNameError),

    /// An error with an annotation.
    Annotated(String, Box<Error>),
}

impl fmt::Display for Error {
    /// Displays an [`Error`] as human-readable text.
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Error::FrontmatterMissingStartFence => {
                write!(f, "Page must begin with `---`")
            }
            Error::FrontmatterMissingEndFence => {
                write!(f, "Missing closing `---`")
            }
            Error::DeserializeYaml(err) => err.fmt(f),
            Error::DateParse(err) => write!(f, "parsing `Date`: {}", err),
            Error::UrlParse(err) => err.fmt(f),
            Error::Io(err) => err.fmt(f),
            Error::WalkDir(err) => err.fmt(f),
            Error::InvalidFileName(err) => err.fmt(f),
            Error::Annotated(annotation, err) => {
                write!(f, "{}: {}", &annotation, err)
            }
        }
    }
}

impl std::error::Error for Error {
    /// Implements the [`std::error::Error`] trait for [`Error`].
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Error::FrontmatterMissingStartFence => None,
            Error::FrontmatterMissingEndFence => None,
            Error::DeserializeYaml(err) => Some(err),
            Error::DateParse(err) => Some(err),
            Error::UrlParse(err) => Some(err),
            Error::Io(err) => Some(err),
            Error::WalkDir(err) => Some(err),
            Error::InvalidFileName(err) => Some(err),
            Error::Annotated(_, err) => Some(err),
        }
    }
}

impl From<InvalidFileNameError> for Error {
    fn from(err: InvalidFileNameError) -> Error {
        Error::InvalidFileName(err)
    }
}

impl From<chrono::ParseError> for Error {
    /// Converts a [`chrono::ParseError`] into an [`Error`]. It allows us to
    /// use the `?` operator for frontmatter dates.
    fn from(err: chrono::ParseError) -> Error {
        Error::DateParse(err)
    }
}

impl From<url::ParseError> for Error {
    /// Converts a [`url::ParseError`] into an [`Error`]. It allows us to use
    /// the `?` operator for URL parsing and joining functions.
    fn from(err: url::ParseError) -> Error {
        Error::UrlParse(err)
    }
}

impl From<serde_yaml::Error> for Error {
    /// Converts a [`serde_yaml::Error`] into an [`Error`]. It allows us to use
    /// the `?` operator for [`serde_yaml`] deserialization functions.
    fn from(err: serde_yaml::Error) -> Error {
        Error::DeserializeYaml(err)
    }
}

impl From<walkdir::Error> for Error {
    /// Converts a [`walkdir::Error`] into an [`Error`]. It allows us to
    /// use the `?` operator while walking the content directory.
    fn from(err: walkdir::Error) -> Error {
        Error::WalkDir(err)
    }
}

impl From<std::io::Error> for Error {
    /// Converts a [`std::io::Error`] into an [`Error`]. It allows us to
    /// use the `?` operator for fallible I/O functions.
    fn from(err: std::io::Error) -> Error {
        Error::Io(err)
    }
}
