//! Defines the [`Page`] record and the [`Field`] type through which the
//! grouping engine reads a page's fields by name.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, FixedOffset};
use url::Url;

use crate::group::Error;
use crate::key::GroupKey;

/// A single content page. Pages are usually produced by
/// [`crate::parser::Parser`], but nothing in the grouping engine depends on
/// how they were built.
#[derive(Clone, Debug, PartialEq)]
pub struct Page {
    /// The page's title.
    pub title: String,

    /// A short description, empty if the frontmatter didn't provide one.
    pub description: String,

    /// The page's timestamp.
    pub date: DateTime<FixedOffset>,

    /// The first directory below the content root in which the page's source
    /// file lives (e.g., `posts` for `content/posts/hello.md`). Empty for
    /// pages at the top level.
    pub section: String,

    /// The content type. Defaults to the section.
    pub kind: String,

    /// The URL-friendly name of the page. Defaults to the slugified title.
    pub slug: String,

    /// The layout the templating layer should apply. May be empty.
    pub layout: String,

    /// The page's canonical URL.
    pub permalink: Url,

    /// An ordering hint set in the frontmatter; `0` if absent.
    pub weight: i64,

    /// The number of words in the rendered body.
    pub word_count: i64,

    /// The estimated reading time in minutes.
    pub reading_time: i64,

    /// Whether the page is a draft.
    pub draft: bool,

    /// The page's (slugified) tags, in frontmatter order.
    pub tags: Vec<String>,

    /// The markdown body, without the frontmatter.
    pub content: String,
}

/// A function that extracts a [`GroupKey`] from a [`Page`].
pub type Extractor = fn(&Page) -> GroupKey;

/// The fields of a [`Page`] that can be referred to by name. Names are the
/// capitalized spellings used in frontmatter and templates (`Weight`,
/// `WordCount`, ...) and are matched exactly.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Field {
    Title,
    Description,
    Date,
    Section,
    Type,
    Slug,
    Layout,
    Permalink,
    Weight,
    WordCount,
    ReadingTime,
    Draft,
    Tags,
}

impl Field {
    /// Every field, in declaration order.
    pub const ALL: [Field; 13] = [
        Field::Title,
        Field::Description,
        Field::Date,
        Field::Section,
        Field::Type,
        Field::Slug,
        Field::Layout,
        Field::Permalink,
        Field::Weight,
        Field::WordCount,
        Field::ReadingTime,
        Field::Draft,
        Field::Tags,
    ];

    /// The field's name.
    pub fn name(self) -> &'static str {
        match self {
            Field::Title => "Title",
            Field::Description => "Description",
            Field::Date => "Date",
            Field::Section => "Section",
            Field::Type => "Type",
            Field::Slug => "Slug",
            Field::Layout => "Layout",
            Field::Permalink => "Permalink",
            Field::Weight => "Weight",
            Field::WordCount => "WordCount",
            Field::ReadingTime => "ReadingTime",
            Field::Draft => "Draft",
            Field::Tags => "Tags",
        }
    }

    /// Resolves the function that extracts this field's value as a
    /// [`GroupKey`]. Only integer and string fields can be grouped by; any
    /// other field fails with [`Error::UnsupportedKeyType`].
    pub fn extractor(self) -> Result<Extractor, Error> {
        let extractor: Extractor = match self {
            Field::Title => |p: &Page| GroupKey::Str(p.title.clone()),
            Field::Description => |p: &Page| GroupKey::Str(p.description.clone()),
            Field::Section => |p: &Page| GroupKey::Str(p.section.clone()),
            Field::Type => |p: &Page| GroupKey::Str(p.kind.clone()),
            Field::Slug => |p: &Page| GroupKey::Str(p.slug.clone()),
            Field::Layout => |p: &Page| GroupKey::Str(p.layout.clone()),
            Field::Permalink => |p: &Page| GroupKey::Str(p.permalink.to_string()),
            Field::Weight => |p: &Page| GroupKey::Int(p.weight),
            Field::WordCount => |p: &Page| GroupKey::Int(p.word_count),
            Field::ReadingTime => |p: &Page| GroupKey::Int(p.reading_time),
            Field::Date | Field::Draft | Field::Tags => {
                return Err(Error::UnsupportedKeyType(self))
            }
        };
        Ok(extractor)
    }
}

impl FromStr for Field {
    type Err = Error;

    /// Looks up a field by its exact name, failing with
    /// [`Error::FieldNotFound`] for names that aren't fields of [`Page`].
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Field::ALL
            .iter()
            .copied()
            .find(|field| field.name() == s)
            .ok_or_else(|| Error::FieldNotFound(s.to_owned()))
    }
}

impl fmt::Display for Field {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl Page {
    /// Extracts the value of the field named `name` as a [`GroupKey`].
    pub fn key(&self, name: &str) -> Result<GroupKey, Error> {
        let extractor = name.parse::<Field>()?.extractor()?;
        Ok(extractor(self))
    }
}

#[cfg(test)]
pub(crate) mod test {
    use super::*;
    use crate::date::parse_date;

    /// Builds a page for tests. Only the title and date are meaningful; the
    /// other fields carry placeholder values.
    pub(crate) fn page(title: &str, date: &str) -> Page {
        Page {
            title: title.to_owned(),
            description: String::new(),
            date: parse_date(date).unwrap(),
            section: String::from("posts"),
            kind: String::from("posts"),
            slug: slug::slugify(title),
            layout: String::new(),
            permalink: Url::parse("https://example.org/posts/")
                .unwrap()
                .join(&format!("{}/", slug::slugify(title)))
                .unwrap(),
            weight: 0,
            word_count: 0,
            reading_time: 0,
            draft: false,
            tags: Vec::new(),
            content: String::new(),
        }
    }

    #[test]
    fn test_field_names_round_trip() -> Result<(), Error> {
        for field in Field::ALL.iter() {
            assert_eq!(*field, field.name().parse::<Field>()?);
        }
        Ok(())
    }

    #[test]
    fn test_unknown_field() {
        for name in &["Nope", "weight", ""] {
            match name.parse::<Field>() {
                Err(Error::FieldNotFound(n)) => assert_eq!(*name, n),
                other => panic!("wanted FieldNotFound for {:?}, got {:?}", name, other),
            }
        }
    }

    #[test]
    fn test_unsupported_key_type() {
        for field in &[Field::Date, Field::Draft, Field::Tags] {
            match field.extractor() {
                Err(Error::UnsupportedKeyType(f)) => assert_eq!(*field, f),
                Err(e) => panic!("wanted UnsupportedKeyType for {}, got {:?}", field, e),
                Ok(_) => panic!("wanted UnsupportedKeyType for {}, got an extractor", field),
            }
        }
    }

    #[test]
    fn test_key() -> Result<(), Error> {
        let mut p = page("Hello, World!", "2014-05-01");
        p.weight = 7;
        p.word_count = 120;
        assert_eq!(GroupKey::Int(7), p.key("Weight")?);
        assert_eq!(GroupKey::Int(120), p.key("WordCount")?);
        assert_eq!(GroupKey::from("Hello, World!"), p.key("Title")?);
        assert_eq!(GroupKey::from("hello-world"), p.key("Slug")?);
        assert_eq!(GroupKey::from("posts"), p.key("Type")?);
        assert_eq!(
            GroupKey::from("https://example.org/posts/hello-world/"),
            p.key("Permalink")?
        );
        Ok(())
    }
}
