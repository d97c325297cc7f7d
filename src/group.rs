//! The grouping engine. Partitions a slice of [`Page`]s into ordered
//! [`PageGroup`]s, either by the value of a field ([`group_by_field`]) or by a
//! formatted date ([`group_by_date`]).
//!
//! Groups borrow the pages they hold; the caller's slice is never modified.
//! Within a group, pages always appear in the same relative order they had in
//! the input (for field grouping) or in the date-sorted sequence (for date
//! grouping).

use std::collections::HashMap;
use std::fmt;

use log::debug;

use crate::date::DateFormat;
use crate::key::{sort_keys, GroupKey, Order};
use crate::page::{Field, Page};

/// One key plus the pages that share it.
#[derive(Clone, Debug, PartialEq)]
pub struct PageGroup<'a> {
    /// The value shared by every page in the group.
    pub key: GroupKey,

    /// The group's pages, in encounter order.
    pub pages: Vec<&'a Page>,
}

/// Groups `pages` by the field named `field`, emitting groups ordered by key
/// in the direction named by `order` (`"asc"` or `"desc"`).
///
/// The order is validated first, then the field name; both fail even if
/// `pages` is empty. An empty slice yields no groups.
pub fn group_by_field<'a>(
    pages: &'a [Page],
    field: &str,
    order: &str,
) -> Result<Vec<PageGroup<'a>>> {
    let order: Order = order.parse()?;
    let field: Field = field.parse()?;
    group_by(pages, field, order)
}

/// Groups `pages` by `field`. See [`group_by_field`].
pub fn group_by(pages: &[Page], field: Field, order: Order) -> Result<Vec<PageGroup<'_>>> {
    let extract = field.extractor()?;
    if pages.is_empty() {
        return Ok(Vec::new());
    }

    let mut buckets: HashMap<GroupKey, Vec<&Page>> = HashMap::new();
    for page in pages {
        buckets.entry(extract(page)).or_default().push(page);
    }

    let mut keys: Vec<GroupKey> = buckets.keys().cloned().collect();
    sort_keys(&mut keys, order);

    let groups: Vec<PageGroup> = keys
        .into_iter()
        .filter_map(|key| buckets.remove(&key).map(|pages| PageGroup { key, pages }))
        .collect();

    debug!(
        "grouped {} pages by {} ({}) into {} groups",
        pages.len(),
        field,
        order,
        groups.len()
    );
    Ok(groups)
}

/// Groups `pages` by their date formatted with `layout` (see
/// [`crate::date`] for the layout syntax). Pages are first ordered by date,
/// newest first for `"desc"` and oldest first for `"asc"`, keeping pages with
/// identical timestamps in their input order. Consecutive pages whose
/// formatted dates match then share a group.
pub fn group_by_date<'a>(
    pages: &'a [Page],
    layout: &str,
    order: &str,
) -> Result<Vec<PageGroup<'a>>> {
    let order: Order = order.parse()?;
    let format = DateFormat::parse(layout)?;
    Ok(group_by_formatted_date(pages, &format, order))
}

/// Groups `pages` by their date formatted with `format`. See
/// [`group_by_date`].
pub fn group_by_formatted_date<'a>(
    pages: &'a [Page],
    format: &DateFormat,
    order: Order,
) -> Vec<PageGroup<'a>> {
    let mut sorted: Vec<&Page> = pages.iter().collect();
    sorted.sort_by(|a, b| order.apply(a.date.cmp(&b.date)));
    let groups = contiguous_runs(sorted, format);
    debug!(
        "grouped {} pages by date `{}` ({}) into {} groups",
        pages.len(),
        format.layout(),
        order,
        groups.len()
    );
    groups
}

/// Groups `pages` by their date formatted with `format`, merging only
/// adjacent pages and keeping the caller's order. If pages with equal
/// formatted dates aren't adjacent in `pages`, each run gets its own group.
pub fn group_by_date_adjacent<'a>(
    pages: &'a [Page],
    format: &DateFormat,
) -> Vec<PageGroup<'a>> {
    contiguous_runs(pages.iter().collect(), format)
}

fn contiguous_runs<'a>(pages: Vec<&'a Page>, format: &DateFormat) -> Vec<PageGroup<'a>> {
    let mut groups: Vec<PageGroup> = Vec::new();
    for page in pages {
        let formatted = format.format(&page.date);
        match groups.last_mut() {
            Some(group) if group.key.as_str() == Some(formatted.as_str()) => {
                group.pages.push(page)
            }
            _ => groups.push(PageGroup {
                key: GroupKey::Str(formatted),
                pages: vec![page],
            }),
        }
    }
    groups
}

/// A borrowed collection of pages with the grouping operations as methods.
/// This is the surface handed to the templating layer, where field names,
/// layouts, and orders arrive as strings.
#[derive(Clone, Copy, Debug)]
pub struct Pages<'a>(pub &'a [Page]);

impl<'a> Pages<'a> {
    /// See [`group_by_field`].
    pub fn group_by(&self, field: &str, order: &str) -> Result<Vec<PageGroup<'a>>> {
        group_by_field(self.0, field, order)
    }

    /// See [`group_by_date`].
    pub fn group_by_date(&self, layout: &str, order: &str) -> Result<Vec<PageGroup<'a>>> {
        group_by_date(self.0, layout, order)
    }

    /// The number of pages.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Whether there are no pages.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl<'a> From<&'a [Page]> for Pages<'a> {
    fn from(pages: &'a [Page]) -> Pages<'a> {
        Pages(pages)
    }
}

/// The result of a fallible grouping operation.
pub type Result<T> = std::result::Result<T, Error>;

/// Represents an error in a grouping operation. Grouping errors never leave
/// partial results behind; the caller decides whether to abort or to fall
/// back to an empty listing.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Error {
    /// Returned when the order argument is neither `asc` nor `desc`.
    InvalidOrder(String),

    /// Returned when the field name doesn't name a field of [`Page`].
    FieldNotFound(String),

    /// Returned when the field exists but holds neither an integer nor a
    /// string, so its values can't be ordered as keys.
    UnsupportedKeyType(Field),

    /// Returned when a date layout can't be formatted with.
    InvalidDateFormat(String),
}

impl fmt::Display for Error {
    /// Displays an [`Error`] as human-readable text.
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Error::InvalidOrder(order) => write!(
                f,
                "order argument must be 'asc' or 'desc', got '{}'",
                order
            ),
            Error::FieldNotFound(field) => write!(f, "no such field in page: '{}'", field),
            Error::UnsupportedKeyType(field) => write!(
                f,
                "field '{}' is neither an integer nor a string and can't be grouped by",
                field
            ),
            Error::InvalidDateFormat(layout) => write!(f, "invalid date layout: '{}'", layout),
        }
    }
}

impl std::error::Error for Error {
    /// Implements the [`std::error::Error`] trait for [`Error`].
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        None
    }
}
