//! Conversions from pages and groups into template [`Value`]s. Field names
//! match the names [`crate::page::Field`] resolves, so a template can group
//! by `Weight` and then print `.Weight`.

use crate::build::Listing;
use crate::group::PageGroup;
use crate::key::GroupKey;
use crate::page::Page;
use gtmpl_value::Value;
use std::collections::HashMap;

impl From<&GroupKey> for Value {
    fn from(key: &GroupKey) -> Value {
        match key {
            GroupKey::Int(i) => Value::from(*i),
            GroupKey::Str(s) => Value::String(s.clone()),
        }
    }
}

impl From<&Page> for Value {
    /// Converts a [`Page`] into a [`Value::Object`]. The date is rendered as
    /// RFC 3339 text.
    fn from(p: &Page) -> Value {
        let mut m: HashMap<String, Value> = HashMap::new();
        m.insert("Title".to_owned(), (&p.title).into());
        m.insert("Description".to_owned(), (&p.description).into());
        m.insert("Date".to_owned(), Value::String(p.date.to_rfc3339()));
        m.insert("Section".to_owned(), (&p.section).into());
        m.insert("Type".to_owned(), (&p.kind).into());
        m.insert("Slug".to_owned(), (&p.slug).into());
        m.insert("Layout".to_owned(), (&p.layout).into());
        m.insert("Permalink".to_owned(), Value::String(p.permalink.to_string()));
        m.insert("Weight".to_owned(), Value::from(p.weight));
        m.insert("WordCount".to_owned(), Value::from(p.word_count));
        m.insert("ReadingTime".to_owned(), Value::from(p.reading_time));
        m.insert("Draft".to_owned(), Value::Bool(p.draft));
        m.insert(
            "Tags".to_owned(),
            Value::Array(p.tags.iter().map(Value::from).collect()),
        );
        m.insert("Content".to_owned(), (&p.content).into());
        Value::Object(m)
    }
}

impl From<&PageGroup<'_>> for Value {
    /// Converts a [`PageGroup`] into a [`Value::Object`] with fields `Key`
    /// and `Pages`.
    fn from(group: &PageGroup<'_>) -> Value {
        let mut m: HashMap<String, Value> = HashMap::new();
        m.insert("Key".to_owned(), (&group.key).into());
        m.insert(
            "Pages".to_owned(),
            Value::Array(group.pages.iter().map(|p| Value::from(*p)).collect()),
        );
        Value::Object(m)
    }
}

/// Converts a grouping result into a [`Value::Array`] of groups.
pub fn groups_to_value(groups: &[PageGroup]) -> Value {
    Value::Array(groups.iter().map(Value::from).collect())
}

impl From<&Listing<'_>> for Value {
    /// Converts a [`Listing`] into a [`Value::Object`] with fields `Name` and
    /// `Groups`.
    fn from(listing: &Listing<'_>) -> Value {
        let mut m: HashMap<String, Value> = HashMap::new();
        m.insert("Name".to_owned(), (&listing.name).into());
        m.insert("Groups".to_owned(), groups_to_value(&listing.groups));
        Value::Object(m)
    }
}
