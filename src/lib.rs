//! The library code for `pagegroup`, the grouping engine of a static-site
//! build pipeline. It turns a collection of pages into ordered groups that
//! navigation, archive, and taxonomy views are rendered from.
//!
//! There are two ways to group pages:
//!
//! 1. By the value of a field ([`group::group_by_field`]). Pages are bucketed
//!    by key, the keys are sorted (numerically for integer fields,
//!    byte-wise for string fields), and each bucket keeps its pages in the
//!    order they were given.
//! 2. By a formatted date ([`group::group_by_date`]). Pages are ordered by
//!    date, each date is formatted with a layout (e.g., `2006-01` or
//!    `%Y-%m`), and consecutive pages with the same formatted date share a
//!    group.
//!
//! Both are pure functions over borrowed pages. The rest of the crate feeds
//! them and hands their output on: [`parser`] loads pages from a content
//! directory, [`config`] reads the listings a site wants, [`build`] computes
//! those listings, and [`value`] converts the results into template values.

#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]

pub mod build;
pub mod config;
pub mod date;
pub mod group;
pub mod key;
pub mod page;
pub mod parser;
pub mod value;
