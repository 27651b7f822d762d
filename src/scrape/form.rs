// Copyright (c) 2026 Bountyy Oy. All rights reserved.
// This software is proprietary and confidential.

//! Hidden-field harvesting from POST forms

use scraper::Selector;

use super::parse_document;
use crate::error::{Error, Result};

/// Ordered field name/value mapping harvested from one POST form
///
/// Duplicate names overwrite in place, so the field order of the page
/// survives into the resubmitted form. Built fresh from each fetch and
/// consumed to build the next request; server-side tokens inside it are
/// single-use and page-specific.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FormSnapshot {
    fields: Vec<(String, String)>,
}

impl FormSnapshot {
    /// Create an empty snapshot
    pub fn new() -> Self {
        Self::default()
    }

    /// Set a field, overwriting in place when the name already exists
    pub fn set(&mut self, name: impl Into<String>, value: impl Into<String>) {
        let name = name.into();
        let value = value.into();
        if let Some(slot) = self.fields.iter_mut().find(|(n, _)| *n == name) {
            slot.1 = value;
        } else {
            self.fields.push((name, value));
        }
    }

    /// Value of a field, None when absent
    pub fn get(&self, name: &str) -> Option<&str> {
        self.fields
            .iter()
            .find(|(n, _)| n == name)
            .map(|(_, v)| v.as_str())
    }

    /// Check whether a field exists
    pub fn contains(&self, name: &str) -> bool {
        self.get(name).is_some()
    }

    /// Iterate fields in order
    pub fn iter(&self) -> impl Iterator<Item = &(String, String)> {
        self.fields.iter()
    }

    /// Field count
    pub fn len(&self) -> usize {
        self.fields.len()
    }

    /// Check whether the snapshot has no fields
    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// Borrow the pairs for submission
    pub fn as_pairs(&self) -> &[(String, String)] {
        &self.fields
    }

    /// Consume into the pairs
    pub fn into_pairs(self) -> Vec<(String, String)> {
        self.fields
    }
}

/// Harvest the hidden inputs of the first POST form on a page
///
/// The target markup places exactly one actionable form per page; scoping
/// to it keeps unrelated inputs out of the snapshot. Inputs without a name
/// or value are recorded with the empty string.
pub fn hidden_fields(body: &str) -> Result<FormSnapshot> {
    let document = parse_document(body)?;
    let form_selector = Selector::parse("form").unwrap();
    let input_selector = Selector::parse(r#"input[type="hidden"]"#).unwrap();

    let form = document
        .select(&form_selector)
        .find(|form| {
            form.value()
                .attr("method")
                .map_or(false, |m| m.eq_ignore_ascii_case("post"))
        })
        .ok_or(Error::FormNotFound)?;

    let mut snapshot = FormSnapshot::new();
    for input in form.select(&input_selector) {
        let name = input.value().attr("name").unwrap_or_default();
        let value = input.value().attr("value").unwrap_or_default();
        snapshot.set(name, value);
    }

    Ok(snapshot)
}
