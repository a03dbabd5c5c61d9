//! Placeholder substitution for letter templates.
//!
//! Tokens look like `{{ student_name }}`. Matching is case-insensitive and
//! tolerates whitespace inside the braces. Substitution is purely textual:
//! names missing from the value map stay in the output verbatim, and a
//! `None` value becomes the empty string. Whether the supplied values cover
//! the template's declared variable set is a separate check.

use std::collections::HashMap;

use lazy_static::lazy_static;
use regex::{Captures, Regex};

use crate::template::models::Template;

lazy_static! {
    static ref PLACEHOLDER: Regex = Regex::new(r"\{\{\s*([A-Za-z0-9_]+)\s*\}\}")
        .expect("placeholder pattern is valid");
}

/// Replace every known placeholder in one pass over the text.
///
/// A single pass keeps the result independent of the map's iteration order
/// and stops substituted values from being scanned for tokens themselves.
pub fn interpolate(template: &str, values: &HashMap<String, Option<String>>) -> String {
    let lowered: HashMap<String, &Option<String>> = values
        .iter()
        .map(|(name, value)| (name.to_lowercase(), value))
        .collect();

    PLACEHOLDER
        .replace_all(template, |caps: &Captures| {
            match lowered.get(&caps[1].to_lowercase()) {
                Some(Some(value)) => value.clone(),
                Some(None) => String::new(),
                None => caps[0].to_string(),
            }
        })
        .into_owned()
}

/// Declared variables the supplied map does not cover (case-insensitive).
pub fn missing_variables(template: &Template, values: &HashMap<String, Option<String>>) -> Vec<String> {
    let supplied: Vec<String> = values.keys().map(|name| name.to_lowercase()).collect();
    template
        .variables
        .iter()
        .filter(|variable| !supplied.contains(&variable.name.to_lowercase()))
        .map(|variable| variable.name.clone())
        .collect()
}
