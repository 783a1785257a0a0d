//! Thin wrappers around `inquire` prompts.

use std::fmt;

use anyhow::Result;
use inquire::validator::Validation;
use inquire::{InquireError, Text};

/// Term offered when the user has not searched for anything yet.
pub const DEFAULT_SEARCH_TERM: &str = "wilhelm scream";

/// A menu entry: what is shown, and the value handed back when picked.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MenuItem {
    pub label: String,
    pub value: String,
}

impl MenuItem {
    pub fn new(label: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            value: value.into(),
        }
    }
}

impl fmt::Display for MenuItem {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.label)
    }
}

/// Ask for a search term, pre-filled with `default`.
pub fn ask_search_term(default: &str) -> Result<String> {
    let term = Text::new("🔍 What sound effects are you looking for?")
        .with_default(default)
        .with_validator(|input: &str| {
            if input.trim().is_empty() {
                Ok(Validation::Invalid("Please enter a search term".into()))
            } else {
                Ok(Validation::Valid)
            }
        })
        .prompt()?;
    Ok(term.trim().to_string())
}

/// Whether `err` is the user backing out of a prompt (Esc or Ctrl-C).
pub fn is_cancellation(err: &anyhow::Error) -> bool {
    matches!(
        err.downcast_ref::<InquireError>(),
        Some(InquireError::OperationCanceled | InquireError::OperationInterrupted)
    )
}
