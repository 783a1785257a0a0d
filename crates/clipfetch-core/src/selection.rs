//! Mapping menu selections back to clips.
//!
//! Interactive menus carry each clip as a single string value,
//! `"<label>||<download url>"`, alongside `action:*` navigation values. This
//! module encodes those values and parses the chosen ones back.

use url::Url;

use crate::{Error, NOT_FOUND_SENTINEL, Result, SoundRecord};

/// Separator between label and URL in a selection value.
pub const SELECTION_SEPARATOR: &str = "||";

/// A clip the user picked.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SoundSelection {
    /// Display label.
    pub label: String,
    /// Download URL, or the `not-found` placeholder.
    pub download_url: String,
}

impl SoundSelection {
    /// The menu value for this selection.
    pub fn to_value(&self) -> String {
        format!("{}{SELECTION_SEPARATOR}{}", self.label, self.download_url)
    }

    /// Whether the clip has a real download link.
    pub fn has_link(&self) -> bool {
        self.download_url != NOT_FOUND_SENTINEL
    }

    /// File name the download is saved under.
    pub fn file_name(&self) -> Result<String> {
        file_name_from_url(&self.download_url)
    }
}

impl From<&SoundRecord> for SoundSelection {
    fn from(record: &SoundRecord) -> Self {
        Self {
            label: record.label.clone(),
            download_url: record.download.as_str().to_string(),
        }
    }
}

/// The menu value for `record`.
pub fn selection_value(record: &SoundRecord) -> String {
    SoundSelection::from(record).to_value()
}

/// Parse chosen menu values into selections.
///
/// Fails with [`Error::NoSelection`] when nothing was chosen and with
/// [`Error::MalformedSelection`] when a value has no URL part. A value with
/// an empty label is named `Unknown sound N` after its 1-based position.
///
/// The value is split at its last separator: labels are free text and may
/// contain `||`, while the URL part is either an absolute URL or the
/// `not-found` placeholder.
///
/// ```rust
/// use clipfetch_core::selection::parse_selections;
///
/// let picked = parse_selections(&["Bruh||https://www.myinstants.com/media/sounds/bruh.mp3"])?;
/// assert_eq!(picked[0].label, "Bruh");
/// assert!(parse_selections::<&str>(&[]).is_err());
/// # Ok::<(), clipfetch_core::Error>(())
/// ```
pub fn parse_selections<T: AsRef<str>>(values: &[T]) -> Result<Vec<SoundSelection>> {
    if values.is_empty() {
        return Err(Error::NoSelection);
    }

    values
        .iter()
        .enumerate()
        .map(|(index, value)| {
            let value = value.as_ref();
            let (label, url) = value
                .rsplit_once(SELECTION_SEPARATOR)
                .filter(|(_, url)| !url.is_empty())
                .ok_or_else(|| Error::MalformedSelection {
                    index,
                    reason: format!("expected 'label{SELECTION_SEPARATOR}url', got '{value}'"),
                })?;
            let label = if label.is_empty() {
                format!("Unknown sound {}", index + 1)
            } else {
                label.to_string()
            };
            Ok(SoundSelection {
                label,
                download_url: url.to_string(),
            })
        })
        .collect()
}

/// Prompt header describing what was picked.
pub fn selection_message(selections: &[SoundSelection]) -> String {
    match selections {
        [] => "Selected: Unknown".to_string(),
        [only] => format!("Selected: {}", only.label),
        many => format!("Selected {} sounds", many.len()),
    }
}

/// Whether more than one clip was picked.
pub const fn is_multiple(selections: &[SoundSelection]) -> bool {
    selections.len() > 1
}

/// Last path segment of a download URL.
pub fn file_name_from_url(download_url: &str) -> Result<String> {
    let malformed = || {
        Error::InvalidUrl(format!(
            "Could not find download file name for: [{download_url}], could it be a malformed link?"
        ))
    };
    let url = Url::parse(download_url).map_err(|_| malformed())?;
    url.path_segments()
        .and_then(|mut segments| segments.next_back())
        .filter(|name| !name.is_empty())
        .map(ToString::to_string)
        .ok_or_else(malformed)
}
