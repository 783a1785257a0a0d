//! Result aggregation: pairing stubs with their links, ordering and validation.
//!
//! Stub *i* is always paired with link *i* before anything is reordered, so
//! a label can never end up next to another clip's download link.

use url::Url;

use crate::collate;
use crate::{DownloadLink, Error, Result, ResultStub, SoundRecord};

/// Pair, sort and validate one batch of results.
///
/// `links` must be index-aligned with `stubs` (as produced by
/// [`DetailResolver::resolve_all`](crate::DetailResolver::resolve_all)).
/// The output has exactly as many records as there were stubs, ordered by
/// label with [`collate::compare`].
///
/// ```rust
/// use clipfetch_core::{aggregate, DownloadLink, ResultStub};
///
/// let stubs = vec![
///     ResultStub { label: "Zap".into(), detail_ref: None },
///     ResultStub { label: "air horn".into(), detail_ref: Some("/en/instant/air-horn/".into()) },
/// ];
/// let links = vec![
///     DownloadLink::NotFound,
///     DownloadLink::Resolved("https://www.myinstants.com/media/sounds/air-horn.mp3".into()),
/// ];
/// let records = aggregate(stubs, links)?;
/// assert_eq!(records[0].label, "air horn");
/// assert!(records[0].download.is_resolved());
/// assert_eq!(records[1].download, DownloadLink::NotFound);
/// # Ok::<(), clipfetch_core::Error>(())
/// ```
pub fn aggregate(stubs: Vec<ResultStub>, links: Vec<DownloadLink>) -> Result<Vec<SoundRecord>> {
    if stubs.len() != links.len() {
        return Err(Error::Validation {
            index: stubs.len().min(links.len()),
            reason: format!(
                "{} result(s) but {} download link(s)",
                stubs.len(),
                links.len()
            ),
        });
    }

    let mut records: Vec<SoundRecord> = stubs
        .into_iter()
        .zip(links)
        .map(|(stub, link)| SoundRecord::new(stub.label, link))
        .collect();
    records.sort_by(|a, b| collate::compare(&a.label, &b.label));

    for (index, record) in records.iter().enumerate() {
        validate(index, record)?;
    }
    Ok(records)
}

/// Check one record's shape.
///
/// A record needs a non-blank label. A resolved link must be an absolute
/// `http(s)` URL; [`DownloadLink::NotFound`] is always acceptable.
pub fn validate(index: usize, record: &SoundRecord) -> Result<()> {
    if record.label.trim().is_empty() {
        return Err(Error::Validation {
            index,
            reason: "label is empty".into(),
        });
    }

    if let DownloadLink::Resolved(url) = &record.download {
        let parsed = Url::parse(url).map_err(|e| Error::Validation {
            index,
            reason: format!("download link '{url}' is not an absolute URL: {e}"),
        })?;
        if !matches!(parsed.scheme(), "http" | "https") {
            return Err(Error::Validation {
                index,
                reason: format!("download link '{url}' is not http(s)"),
            });
        }
    }
    Ok(())
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use std::cmp::Ordering;

    fn stub(label: &str) -> ResultStub {
        ResultStub {
            label: label.into(),
            detail_ref: Some(format!("/en/instant/{label}/")),
        }
    }

    fn link(name: &str) -> DownloadLink {
        DownloadLink::Resolved(format!("https://www.myinstants.com/media/sounds/{name}.mp3"))
    }

    #[test]
    fn test_pairs_before_sorting() {
        let records = aggregate(
            vec![stub("zulu"), stub("alpha"), stub("mike")],
            vec![link("zulu"), link("alpha"), DownloadLink::NotFound],
        )
        .unwrap();

        let labels: Vec<_> = records.iter().map(|r| r.label.as_str()).collect();
        assert_eq!(labels, ["alpha", "mike", "zulu"]);
        assert!(records[0].download.as_str().ends_with("/alpha.mp3"));
        assert_eq!(records[1].download, DownloadLink::NotFound);
        assert!(records[2].download.as_str().ends_with("/zulu.mp3"));
    }

    #[test]
    fn test_length_mismatch_is_validation_error() {
        let err = aggregate(vec![stub("a"), stub("b")], vec![link("a")]).unwrap_err();
        assert!(matches!(err, Error::Validation { index: 1, .. }));
    }

    #[test]
    fn test_empty_batch() {
        assert!(aggregate(Vec::new(), Vec::new()).unwrap().is_empty());
    }

    #[test]
    fn test_blank_label_rejected() {
        let err = aggregate(vec![stub("ok"), stub("  ")], vec![link("a"), link("b")]).unwrap_err();
        assert!(matches!(err, Error::Validation { index: 0, .. }));
    }

    #[test]
    fn test_relative_or_foreign_links_rejected() {
        let relative = SoundRecord::new("x", DownloadLink::Resolved("/media/x.mp3".into()));
        assert!(validate(3, &relative).is_err());

        let ftp = SoundRecord::new("x", DownloadLink::Resolved("ftp://host/x.mp3".into()));
        assert!(matches!(validate(0, &ftp), Err(Error::Validation { index: 0, .. })));

        let empty = SoundRecord::new("x", DownloadLink::Resolved(String::new()));
        assert!(validate(0, &empty).is_err());
    }

    #[test]
    fn test_not_found_is_valid() {
        assert!(validate(0, &SoundRecord::new("x", DownloadLink::NotFound)).is_ok());
    }

    fn label_strategy() -> impl Strategy<Value = String> {
        "[A-Za-zÀ-ÿ0-9 !]{0,12}[A-Za-z]"
    }

    proptest! {
        #[test]
        fn prop_output_is_sorted_and_length_preserving(
            entries in proptest::collection::vec((label_strategy(), any::<bool>()), 0..30)
        ) {
            let stubs: Vec<ResultStub> = entries.iter().map(|(l, _)| stub(l)).collect();
            let links: Vec<DownloadLink> = entries
                .iter()
                .enumerate()
                .map(|(i, (_, ok))| if *ok { link(&i.to_string()) } else { DownloadLink::NotFound })
                .collect();

            let records = aggregate(stubs, links).unwrap();
            prop_assert_eq!(records.len(), entries.len());
            for pair in records.windows(2) {
                prop_assert_ne!(
                    collate::compare(&pair[0].label, &pair[1].label),
                    Ordering::Greater
                );
            }
        }

        #[test]
        fn prop_every_label_keeps_its_link(
            labels in proptest::collection::hash_set("[a-z]{1,8}", 0..20)
        ) {
            let labels: Vec<String> = labels.into_iter().collect();
            let stubs = labels.iter().map(|l| stub(l)).collect();
            let links = labels.iter().map(|l| link(l)).collect();

            for record in aggregate(stubs, links).unwrap() {
                let expected = format!("/{}.mp3", record.label);
                prop_assert!(record.download.as_str().ends_with(&expected));
            }
        }
    }
}
