//! Parsers for positional command arguments.

use std::collections::BTreeMap;

use tracing::debug;

/// Requested machine count per OS type. Keys are unique and insertion order
/// is irrelevant; the map is ordered only so wire strings are deterministic.
pub(crate) type OsRequestSet = BTreeMap<String, u32>;

/// Free-form tag mapping supplied to `modify` as a JSON object.
pub(crate) type TagSet = BTreeMap<String, String>;

/// Parse `get` positionals of the form `ostype` or `ostype=count`.
///
/// A bare name requests one machine. A non-numeric count degrades to zero
/// rather than failing; this mirrors the historical behavior and is kept
/// for compatibility, with a debug log surfacing the discarded value.
/// Later duplicates overwrite earlier ones.
pub(crate) fn parse_os_requests(args: &[String]) -> OsRequestSet {
    let mut requests = OsRequestSet::new();
    for arg in args {
        match arg.split_once('=') {
            None => {
                requests.insert(arg.clone(), 1);
            }
            Some((os_type, count)) => {
                let parsed = count.parse().unwrap_or_else(|_| {
                    debug!(os_type, count, "non-numeric count degraded to zero");
                    0
                });
                requests.insert(os_type.to_string(), parsed);
            }
        }
    }
    requests
}

/// Split a comma-separated hostname argument, dropping empty segments.
pub(crate) fn parse_hostname_list(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|segment| !segment.is_empty())
        .map(str::to_string)
        .collect()
}

/// Parse the `--tags` argument: a JSON object of string pairs.
pub(crate) fn parse_tags(raw: &str) -> Result<TagSet, String> {
    serde_json::from_str(raw)
        .map_err(|err| format!("tags must be a JSON object of string pairs: {err}"))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args(values: &[&str]) -> Vec<String> {
        values.iter().copied().map(str::to_string).collect()
    }

    #[test]
    fn bare_name_requests_one_machine() {
        let requests = parse_os_requests(&args(&["centos"]));
        assert_eq!(requests["centos"], 1);
    }

    #[test]
    fn explicit_count_is_honored() {
        let requests = parse_os_requests(&args(&["centos=5"]));
        assert_eq!(requests["centos"], 5);
    }

    #[test]
    fn non_numeric_count_degrades_to_zero() {
        let requests = parse_os_requests(&args(&["centos=abc"]));
        assert_eq!(requests["centos"], 0);
    }

    #[test]
    fn empty_count_degrades_to_zero() {
        let requests = parse_os_requests(&args(&["centos="]));
        assert_eq!(requests["centos"], 0);
    }

    #[test]
    fn later_duplicates_overwrite_earlier_ones() {
        let requests = parse_os_requests(&args(&["centos=2", "debian", "centos=7"]));
        assert_eq!(requests["centos"], 7);
        assert_eq!(requests["debian"], 1);
        assert_eq!(requests.len(), 2);
    }

    #[test]
    fn empty_argument_list_yields_an_empty_set() {
        assert!(parse_os_requests(&[]).is_empty());
    }

    #[test]
    fn only_the_first_equals_sign_splits_the_count() {
        let requests = parse_os_requests(&args(&["weird=1=2"]));
        assert_eq!(requests["weird"], 0);
    }

    #[test]
    fn hostname_list_splits_on_commas_and_drops_empties() {
        assert_eq!(
            parse_hostname_list("vm1.example.com, vm2.example.com,,"),
            vec!["vm1.example.com", "vm2.example.com"]
        );
        assert!(parse_hostname_list("").is_empty());
        assert!(parse_hostname_list(" , ,").is_empty());
    }

    #[test]
    fn tags_parse_from_a_json_object() {
        let tags = parse_tags(r#"{"owner": "alice", "purpose": "ci"}"#).expect("tags parse");
        assert_eq!(tags["owner"], "alice");
        assert_eq!(tags["purpose"], "ci");
    }

    #[test]
    fn tags_reject_non_object_payloads() {
        assert!(parse_tags("[1, 2]").is_err());
        assert!(parse_tags("not json").is_err());
    }
}
