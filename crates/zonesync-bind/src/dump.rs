//! Line grammar for BIND's new-zone file.
//!
//! Every zone added through `rndc addzone` lands in the daemon's new-zone
//! file as a single-line stanza:
//!
//! ```text
//! zone "example.org" {type slave; file "slave/example.org.db"; masters { 192.0.2.1; };};
//! ```
//!
//! The zone name may appear unquoted. Comment lines (`#`, optionally
//! indented) and blank lines are ignored. Anything else did not come from
//! the daemon and aborts the bootstrap.

use once_cell::sync::Lazy;
use regex::Regex;
use zonesync_core::{Master, Result, Zone, ZoneSyncError};

/// One slave-zone stanza: captures the zone name and its single master.
/// The file path inside the stanza is matched but not kept; the database
/// location is always derived from the zone name.
static STANZA: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r#"zone "?([^\s"{]+)"?\s*\{type\s+slave;\s*file\s+"[^"]+";\s*masters\s*\{\s*([^;]+)\s*;\s*\}\s*;\s*\}\s*;"#,
    )
    .expect("stanza pattern compiles")
});

/// Blank lines and `#` comments, with optional leading whitespace.
static IGNORABLE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^\s*(#.*)?$").expect("ignorable pattern compiles"));

/// Parse one line of the dump.
///
/// Returns `Ok(None)` for ignorable lines, the extracted (master, zone)
/// pair for a stanza, and [`ZoneSyncError::InvalidDumpLine`] for anything
/// else.
pub fn parse_line(line: &str) -> Result<Option<(Master, Zone)>> {
    if IGNORABLE.is_match(line) {
        return Ok(None);
    }

    let captures = STANZA
        .captures(line)
        .ok_or_else(|| ZoneSyncError::InvalidDumpLine {
            line: line.to_string(),
        })?;
    Ok(Some((Master::from(&captures[2]), Zone::from(&captures[1]))))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_quoted_zone_name() {
        let (master, zone) = parse_line(
            r#"zone "test.com" {type slave; file "slave/test.com.db"; masters { 192.168.2.10; };};"#,
        )
        .unwrap()
        .unwrap();
        assert_eq!(zone, Zone::from("test.com"));
        assert_eq!(master, Master::from("192.168.2.10"));
    }

    #[test]
    fn test_bare_zone_name_and_unrelated_file_path() {
        // The file name does not have to match the zone name; it is ignored.
        let (master, zone) = parse_line(
            r#"zone domain.tld {type slave; file "slave/domain.es.db"; masters { 10.10.29.19; };};"#,
        )
        .unwrap()
        .unwrap();
        assert_eq!(zone, Zone::from("domain.tld"));
        assert_eq!(master, Master::from("10.10.29.19"));
    }

    #[test]
    fn test_comments_and_blanks_are_ignored() {
        assert!(parse_line("").unwrap().is_none());
        assert!(parse_line("   ").unwrap().is_none());
        assert!(parse_line("# a comment").unwrap().is_none());
        assert!(parse_line("   # an indented comment").unwrap().is_none());
    }

    #[test]
    fn test_partial_stanza_is_an_error() {
        let err = parse_line("zone basis.es").unwrap_err();
        match &err {
            ZoneSyncError::InvalidDumpLine { line } => assert_eq!(line, "zone basis.es"),
            other => panic!("expected InvalidDumpLine, got {other:?}"),
        }
        // The rendered message carries the offending line for the operator.
        assert!(err.to_string().contains("zone basis.es"));
    }

    #[test]
    fn test_master_type_stanza_is_an_error() {
        let line = r#"zone "m.example" {type master; file "m.example.db";};"#;
        assert!(matches!(
            parse_line(line),
            Err(ZoneSyncError::InvalidDumpLine { .. })
        ));
    }

    #[test]
    fn test_multiple_masters_do_not_match() {
        let line = r#"zone "m.example" {type slave; file "slave/m.example.db"; masters { 192.0.2.1; 192.0.2.2; };};"#;
        assert!(matches!(
            parse_line(line),
            Err(ZoneSyncError::InvalidDumpLine { .. })
        ));
    }
}
