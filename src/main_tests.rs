// Copyright (c) 2025 Erick Bourgeois, firestoned
// SPDX-License-Identifier: MIT

//! Unit tests for `main.rs` - command line parsing

#[cfg(test)]
mod tests {
    use super::super::{parse_record_ref, Cli, RecordRef};
    use clap::Parser;

    #[test]
    fn test_parse_record_ref_with_zone_prefix() {
        let parsed = parse_record_ref("zone-A/record-0", None).unwrap();
        assert_eq!(
            parsed,
            RecordRef {
                zone_id: "zone-A".to_string(),
                record_id: "record-0".to_string(),
            }
        );
    }

    #[test]
    fn test_parse_record_ref_prefix_beats_default_zone() {
        let parsed = parse_record_ref("zone-B/record-1", Some("zone-A")).unwrap();
        assert_eq!(parsed.zone_id, "zone-B");
        assert_eq!(parsed.record_id, "record-1");
    }

    #[test]
    fn test_parse_record_ref_uses_default_zone() {
        let parsed = parse_record_ref("record-1", Some("zone-A")).unwrap();
        assert_eq!(parsed.zone_id, "zone-A");
        assert_eq!(parsed.record_id, "record-1");
    }

    #[test]
    fn test_parse_record_ref_without_zone_fails() {
        let err = parse_record_ref("record-1", None).unwrap_err();
        assert!(err.to_string().contains("--zone-id"));
    }

    #[test]
    fn test_parse_record_ref_keeps_empty_parts() {
        let parsed = parse_record_ref("/", None).unwrap();
        assert_eq!(parsed.zone_id, "");
        assert_eq!(parsed.record_id, "");
    }

    #[test]
    fn test_cli_parses_flags() {
        let cli = Cli::try_parse_from([
            "zonecache",
            "--zone-id",
            "zone-A",
            "-r",
            "record-0",
            "--record",
            "zone-B/record-1",
            "--retry-failed-fetches",
            "--page-size",
            "500",
            "--metrics",
        ])
        .unwrap();

        assert_eq!(cli.zone_id.as_deref(), Some("zone-A"));
        assert_eq!(cli.records, vec!["record-0", "zone-B/record-1"]);
        assert!(cli.retry_failed_fetches);
        assert_eq!(cli.page_size, Some(500));
        assert!(cli.metrics);
        assert!(cli.base_url.is_none());
    }

    #[test]
    fn test_cli_requires_a_record() {
        assert!(Cli::try_parse_from(["zonecache", "--zone-id", "zone-A"]).is_err());
    }

    #[test]
    fn test_cli_rejects_out_of_range_page_size() {
        let result = Cli::try_parse_from(["zonecache", "-r", "zone-A/record-0", "--page-size", "1"]);
        assert!(result.is_err());
    }
}
