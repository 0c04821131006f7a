use serde_json::Value;
use stack_core::{DecodeFailure, ServiceRecord};
use tracing::warn;

use crate::config::StatusDecode;
use crate::error::{ComposeError, Result};

/// Records decoded from `ps --format json`, in output order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct StatusListing {
    pub services: Vec<ServiceRecord>,
    pub failures: Vec<DecodeFailure>,
}

/// Decodes line-delimited JSON status output.
///
/// Blank lines are skipped. A line holding a JSON array contributes each of
/// its elements: Docker Compose v2 releases before 2.21 print the whole
/// listing as one array, while 2.21 and later print one object per line.
pub fn decode_status(stdout: &str, mode: StatusDecode) -> Result<StatusListing> {
    let mut listing = StatusListing::default();

    for (index, raw) in stdout.lines().enumerate() {
        let line = raw.trim();
        if line.is_empty() {
            continue;
        }

        match serde_json::from_str::<Value>(line) {
            Ok(Value::Array(items)) => listing
                .services
                .extend(items.into_iter().map(ServiceRecord::new)),
            Ok(value) => listing.services.push(ServiceRecord::new(value)),
            Err(source) => match mode {
                StatusDecode::Strict => {
                    return Err(ComposeError::Decode {
                        line: index + 1,
                        source,
                    })
                }
                StatusDecode::Lenient => {
                    warn!(line = index + 1, error = %source, "Skipping undecodable status line");
                    listing.failures.push(DecodeFailure {
                        line: index + 1,
                        error: source.to_string(),
                    });
                }
            },
        }
    }

    Ok(listing)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_decodes_each_line_in_order() {
        let stdout = concat!(
            r#"{"Service":"traefik","State":"running"}"#,
            "\n",
            r#"{"Service":"postgresql","State":"running"}"#,
            "\n",
            r#"{"Service":"redis","State":"exited"}"#,
            "\n"
        );

        let listing = decode_status(stdout, StatusDecode::Strict).unwrap();

        let names: Vec<_> = listing
            .services
            .iter()
            .filter_map(|s| s.service_name())
            .collect();
        assert_eq!(names, vec!["traefik", "postgresql", "redis"]);
        assert!(listing.failures.is_empty());
    }

    #[test]
    fn test_empty_output_is_empty_listing() {
        let listing = decode_status("", StatusDecode::Strict).unwrap();
        assert!(listing.services.is_empty());

        let listing = decode_status("\n\n  \n", StatusDecode::Lenient).unwrap();
        assert!(listing.services.is_empty());
        assert!(listing.failures.is_empty());
    }

    #[test]
    fn test_strict_mode_fails_whole_listing() {
        let stdout = "{\"a\":1}\nnot-json\n{\"b\":2}\n";

        let result = decode_status(stdout, StatusDecode::Strict);

        assert!(matches!(result, Err(ComposeError::Decode { line: 2, .. })));
    }

    #[test]
    fn test_lenient_mode_keeps_good_lines() {
        let stdout = "{\"a\":1}\nnot-json\n{\"b\":2}\n";

        let listing = decode_status(stdout, StatusDecode::Lenient).unwrap();

        assert_eq!(
            listing.services,
            vec![
                ServiceRecord::new(json!({ "a": 1 })),
                ServiceRecord::new(json!({ "b": 2 })),
            ]
        );
        assert_eq!(listing.failures.len(), 1);
        assert_eq!(listing.failures[0].line, 2);
    }

    #[test]
    fn test_array_line_is_flattened() {
        let stdout = r#"[{"Service":"redis"},{"Service":"pgadmin"}]"#;

        let listing = decode_status(stdout, StatusDecode::Strict).unwrap();

        assert_eq!(listing.services.len(), 2);
        assert_eq!(listing.services[1].service_name(), Some("pgadmin"));
    }

    #[test]
    fn test_crlf_line_endings() {
        let listing = decode_status("{\"a\":1}\r\n{\"b\":2}\r\n", StatusDecode::Strict).unwrap();
        assert_eq!(listing.services.len(), 2);
    }
}
