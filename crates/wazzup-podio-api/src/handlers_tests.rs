//! Tests for request body parsing helpers.

use super::*;

mod parse_json_body_tests {
    use super::*;

    /// Verify that empty and whitespace-only bodies are rejected as empty.
    #[test]
    fn test_empty_body() {
        assert!(matches!(parse_json_body(b""), Err(HandlerError::EmptyBody)));
        assert!(matches!(
            parse_json_body(b"  \n"),
            Err(HandlerError::EmptyBody)
        ));
    }

    /// Verify that empty JSON values count as no data.
    #[test]
    fn test_empty_json_values() {
        for body in [&b"{}"[..], &b"[]"[..], &b"null"[..], &b"\"\""[..]] {
            assert!(
                matches!(parse_json_body(body), Err(HandlerError::EmptyBody)),
                "{:?} should be rejected",
                String::from_utf8_lossy(body)
            );
        }
    }

    /// Verify that malformed JSON is reported as invalid.
    #[test]
    fn test_invalid_json() {
        assert!(matches!(
            parse_json_body(b"{not json"),
            Err(HandlerError::InvalidJson { .. })
        ));
    }

    /// Verify that non-empty JSON is returned as parsed.
    #[test]
    fn test_valid_json() {
        let value = parse_json_body(br#"{"type":"item.update"}"#).unwrap();
        assert_eq!(value["type"], "item.update");
    }
}

mod required_field_tests {
    use super::*;

    /// Verify that missing, empty and blank values are rejected.
    #[test]
    fn test_rejects_missing_and_blank() {
        assert!(required_field(None, "text").is_err());
        assert!(required_field(Some(""), "text").is_err());
        assert!(required_field(Some("   "), "text").is_err());
    }

    /// Verify that the value is returned untrimmed.
    #[test]
    fn test_keeps_value() {
        assert_eq!(required_field(Some(" hi "), "text").unwrap(), " hi ");
    }
}
