use lazy_static::lazy_static;
use regex::Regex;
use uuid::Uuid;

use crate::core::error::{AppError, Result};

lazy_static! {
    /// Header part of a data URI (everything before the first comma)
    /// - Valid: "data:image/png;base64", "data:application/pdf", "data:text/csv;charset=utf-8;base64"
    /// - Invalid: "image/png;base64", "data:;base64", "data:application"
    pub static ref DATA_URI_HEADER_REGEX: Regex = Regex::new(
        r"^data:(?P<mime>[A-Za-z0-9!#$&^_.+-]+/[A-Za-z0-9!#$&^_.+-]+)(?P<params>(?:;[^;,]*)*)$"
    )
    .unwrap();

    /// File extension taken from an image subtype
    /// - Valid: "heic", "x-portable-bitmap", "jxl"
    /// - Invalid: "../x", "svg+xml", "Heic", ""
    pub static ref IMAGE_EXTENSION_REGEX: Regex = Regex::new(r"^[a-z0-9][a-z0-9-]{0,19}$").unwrap();

    /// Username for the bootstrap admin account
    /// - Valid: "admin", "site_admin", "_ops"
    /// - Invalid: "1admin", "admin user", "admin-user"
    pub static ref USERNAME_REGEX: Regex = Regex::new(r"^[a-zA-Z_][a-zA-Z0-9_]*$").unwrap();
}

/// Parse a path identifier, failing with `InvalidArgument` when it is malformed.
///
/// `label` names the entity in the error message ("news", "document", ...).
pub fn parse_entity_id(raw: &str, label: &str) -> Result<Uuid> {
    Uuid::parse_str(raw).map_err(|_| AppError::InvalidArgument(format!("Invalid {} ID", label)))
}

/// Extract the lower-cased MIME type from a data URI header
pub fn data_uri_mime(header: &str) -> Option<String> {
    DATA_URI_HEADER_REGEX
        .captures(header)
        .and_then(|caps| caps.name("mime"))
        .map(|m| m.as_str().to_ascii_lowercase())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_data_uri_header_valid() {
        assert!(DATA_URI_HEADER_REGEX.is_match("data:image/png;base64"));
        assert!(DATA_URI_HEADER_REGEX.is_match("data:application/pdf"));
        assert!(DATA_URI_HEADER_REGEX.is_match("data:text/csv;charset=utf-8;base64"));
        assert!(DATA_URI_HEADER_REGEX.is_match(
            "data:application/vnd.openxmlformats-officedocument.wordprocessingml.document;base64"
        ));
    }

    #[test]
    fn test_data_uri_header_invalid() {
        assert!(!DATA_URI_HEADER_REGEX.is_match("image/png;base64")); // no scheme
        assert!(!DATA_URI_HEADER_REGEX.is_match("data:;base64")); // no mime
        assert!(!DATA_URI_HEADER_REGEX.is_match("data:application")); // no subtype
        assert!(!DATA_URI_HEADER_REGEX.is_match("")); // empty
    }

    #[test]
    fn test_data_uri_mime_is_lowercased() {
        assert_eq!(
            data_uri_mime("data:Image/PNG;base64"),
            Some("image/png".to_string())
        );
        assert_eq!(data_uri_mime("nonsense"), None);
    }

    #[test]
    fn test_image_extension_regex() {
        assert!(IMAGE_EXTENSION_REGEX.is_match("heic"));
        assert!(IMAGE_EXTENSION_REGEX.is_match("x-portable-bitmap"));
        assert!(!IMAGE_EXTENSION_REGEX.is_match("../x"));
        assert!(!IMAGE_EXTENSION_REGEX.is_match("svg+xml"));
        assert!(!IMAGE_EXTENSION_REGEX.is_match("Heic"));
        assert!(!IMAGE_EXTENSION_REGEX.is_match(""));
    }

    #[test]
    fn test_username_regex() {
        assert!(USERNAME_REGEX.is_match("admin"));
        assert!(USERNAME_REGEX.is_match("_ops"));
        assert!(!USERNAME_REGEX.is_match("1admin"));
        assert!(!USERNAME_REGEX.is_match("admin user"));
    }

    #[test]
    fn test_parse_entity_id() {
        let id = Uuid::now_v7();
        assert_eq!(parse_entity_id(&id.to_string(), "news").unwrap(), id);

        let err = parse_entity_id("not-an-id", "station").unwrap_err();
        assert!(matches!(err, AppError::InvalidArgument(ref msg) if msg == "Invalid station ID"));
    }
}
