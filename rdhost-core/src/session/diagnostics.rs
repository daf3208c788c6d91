//! Status code tables for remote desktop engines
//!
//! Pure lookups from the integer codes an engine reports (disconnect
//! reasons, warnings, fatal errors) to descriptions and categories. Every
//! lookup is total: unmapped codes yield a placeholder that embeds the code.

use serde::Serialize;
use std::borrow::Cow;
use std::fmt;

/// Broad classification of a disconnect reason
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum DisconnectCategory {
    /// Expected termination, initiated locally, remotely or by the user
    Benign,
    /// DNS, socket or reachability failure
    Network,
    /// Credential, logon or licensing failure
    Authentication,
    /// Security negotiation or encryption failure
    Security,
    /// Resource exhaustion on either side
    Resource,
    /// Engine internal error
    Internal,
    /// Code not present in the table
    Unknown,
}

impl fmt::Display for DisconnectCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            DisconnectCategory::Benign => "benign",
            DisconnectCategory::Network => "network",
            DisconnectCategory::Authentication => "authentication",
            DisconnectCategory::Security => "security",
            DisconnectCategory::Resource => "resource",
            DisconnectCategory::Internal => "internal",
            DisconnectCategory::Unknown => "unknown",
        };
        f.write_str(name)
    }
}

/// Classification of an engine warning
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum WarningCategory {
    Certificate,
    Unknown,
}

impl fmt::Display for WarningCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            WarningCategory::Certificate => f.write_str("certificate"),
            WarningCategory::Unknown => f.write_str("unknown"),
        }
    }
}

use DisconnectCategory::{Authentication, Benign, Internal, Network, Resource, Security};

const DISCONNECT_REASONS: &[(i32, &str, DisconnectCategory)] = &[
    (0, "No error", Benign),
    (1, "Local disconnection", Benign),
    (2, "Remote disconnection by user", Benign),
    (3, "Remote disconnection by server / User initiated disconnect", Benign),
    (260, "DNS name lookup failure", Network),
    (262, "Out of memory", Resource),
    (264, "Connection timed out", Network),
    (516, "Internal error", Internal),
    (518, "Out of memory", Resource),
    (520, "Host not found", Network),
    (772, "Winsock error", Network),
    (1030, "Security error", Security),
    (1032, "Encryption error", Security),
    (1286, "License protocol error", Authentication),
    (2308, "The specified computer name contains invalid characters", Authentication),
    (2055, "Internal security error", Security),
    (2056, "Internal security error", Security),
    (2822, "Logon failure: unknown username or bad password", Authentication),
    (2825, "Account restriction prevents logon", Authentication),
    (3079, "Connection to remote PC lost", Network),
];

const WARNINGS: &[(i32, &str)] = &[
    (1, "Certificate warning"),
    (2, "Certificate name mismatch"),
    (3, "Certificate expired"),
];

const FATAL_ERRORS: &[(i32, &str)] = &[
    (0, "Internal error"),
    (1, "Protocol error"),
    (2, "Out of memory"),
    (3, "Control error"),
    (4, "Invalid parameter"),
];

fn lookup(table: &'static [(i32, &'static str)], code: i32) -> Option<&'static str> {
    table
        .iter()
        .find(|(known, _)| *known == code)
        .map(|(_, text)| *text)
}

/// Human readable text for a disconnect reason code
pub fn describe_disconnect(code: i32) -> Cow<'static, str> {
    DISCONNECT_REASONS
        .iter()
        .find(|(known, _, _)| *known == code)
        .map(|(_, text, _)| Cow::Borrowed(*text))
        .unwrap_or_else(|| Cow::Owned(format!("Unknown disconnect reason (code: {})", code)))
}

/// Category of a disconnect reason code
pub fn disconnect_category(code: i32) -> DisconnectCategory {
    DISCONNECT_REASONS
        .iter()
        .find(|(known, _, _)| *known == code)
        .map(|(_, _, category)| *category)
        .unwrap_or(DisconnectCategory::Unknown)
}

/// Human readable text for a warning code
pub fn describe_warning(code: i32) -> Cow<'static, str> {
    lookup(WARNINGS, code)
        .map(Cow::Borrowed)
        .unwrap_or_else(|| Cow::Owned(format!("Unknown warning (code: {})", code)))
}

/// Category of a warning code
pub fn warning_category(code: i32) -> WarningCategory {
    match lookup(WARNINGS, code) {
        Some(_) => WarningCategory::Certificate,
        None => WarningCategory::Unknown,
    }
}

/// Human readable text for a fatal error code
pub fn describe_fatal_error(code: i32) -> Cow<'static, str> {
    lookup(FATAL_ERRORS, code)
        .map(Cow::Borrowed)
        .unwrap_or_else(|| Cow::Owned(format!("Unknown error (code: {})", code)))
}

/// All disconnect codes with a table entry, in table order
pub fn known_disconnect_codes() -> impl Iterator<Item = i32> {
    DISCONNECT_REASONS.iter().map(|(code, _, _)| *code)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_known_disconnect_reasons() {
        assert_eq!(describe_disconnect(1), "Local disconnection");
        assert_eq!(describe_disconnect(264), "Connection timed out");
        assert_eq!(
            describe_disconnect(2308),
            "The specified computer name contains invalid characters"
        );
        assert_eq!(describe_disconnect(3079), "Connection to remote PC lost");
    }

    #[test]
    fn test_unknown_disconnect_embeds_code() {
        let text = describe_disconnect(4242);
        assert_eq!(text, "Unknown disconnect reason (code: 4242)");
        assert_eq!(disconnect_category(4242), DisconnectCategory::Unknown);
        assert!(describe_disconnect(-7).contains("-7"));
    }

    #[test]
    fn test_disconnect_categories() {
        assert_eq!(disconnect_category(0), DisconnectCategory::Benign);
        assert_eq!(disconnect_category(3), DisconnectCategory::Benign);
        assert_eq!(disconnect_category(520), DisconnectCategory::Network);
        assert_eq!(disconnect_category(516), DisconnectCategory::Internal);
        assert_eq!(disconnect_category(2822), DisconnectCategory::Authentication);
        assert_eq!(disconnect_category(2056), DisconnectCategory::Security);
        assert_eq!(disconnect_category(518), DisconnectCategory::Resource);
    }

    #[test]
    fn test_table_has_no_duplicate_codes() {
        let mut codes: Vec<i32> = known_disconnect_codes().collect();
        let total = codes.len();
        codes.sort_unstable();
        codes.dedup();
        assert_eq!(codes.len(), total);
        assert_eq!(total, 20);
    }

    #[test]
    fn test_warnings() {
        assert_eq!(describe_warning(2), "Certificate name mismatch");
        assert_eq!(warning_category(3), WarningCategory::Certificate);
        assert_eq!(describe_warning(9), "Unknown warning (code: 9)");
        assert_eq!(warning_category(9), WarningCategory::Unknown);
    }

    #[test]
    fn test_fatal_errors() {
        assert_eq!(describe_fatal_error(0), "Internal error");
        assert_eq!(describe_fatal_error(2), "Out of memory");
        assert_eq!(describe_fatal_error(4), "Invalid parameter");
        assert_eq!(describe_fatal_error(99), "Unknown error (code: 99)");
    }

    #[test]
    fn test_category_display() {
        assert_eq!(DisconnectCategory::Authentication.to_string(), "authentication");
        assert_eq!(WarningCategory::Certificate.to_string(), "certificate");
    }
}
