//! Parsing of label tokens into service descriptors.
//!
//! A token has the shape `<kindPrefix>-<version>-<name>`, for example
//! `mysql-8.0-orders` or `kafka-7.4-events`. The kind is picked by prefix
//! match on the first segment.

use environment_provider_sdk::ServiceKind;

const SEGMENT_DELIMITER: char = '-';

/// Segments expected for every recognized kind: `[kindPrefix, version, name]`.
const EXPECTED_SEGMENTS: usize = 3;

/// A parsed, immutable request for one service instance.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ServiceDescriptor {
    pub kind: ServiceKind,
    pub version: String,
    pub name: String,
}

/// Outcome of parsing a single label token.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ParsedToken {
    Valid(ServiceDescriptor),
    /// The prefix matched a known kind but the token does not have the
    /// expected shape.
    Malformed { kind: ServiceKind, reason: String },
    /// The prefix does not name a supported kind.
    Unknown,
}

impl ServiceDescriptor {
    #[must_use]
    pub fn new(kind: ServiceKind, version: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            kind,
            version: version.into(),
            name: name.into(),
        }
    }

    /// Parse a label token. Never fails: unsupported and malformed tokens are
    /// reported through the returned variant.
    #[must_use]
    pub fn parse(token: &str) -> ParsedToken {
        let segments: Vec<&str> = token.split(SEGMENT_DELIMITER).collect();

        let Some(kind) = segments.first().copied().and_then(kind_for_prefix) else {
            return ParsedToken::Unknown;
        };

        if segments.len() != EXPECTED_SEGMENTS {
            return ParsedToken::Malformed {
                kind,
                reason: format!(
                    "expected {EXPECTED_SEGMENTS} '{SEGMENT_DELIMITER}'-separated segments, found {}",
                    segments.len()
                ),
            };
        }

        let (version, name) = (segments[1], segments[2]);
        if version.is_empty() {
            return ParsedToken::Malformed {
                kind,
                reason: "version segment is empty".to_owned(),
            };
        }
        if name.is_empty() {
            return ParsedToken::Malformed {
                kind,
                reason: "name segment is empty".to_owned(),
            };
        }

        ParsedToken::Valid(Self::new(kind, version, name))
    }
}

fn kind_for_prefix(prefix: &str) -> Option<ServiceKind> {
    if prefix.starts_with("mysql") {
        Some(ServiceKind::RelationalDatabase)
    } else if prefix.starts_with("kafka") {
        Some(ServiceKind::MessageBroker)
    } else {
        None
    }
}
