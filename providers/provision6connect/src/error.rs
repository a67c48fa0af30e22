//! Provider-specific error types.
//!
//! Every failure of a provider operation is a `ProviderError`. Errors are never
//! retried and never downgraded to warnings; the host adapter renders them as
//! error diagnostics through [`ProviderError::to_diagnostic`].

use crate::diagnostics::Diagnostic;
use provision_client::ProVisionError;
use thiserror::Error;

/// Errors that can occur in the ProVision provider.
#[derive(Debug, Error)]
pub enum ProviderError {
    /// None of a set of mutually exclusive identifiers was given
    #[error("Either {} are required", .accepted.join(" or "))]
    MissingSelector { accepted: Vec<&'static str> },

    /// ProVision rejected or failed a call; the message is passed through verbatim
    #[error("{action}: {source}")]
    Upstream {
        action: String,
        #[source]
        source: ProVisionError,
    },

    /// A read matched no remote entity
    #[error("{0}")]
    NotFound(String),

    /// A connection parameter is missing or empty
    #[error(
        "Missing 6connect ProVision {attribute}: set the {attribute} value in the configuration \
         or use the {env_var} environment variable. If either is already set, ensure the value is not empty."
    )]
    Configuration {
        attribute: &'static str,
        env_var: &'static str,
    },

    /// A required attribute is absent from the payload
    #[error("Missing required attribute: {0}")]
    MissingAttribute(&'static str),

    /// The payload does not decode into the declared schema
    #[error("Invalid payload: {0}")]
    InvalidPayload(#[from] serde_json::Error),

    /// Import identifier has the wrong shape
    #[error("Unexpected import identifier {id:?}, expected {expected}")]
    InvalidImportId { id: String, expected: &'static str },

    /// No resource or data source is registered under the type name
    #[error("Unknown {kind} type: {type_name}")]
    UnknownType { kind: &'static str, type_name: String },

    /// The type does not implement the requested operation
    #[error("{type_name} does not support {operation}")]
    UnsupportedOperation {
        type_name: String,
        operation: &'static str,
    },
}

impl ProviderError {
    /// Wrap a client failure that happened while performing `action`.
    ///
    /// A client-side not-found becomes [`ProviderError::NotFound`] so missing
    /// entities are reported the same way whether ProVision answered 404 or an
    /// empty list.
    pub fn upstream(action: impl Into<String>, source: ProVisionError) -> Self {
        match source {
            ProVisionError::NotFound(message) => {
                ProviderError::NotFound(format!("{}: {}", action.into(), message))
            }
            source => ProviderError::Upstream {
                action: action.into(),
                source,
            },
        }
    }

    /// Render as an error diagnostic
    pub fn to_diagnostic(&self) -> Diagnostic {
        match self {
            ProviderError::MissingSelector { .. } => {
                Diagnostic::error(self.to_string(), self.to_string())
            }
            ProviderError::Upstream { action, source } => {
                Diagnostic::error(action.clone(), source.to_string())
            }
            ProviderError::NotFound(message) => {
                Diagnostic::error("ProVision Entity Not Found", message.clone())
            }
            ProviderError::Configuration { attribute, .. } => Diagnostic::error(
                format!("Missing 6connect ProVision {}", attribute),
                self.to_string(),
            )
            .with_attribute(*attribute),
            ProviderError::MissingAttribute(attribute) => {
                Diagnostic::error("Missing Required Attribute", self.to_string())
                    .with_attribute(*attribute)
            }
            ProviderError::InvalidPayload(_) => {
                Diagnostic::error("Invalid Payload", self.to_string())
            }
            ProviderError::InvalidImportId { .. } => {
                Diagnostic::error("Unexpected Import Identifier", self.to_string())
            }
            ProviderError::UnknownType { .. } => {
                Diagnostic::error("Unknown Type", self.to_string())
            }
            ProviderError::UnsupportedOperation { .. } => {
                Diagnostic::error("Unsupported Operation", self.to_string())
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::diagnostics::Severity;

    #[test]
    fn test_missing_selector_names_every_alternative() {
        let err = ProviderError::MissingSelector {
            accepted: vec!["group_id", "server_id", "pool_id"],
        };
        assert_eq!(err.to_string(), "Either group_id or server_id or pool_id are required");
    }

    #[test]
    fn test_upstream_message_is_verbatim() {
        let err = ProviderError::upstream(
            "The Push Request has returned an error",
            ProVisionError::Api("POST /dhcp/push/group/42 failed: 500 - boom".to_string()),
        );
        let diagnostic = err.to_diagnostic();
        assert_eq!(diagnostic.severity, Severity::Error);
        assert_eq!(diagnostic.summary, "The Push Request has returned an error");
        assert_eq!(diagnostic.detail, "ProVision API error: POST /dhcp/push/group/42 failed: 500 - boom");
    }

    #[test]
    fn test_client_not_found_maps_to_not_found() {
        let err = ProviderError::upstream(
            "Could not read ProVision Netblock ID 7",
            ProVisionError::NotFound("Netblock 7 not found".to_string()),
        );
        assert!(matches!(err, ProviderError::NotFound(_)));
    }

    #[test]
    fn test_configuration_error_points_at_attribute() {
        let err = ProviderError::Configuration {
            attribute: "host",
            env_var: "PROVISION_HOST",
        };
        let diagnostic = err.to_diagnostic();
        assert_eq!(diagnostic.attribute.as_deref(), Some("host"));
        assert!(diagnostic.detail.contains("PROVISION_HOST"));
    }
}
