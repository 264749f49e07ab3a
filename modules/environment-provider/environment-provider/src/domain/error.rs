use std::error::Error as StdError;

use environment_provider_sdk::{EnvironmentError, ServiceKind};

/// Domain-level errors for the environment provider
#[derive(Debug, thiserror::Error)]
pub enum DomainError {
    #[error("failed to provision {kind} '{name}' (version {version})")]
    Provisioning {
        kind: ServiceKind,
        name: String,
        version: String,
        #[source]
        source: anyhow::Error,
    },

    #[error("{kind} provisioner cannot export the endpoint of instance '{name}'")]
    EndpointMismatch { kind: ServiceKind, name: String },

    /// The task running a creation panicked or was torn down with the runtime.
    #[error("service creation task did not complete")]
    CreationAborted(#[from] tokio::task::JoinError),

    /// Umbrella error for a recognized token that could not be turned into
    /// a property source. Aborts the whole document.
    #[error("failed to construct environment for token '{token}'")]
    ConstructionFailure {
        token: String,
        #[source]
        source: Box<DomainError>,
    },
}

impl DomainError {
    #[must_use]
    pub fn construction_failure(token: impl Into<String>, source: DomainError) -> Self {
        Self::ConstructionFailure {
            token: token.into(),
            source: Box::new(source),
        }
    }

    /// Render the error together with every cause, outermost first.
    #[must_use]
    pub fn chain_message(&self) -> String {
        let mut message = self.to_string();
        let mut cause = self.source();
        while let Some(err) = cause {
            message.push_str(": ");
            message.push_str(&err.to_string());
            cause = err.source();
        }
        message
    }
}

impl From<DomainError> for EnvironmentError {
    fn from(e: DomainError) -> Self {
        match &e {
            DomainError::ConstructionFailure { token, .. } => {
                Self::construction_failed(token.clone(), e.chain_message())
            }
            DomainError::Provisioning { .. }
            | DomainError::EndpointMismatch { .. }
            | DomainError::CreationAborted(_) => Self::Internal,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn construction_failure_carries_the_whole_cause_chain() {
        let err = DomainError::construction_failure(
            "mysql-8.0-orders",
            DomainError::Provisioning {
                kind: ServiceKind::RelationalDatabase,
                name: "orders".to_owned(),
                version: "8.0".to_owned(),
                source: anyhow::anyhow!("image pull failed"),
            },
        );

        let message = err.chain_message();
        assert!(message.starts_with("failed to construct environment for token 'mysql-8.0-orders'"));
        assert!(message.contains("failed to provision relational-database 'orders'"));
        assert!(message.ends_with("image pull failed"));

        match EnvironmentError::from(err) {
            EnvironmentError::ConstructionFailed { token, message } => {
                assert_eq!(token, "mysql-8.0-orders");
                assert!(message.contains("image pull failed"));
            }
            EnvironmentError::Internal => panic!("expected a construction failure"),
        }
    }

    #[test]
    fn bare_provisioning_error_maps_to_internal() {
        let err = DomainError::EndpointMismatch {
            kind: ServiceKind::MessageBroker,
            name: "events".to_owned(),
        };
        assert!(matches!(EnvironmentError::from(err), EnvironmentError::Internal));
    }
}
