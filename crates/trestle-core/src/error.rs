//! Error taxonomy shared across the workbench.

use thiserror::Error;

use crate::qualifier::Qualifier;
use crate::types::AppSymbolicName;

/// A capability failed validation at registration.
///
/// Fatal for the capability; surfaced to the declaring application's developer.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("[{surface}DefinitionError] {message} [app={app}, qualifier={qualifier}]")]
pub struct DefinitionError {
    /// Surface label, e.g. `Dialog`.
    pub surface: String,
    /// Application that declared the capability.
    pub app: AppSymbolicName,
    /// Qualifier of the offending capability.
    pub qualifier: Qualifier,
    /// What is wrong and how to fix it.
    pub message: String,
}

impl DefinitionError {
    /// Create a definition error.
    #[must_use]
    pub fn new(
        surface: impl Into<String>,
        app: AppSymbolicName,
        qualifier: Qualifier,
        message: impl Into<String>,
    ) -> Self {
        Self {
            surface: surface.into(),
            app,
            qualifier,
            message: message.into(),
        }
    }
}

/// An intent could not be resolved to a capability.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ResolutionError {
    /// No visible capability matches the intent.
    #[error(
        "[NullProviderError] No application found to provide a capability of type '{intent_type}' and qualifier '{qualifier}'. Maybe, the capability is not public or the providing application is not available. [app={app}]"
    )]
    NoCapability {
        /// Requested type.
        intent_type: String,
        /// Requested qualifier.
        qualifier: Qualifier,
        /// Requesting application.
        app: AppSymbolicName,
    },

    /// More than one capability matches a surface intent.
    #[error(
        "[AmbiguousProviderError] {count} capabilities of type '{intent_type}' match qualifier '{qualifier}'; exactly one is required. [providers={providers}]"
    )]
    Ambiguous {
        /// Requested type.
        intent_type: String,
        /// Requested qualifier.
        qualifier: Qualifier,
        /// Number of matching capabilities.
        count: usize,
        /// Comma-separated list of providing applications.
        providers: String,
    },

    /// The requesting application has not declared a matching intention.
    #[error(
        "[NotQualifiedError] Application '{app}' is not qualified to issue intents of type '{intent_type}' and qualifier '{qualifier}'. Ensure to have declared an intention in the application's manifest."
    )]
    NotQualified {
        /// Requesting application.
        app: AppSymbolicName,
        /// Requested type.
        intent_type: String,
        /// Requested qualifier.
        qualifier: Qualifier,
    },

    /// The intent is missing required parameters.
    #[error("[ParamMismatchError] Intent is missing required params {names:?} of capability '{capability_id}'.")]
    MissingParams {
        /// Resolved capability id.
        capability_id: String,
        /// Missing parameter names.
        names: Vec<String>,
    },

    /// The intent passes parameters the capability does not declare.
    #[error("[ParamMismatchError] Intent contains unexpected params {names:?} for capability '{capability_id}'.")]
    UnexpectedParams {
        /// Resolved capability id.
        capability_id: String,
        /// Unexpected parameter names.
        names: Vec<String>,
    },
}

/// Embedding a surface into its outlet failed.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum NavigationError {
    /// A route guard rejected the navigation.
    #[error("[NavigationError] Route guard rejected navigation of outlet '{outlet}' to '{target}'.")]
    GuardRejected {
        /// Outlet being navigated.
        outlet: String,
        /// Navigation target.
        target: String,
    },

    /// No host route is paired with the capability's guard.
    #[error(
        "[NavigationError] No route of the host application matches {surface} capability '{qualifier}'. Add a route with empty path and the guard `{guard}` to the host's route table."
    )]
    NoMatchingRoute {
        /// Surface label.
        surface: String,
        /// Qualifier of the capability.
        qualifier: Qualifier,
        /// Guard expression the route must declare.
        guard: String,
    },

    /// Navigation failed for another reason.
    #[error("[NavigationError] Failed to navigate outlet '{outlet}': {reason}")]
    Failed {
        /// Outlet being navigated.
        outlet: String,
        /// Failure description.
        reason: String,
    },
}

/// A message could not be published because the bus was torn down.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("message bus disposed, cannot publish to '{topic}'")]
pub struct TransportTeardownError {
    /// Topic of the undeliverable message.
    pub topic: String,
}

/// Any workbench-level failure.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum WorkbenchError {
    /// Capability definition error.
    #[error(transparent)]
    Definition(#[from] DefinitionError),

    /// Intent resolution error.
    #[error(transparent)]
    Resolution(#[from] ResolutionError),

    /// Surface navigation error.
    #[error(transparent)]
    Navigation(#[from] NavigationError),

    /// Transport teardown.
    #[error(transparent)]
    TransportTeardown(#[from] TransportTeardownError),
}

/// Result type for workbench operations.
pub type WorkbenchResult<T> = Result<T, WorkbenchError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_definition_error_display() {
        let err = DefinitionError::new(
            "Dialog",
            AppSymbolicName::new("contacts"),
            Qualifier::new().with("component", "contact"),
            "Dialog capability requires the 'size' property.",
        );
        assert_eq!(
            err.to_string(),
            r#"[DialogDefinitionError] Dialog capability requires the 'size' property. [app=contacts, qualifier={"component":"contact"}]"#
        );
    }

    #[test]
    fn test_no_matching_route_names_guard() {
        let err = NavigationError::NoMatchingRoute {
            surface: "Dialog".into(),
            qualifier: Qualifier::new().with("component", "about"),
            guard: r#"canMatchWorkbenchDialogCapability({"component":"about"})"#.into(),
        };
        assert!(
            err.to_string()
                .contains(r#"canMatchWorkbenchDialogCapability({"component":"about"})"#)
        );
    }

    #[test]
    fn test_workbench_error_from() {
        let err: WorkbenchError = TransportTeardownError {
            topic: "a/b".into(),
        }
        .into();
        assert!(matches!(err, WorkbenchError::TransportTeardown(_)));
    }
}
