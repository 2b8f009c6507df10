//! Resolution query model.

use serde::{Deserialize, Serialize};

/// Discriminators describing the work an agent is about to perform.
///
/// All fields are optional; a query with no discriminators set matches
/// nothing. Built with `with_*` methods:
///
/// ```
/// use briefer::ResolveQuery;
///
/// let query = ResolveQuery::new()
///     .with_task("fix broken imports")
///     .with_package("billing-engine");
/// assert!(!query.is_empty());
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ResolveQuery {
    /// Free-text description of the task.
    pub task: Option<String>,
    /// Name of the package being worked on.
    pub package_name: Option<String>,
    /// Problem domain label.
    pub domain: Option<String>,
    /// An error message or pattern being investigated.
    pub error_pattern: Option<String>,
}

impl ResolveQuery {
    /// Creates an empty query.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the task description.
    #[must_use]
    pub fn with_task(mut self, task: impl Into<String>) -> Self {
        self.task = Some(task.into());
        self
    }

    /// Sets the package name.
    #[must_use]
    pub fn with_package(mut self, package_name: impl Into<String>) -> Self {
        self.package_name = Some(package_name.into());
        self
    }

    /// Sets the domain label.
    #[must_use]
    pub fn with_domain(mut self, domain: impl Into<String>) -> Self {
        self.domain = Some(domain.into());
        self
    }

    /// Sets the error pattern.
    #[must_use]
    pub fn with_error_pattern(mut self, error_pattern: impl Into<String>) -> Self {
        self.error_pattern = Some(error_pattern.into());
        self
    }

    /// Returns true if no discriminator is set.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.task.is_none()
            && self.package_name.is_none()
            && self.domain.is_none()
            && self.error_pattern.is_none()
    }
}
