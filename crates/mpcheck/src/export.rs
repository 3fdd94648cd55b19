//! JSON export of a finished run.

use serde::Serialize;

use crate::{
    error::CheckError,
    ledger::ErrorLedger,
    projection::{graph::UsageGraph, hierarchy::HierarchyNode},
};

/// Everything a static report needs, in one serializable document.
#[derive(Debug, Serialize)]
pub struct ReportDocument<'r> {
    pub hierarchy: HierarchyNode,
    pub graph: UsageGraph,
    pub errors: &'r ErrorLedger,
}

impl ReportDocument<'_> {
    /// Pretty-printed JSON.
    ///
    /// # Errors
    ///
    /// Returns [`CheckError::Report`] if serialization fails.
    pub fn to_json(&self) -> Result<String, CheckError> {
        serde_json::to_string_pretty(self).map_err(|err| CheckError::Report(err.to_string()))
    }
}
