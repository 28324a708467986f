//! Structured records produced by the extraction collaborator.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Which records page a document came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DocumentKind {
    /// Class schedule for one academic session.
    Schedule,
    /// Examination results for one academic session.
    Result,
}

impl fmt::Display for DocumentKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DocumentKind::Schedule => write!(f, "schedule"),
            DocumentKind::Result => write!(f, "result"),
        }
    }
}

/// One entry in a records page's session picker.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AcademicSession {
    /// Display name, e.g. `"Sem 1, 2023/2024"`.
    pub name: String,
    /// Query suffix selecting the session, e.g. `"?ses=2023/2024&sem=1"`.
    pub query: String,
}

/// Extracted records for one academic session.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StructuredDocument {
    /// Source page kind.
    pub kind: DocumentKind,
    /// Session display name.
    pub session_name: String,
    /// Session query suffix.
    pub session_query: String,
    /// Extracted content; shape is owned by the extractor.
    pub body: serde_json::Value,
}
