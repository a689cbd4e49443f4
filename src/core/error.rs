//! Error type shared by ingestion, segmentation and file IO.

use thiserror::Error;

/// Which end of an edge failed to resolve.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Endpoint {
    Source,
    Target,
}

impl std::fmt::Display for Endpoint {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Endpoint::Source => f.write_str("source"),
            Endpoint::Target => f.write_str("target"),
        }
    }
}

#[derive(Error, Debug)]
pub enum LayoutError {
    /// An edge names a node that is not in the node set.
    #[error("edge {edge}: {endpoint} '{reference}' does not resolve to a node")]
    UnknownNode {
        edge: usize,
        endpoint: Endpoint,
        reference: String,
    },

    /// Two nodes share an id, so id references would be ambiguous.
    #[error("duplicate node id '{0}'")]
    DuplicateNode(String),

    #[error("config error: {0}")]
    Config(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl LayoutError {
    pub fn unknown_node(edge: usize, endpoint: Endpoint, reference: impl Into<String>) -> Self {
        LayoutError::UnknownNode {
            edge,
            endpoint,
            reference: reference.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unknown_node_message_names_edge_and_endpoint() {
        let err = LayoutError::unknown_node(3, Endpoint::Target, "n42");
        assert_eq!(
            err.to_string(),
            "edge 3: target 'n42' does not resolve to a node"
        );
    }

    #[test]
    fn json_errors_convert() {
        let parse: Result<serde_json::Value, _> = serde_json::from_str("{");
        let err: LayoutError = parse.unwrap_err().into();
        assert!(matches!(err, LayoutError::Json(_)));
    }
}
