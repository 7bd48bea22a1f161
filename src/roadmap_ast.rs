use std::cmp::Ordering;
use std::collections::HashSet;
use std::fmt;

use serde::{Serialize, Serializer};

/// Separator between hierarchy levels on a roadmap line.
pub const DELIMITER: char = '>';

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RoadmapGraph {
    pub nodes: Vec<String>,
    pub edges: Vec<Edge>,
    pub summary: String,
    #[serde(skip)]
    pub phases: Vec<Phase>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Edge {
    pub from: String,
    pub to: String,
    pub origin: EdgeOrigin,
}

/// How an edge came to exist.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EdgeOrigin {
    /// Consecutive segments of one input line.
    Line,
    /// Last node of a phase to the header of the next phase.
    PhaseBridge,
    /// Final estimated-time node to the total-time node.
    TotalLink,
}

/// One `Phase N: ...` grouping and the labels that belong to it.
#[derive(Debug, Clone, PartialEq)]
pub struct Phase {
    pub number: PhaseNumber,
    /// Start node of the phase; the last header line seen for this number wins.
    pub header: String,
    /// Non-header, non-total labels in first-seen order. A label belongs to the
    /// first phase it appears in.
    pub content: Vec<String>,
    /// Last node of the final line seen while this phase was current.
    pub exit: Option<String>,
}

/// Decimal phase number of any length, ordered by numeric value.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct PhaseNumber(String);

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NodeKind {
    PhaseHeader(PhaseNumber),
    EstimatedTime,
    TotalTime,
    Content,
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("edge {from:?} -> {to:?} references unknown node {missing:?}")]
pub struct GraphError {
    pub from: String,
    pub to: String,
    pub missing: String,
}

impl PhaseNumber {
    /// Expects ASCII digits; leading zeros are dropped.
    pub fn from_digits(digits: &str) -> Self {
        let trimmed = digits.trim_start_matches('0');
        if trimmed.is_empty() {
            Self("0".to_string())
        } else {
            Self(trimmed.to_string())
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Ord for PhaseNumber {
    fn cmp(&self, other: &Self) -> Ordering {
        self.0
            .len()
            .cmp(&other.0.len())
            .then_with(|| self.0.cmp(&other.0))
    }
}

impl PartialOrd for PhaseNumber {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl fmt::Display for PhaseNumber {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl Edge {
    pub fn new(from: impl Into<String>, to: impl Into<String>, origin: EdgeOrigin) -> Self {
        Self {
            from: from.into(),
            to: to.into(),
            origin,
        }
    }

    pub fn touches(&self, label: &str) -> bool {
        self.from == label || self.to == label
    }
}

// Edges go over the wire as plain `[from, to]` pairs.
impl Serialize for Edge {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        (&self.from, &self.to).serialize(serializer)
    }
}

impl RoadmapGraph {
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty() && self.edges.is_empty()
    }

    pub fn has_edge(&self, from: &str, to: &str) -> bool {
        self.edges.iter().any(|e| e.from == from && e.to == to)
    }

    /// Every edge endpoint must be a member of the node set.
    pub fn validate(&self) -> Result<(), GraphError> {
        let known: HashSet<&str> = self.nodes.iter().map(String::as_str).collect();
        for edge in &self.edges {
            for endpoint in [&edge.from, &edge.to] {
                if !known.contains(endpoint.as_str()) {
                    return Err(GraphError {
                        from: edge.from.clone(),
                        to: edge.to.clone(),
                        missing: endpoint.clone(),
                    });
                }
            }
        }
        Ok(())
    }
}
