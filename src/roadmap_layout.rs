use std::collections::HashMap;

use crate::config::LayoutConfig;
use crate::display_width::wrap_label;
use crate::roadmap_ast::*;
use crate::roadmap_parser::classify;

pub const HEADER_RANK_ID: &str = "phase_header_rank_group";
pub const HEADER_GROUP: &str = "phase_headers_group";
pub const TOTAL_CLUSTER_ID: &str = "cluster_total_time_bottom";

/// Rank-constrained description of a roadmap diagram, ready for export.
#[derive(Debug, Clone, PartialEq)]
pub struct DiagramPlan {
    /// Every node except the total-time node, in first-seen order.
    pub nodes: Vec<PlannedNode>,
    pub header_rank: Option<HeaderRank>,
    pub clusters: Vec<PhaseCluster>,
    pub edges: Vec<PlannedEdge>,
    pub total: Option<TotalPin>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct PlannedNode {
    pub id: String,
    pub label: String,
    pub style: NodeStyle,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NodeStyle {
    Default,
    PhaseHeader,
    EstimatedTime,
    TotalTime,
}

/// Phase headers forced onto one rank, ordered left to right by phase number.
#[derive(Debug, Clone, PartialEq)]
pub struct HeaderRank {
    pub node_ids: Vec<String>,
    pub guides: Vec<PlannedEdge>,
}

/// Content of one phase, stacked vertically beneath its header.
#[derive(Debug, Clone, PartialEq)]
pub struct PhaseCluster {
    pub id: String,
    pub label: String,
    pub node_ids: Vec<String>,
    pub guides: Vec<PlannedEdge>,
    pub anchor: PlannedEdge,
}

#[derive(Debug, Clone, PartialEq)]
pub struct PlannedEdge {
    pub from_id: String,
    pub to_id: String,
    pub kind: EdgeKind,
    pub ltail: Option<String>,
    pub lhead: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EdgeKind {
    /// Visible and ranked.
    Normal,
    /// Visible but ignored when assigning ranks.
    Soft,
    /// Invisible and ignored when assigning ranks.
    HiddenSoft,
    /// Invisible, only there to steer ranking and ordering.
    Guide,
}

/// The total-time node pinned to the bottom rank.
#[derive(Debug, Clone, PartialEq)]
pub struct TotalPin {
    pub node: PlannedNode,
    pub cluster_id: String,
    pub link: Option<PlannedEdge>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum Region {
    HeaderRank,
    Cluster(String),
}

impl Region {
    fn cluster_id(&self) -> Option<String> {
        match self {
            Region::HeaderRank => None,
            Region::Cluster(id) => Some(id.clone()),
        }
    }
}

impl NodeStyle {
    fn of(label: &str) -> Self {
        match classify(label) {
            NodeKind::PhaseHeader(_) => NodeStyle::PhaseHeader,
            NodeKind::EstimatedTime => NodeStyle::EstimatedTime,
            NodeKind::TotalTime => NodeStyle::TotalTime,
            NodeKind::Content => NodeStyle::Default,
        }
    }
}

impl PlannedEdge {
    fn new(from_id: &str, to_id: &str, kind: EdgeKind) -> Self {
        Self {
            from_id: from_id.to_string(),
            to_id: to_id.to_string(),
            kind,
            ltail: None,
            lhead: None,
        }
    }

    fn guide(from_id: &str, to_id: &str) -> Self {
        Self::new(from_id, to_id, EdgeKind::Guide)
    }

    pub fn is_visible(&self) -> bool {
        matches!(self.kind, EdgeKind::Normal | EdgeKind::Soft)
    }
}

pub fn plan(graph: &RoadmapGraph, config: &LayoutConfig) -> DiagramPlan {
    let ids: HashMap<&str, String> = graph
        .nodes
        .iter()
        .enumerate()
        .map(|(i, label)| (label.as_str(), format!("n{i}")))
        .collect();
    let total_label = graph
        .nodes
        .iter()
        .find(|n| classify(n) == NodeKind::TotalTime)
        .map(String::as_str);

    let planned = |label: &str| PlannedNode {
        id: ids[label].clone(),
        label: wrap_label(label, config.wrap_width),
        style: NodeStyle::of(label),
    };

    let nodes: Vec<PlannedNode> = graph
        .nodes
        .iter()
        .map(String::as_str)
        .filter(|label| Some(*label) != total_label)
        .map(planned)
        .collect();

    let mut headers: Vec<(PhaseNumber, &str)> = graph
        .nodes
        .iter()
        .filter_map(|label| match classify(label) {
            NodeKind::PhaseHeader(n) => Some((n, label.as_str())),
            _ => None,
        })
        .collect();
    headers.sort_by(|(a, _), (b, _)| a.cmp(b));

    let mut regions: HashMap<&str, Region> = headers
        .iter()
        .map(|(_, label)| (*label, Region::HeaderRank))
        .collect();

    let header_rank = if headers.is_empty() {
        None
    } else {
        let node_ids: Vec<String> = headers.iter().map(|(_, l)| ids[l].clone()).collect();
        let guides = node_ids
            .windows(2)
            .map(|pair| PlannedEdge::guide(&pair[0], &pair[1]))
            .collect();
        Some(HeaderRank { node_ids, guides })
    };

    let mut clusters = Vec::new();
    for phase in &graph.phases {
        let Some(header_id) = ids.get(phase.header.as_str()) else {
            continue;
        };
        let node_ids: Vec<String> = phase
            .content
            .iter()
            .filter_map(|label| ids.get(label.as_str()).cloned())
            .collect();
        let Some(first) = node_ids.first() else {
            continue;
        };

        let cluster_id = format!("cluster_content_for_{header_id}");
        for label in &phase.content {
            regions
                .entry(label.as_str())
                .or_insert_with(|| Region::Cluster(cluster_id.clone()));
        }
        let anchor = PlannedEdge {
            lhead: Some(cluster_id.clone()),
            ..PlannedEdge::guide(header_id, first)
        };
        let guides = node_ids
            .windows(2)
            .map(|pair| PlannedEdge::guide(&pair[0], &pair[1]))
            .collect();
        clusters.push(PhaseCluster {
            id: cluster_id,
            label: format!("{} Content", phase.header),
            node_ids,
            guides,
            anchor,
        });
    }

    let mut edges = Vec::new();
    for edge in &graph.edges {
        if total_label.is_some_and(|total| edge.touches(total)) {
            continue;
        }
        let (Some(from_id), Some(to_id)) =
            (ids.get(edge.from.as_str()), ids.get(edge.to.as_str()))
        else {
            continue;
        };
        let from_region = regions.get(edge.from.as_str());
        let to_region = regions.get(edge.to.as_str());
        let planned_edge = match (from_region, to_region) {
            (Some(from_region), Some(to_region)) if from_region != to_region => {
                let into_header = matches!(classify(&edge.to), NodeKind::PhaseHeader(_));
                let from_estimate = classify(&edge.from) == NodeKind::EstimatedTime;
                let kind = if into_header && from_estimate {
                    EdgeKind::HiddenSoft
                } else {
                    EdgeKind::Soft
                };
                PlannedEdge {
                    ltail: from_region.cluster_id(),
                    lhead: to_region.cluster_id(),
                    ..PlannedEdge::new(from_id, to_id, kind)
                }
            }
            _ => PlannedEdge::new(from_id, to_id, EdgeKind::Normal),
        };
        edges.push(planned_edge);
    }

    let total = total_label.map(|label| {
        let node = planned(label);
        let link = graph
            .edges
            .iter()
            .find(|e| e.to == label && classify(&e.from) == NodeKind::EstimatedTime)
            .and_then(|e| {
                let from_id = ids.get(e.from.as_str())?;
                Some(PlannedEdge {
                    ltail: regions.get(e.from.as_str()).and_then(Region::cluster_id),
                    lhead: Some(TOTAL_CLUSTER_ID.to_string()),
                    ..PlannedEdge::new(from_id, &node.id, EdgeKind::HiddenSoft)
                })
            });
        TotalPin {
            node,
            cluster_id: TOTAL_CLUSTER_ID.to_string(),
            link,
        }
    });

    tracing::debug!(
        nodes = nodes.len(),
        clusters = clusters.len(),
        edges = edges.len(),
        pinned_total = total.is_some(),
        "planned roadmap diagram"
    );

    DiagramPlan {
        nodes,
        header_rank,
        clusters,
        edges,
        total,
    }
}
