use std::collections::{BTreeMap, HashSet};

use winnow::prelude::*;
use winnow::ascii::{Caseless, space0, space1};
use winnow::combinator::separated;
use winnow::token::take_while;

use crate::roadmap_ast::*;

const TOTAL_MARKER: &str = "total estimated time";
const ESTIMATE_MARKER: &str = "estimated time";

/// Builds the roadmap graph from `>`-delimited text.
///
/// Never fails: lines without a delimiter become isolated nodes and blank
/// input yields an empty graph.
pub fn parse_roadmap(summary: &str) -> RoadmapGraph {
    let mut builder = GraphBuilder::default();
    let mut phases: BTreeMap<PhaseNumber, Phase> = BTreeMap::new();
    let mut claimed: HashSet<String> = HashSet::new();
    let mut current: Option<PhaseNumber> = None;

    for line in summary.lines().map(str::trim).filter(|l| !l.is_empty()) {
        let parts = split_line(line);
        let Some(first) = parts.first() else {
            continue;
        };

        for part in &parts {
            builder.add_node(part);
        }

        if let Some(number) = phase_number(first) {
            current = Some(number.clone());
            phases
                .entry(number.clone())
                .and_modify(|p| p.header = first.to_string())
                .or_insert_with(|| Phase {
                    number,
                    header: first.to_string(),
                    content: Vec::new(),
                    exit: None,
                });
        }

        for pair in parts.windows(2) {
            builder.add_edge(pair[0], pair[1], EdgeOrigin::Line);
        }

        let Some(phase) = current.as_ref().and_then(|n| phases.get_mut(n)) else {
            tracing::debug!(line, segments = parts.len(), "line outside any phase");
            continue;
        };
        for part in &parts {
            let owned = matches!(classify(part), NodeKind::Content | NodeKind::EstimatedTime);
            if owned && claimed.insert(part.to_string()) {
                phase.content.push(part.to_string());
            }
        }
        if let Some(last) = parts.last() {
            if *last != phase_label(&phase.number) {
                phase.exit = Some(last.to_string());
            }
        }
        tracing::debug!(line, segments = parts.len(), phase = %phase.number, "parsed line");
    }

    let phases: Vec<Phase> = phases.into_values().collect();
    builder.bridge_phases(&phases);
    builder.link_total_time();
    builder.finish(summary, phases)
}

/// Splits one line on the delimiter into trimmed, non-empty segments.
pub fn split_line(line: &str) -> Vec<&str> {
    let mut input = line;
    segments
        .parse_next(&mut input)
        .unwrap_or_default()
        .into_iter()
        .map(str::trim)
        .filter(|p| !p.is_empty())
        .collect()
}

/// Phase number of a `Phase <n>: <text>` label.
pub fn phase_number(label: &str) -> Option<PhaseNumber> {
    let mut input = label.trim();
    phase_header.parse_next(&mut input).ok()
}

pub fn classify(label: &str) -> NodeKind {
    let lower = label.to_lowercase();
    if lower.contains(TOTAL_MARKER) {
        NodeKind::TotalTime
    } else if let Some(n) = phase_number(label) {
        NodeKind::PhaseHeader(n)
    } else if lower.contains(ESTIMATE_MARKER) && !lower.contains("total") {
        NodeKind::EstimatedTime
    } else {
        NodeKind::Content
    }
}

fn phase_label(number: &PhaseNumber) -> String {
    format!("Phase {number}")
}

fn segments<'s>(input: &mut &'s str) -> winnow::Result<Vec<&'s str>> {
    separated(1.., take_while(0.., |c: char| c != DELIMITER), DELIMITER).parse_next(input)
}

fn phase_header(input: &mut &str) -> winnow::Result<PhaseNumber> {
    Caseless("phase").parse_next(input)?;
    space1.parse_next(input)?;
    let digits = take_while(1.., |c: char| c.is_ascii_digit()).parse_next(input)?;
    space0.parse_next(input)?;
    ':'.parse_next(input)?;
    space0.parse_next(input)?;
    take_while(1.., |_: char| true).parse_next(input)?;
    Ok(PhaseNumber::from_digits(digits))
}

#[derive(Default)]
struct GraphBuilder {
    nodes: Vec<String>,
    seen_nodes: HashSet<String>,
    edges: Vec<Edge>,
    seen_edges: HashSet<(String, String)>,
}

impl GraphBuilder {
    fn add_node(&mut self, label: &str) {
        if self.seen_nodes.insert(label.to_string()) {
            self.nodes.push(label.to_string());
        }
    }

    fn add_edge(&mut self, from: &str, to: &str, origin: EdgeOrigin) -> bool {
        if !self.seen_edges.insert((from.to_string(), to.to_string())) {
            return false;
        }
        self.edges.push(Edge::new(from, to, origin));
        true
    }

    fn bridge_phases(&mut self, phases: &[Phase]) {
        let exits: Vec<(&Phase, &str)> = phases
            .iter()
            .filter_map(|p| p.exit.as_deref().map(|exit| (p, exit)))
            .collect();
        for pair in exits.windows(2) {
            let (current, exit) = pair[0];
            let (next, _) = pair[1];
            if self.add_edge(exit, &next.header, EdgeOrigin::PhaseBridge) {
                tracing::debug!(
                    from = %current.number,
                    to = %next.number,
                    exit,
                    "bridged phases"
                );
            }
        }
    }

    fn link_total_time(&mut self) {
        let totals: Vec<&String> = self
            .nodes
            .iter()
            .filter(|n| classify(n) == NodeKind::TotalTime)
            .collect();
        if totals.len() > 1 {
            tracing::warn!(count = totals.len(), "several total-time nodes; using the first");
        }
        let Some(total) = totals.first().map(|t| t.to_string()) else {
            return;
        };
        let final_estimate = self
            .nodes
            .iter()
            .rev()
            .find(|n| classify(n) == NodeKind::EstimatedTime)
            .cloned();
        if let Some(estimate) = final_estimate {
            self.add_edge(&estimate, &total, EdgeOrigin::TotalLink);
        }
    }

    fn finish(self, summary: &str, phases: Vec<Phase>) -> RoadmapGraph {
        RoadmapGraph {
            nodes: self.nodes,
            edges: self.edges,
            summary: summary.to_string(),
            phases,
        }
    }
}
