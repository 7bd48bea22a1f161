use serde::Serialize;

use crate::error::{RoadmapError, TopicError};
use crate::research::Researcher;
use crate::roadmap_ast::RoadmapGraph;
use crate::roadmap_parser::parse_roadmap;
use crate::synthesis::Synthesizer;

pub const MIN_TOPIC_CHARS: usize = 3;
pub const MAX_TOPIC_CHARS: usize = 100;

/// What a presentation layer receives: a full roadmap or an error, never both.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum RoadmapResponse {
    Roadmap(RoadmapGraph),
    Error { error: String },
}

impl From<Result<RoadmapGraph, RoadmapError>> for RoadmapResponse {
    fn from(result: Result<RoadmapGraph, RoadmapError>) -> Self {
        match result {
            Ok(graph) => RoadmapResponse::Roadmap(graph),
            Err(e) => RoadmapResponse::Error {
                error: e.to_string(),
            },
        }
    }
}

/// Trims the topic and checks its length in characters.
pub fn validate_topic(topic: &str) -> Result<&str, TopicError> {
    let topic = topic.trim();
    if topic.is_empty() {
        return Err(TopicError::Empty);
    }
    let len = topic.chars().count();
    if !(MIN_TOPIC_CHARS..=MAX_TOPIC_CHARS).contains(&len) {
        return Err(TopicError::Length {
            len,
            min: MIN_TOPIC_CHARS,
            max: MAX_TOPIC_CHARS,
        });
    }
    Ok(topic)
}

/// Researches a topic, synthesizes roadmap text and maps it into a graph.
pub fn generate_roadmap(
    topic: &str,
    researcher: &dyn Researcher,
    synthesizer: &dyn Synthesizer,
) -> Result<RoadmapGraph, RoadmapError> {
    let topic = validate_topic(topic)?;

    tracing::info!(topic, "researching topic");
    let snippet = researcher.research(topic).map_err(RoadmapError::Research)?;
    if snippet.trim().is_empty() {
        return Err(RoadmapError::EmptyResearch);
    }

    tracing::info!(topic, snippet_len = snippet.len(), "synthesizing roadmap");
    let summary = synthesizer
        .synthesize(topic, &snippet)
        .map_err(RoadmapError::Synthesis)?;
    if summary.trim().is_empty() {
        return Err(RoadmapError::EmptySummary);
    }

    let graph = parse_roadmap(&summary);
    graph.validate()?;
    tracing::info!(
        topic,
        nodes = graph.nodes.len(),
        edges = graph.edges.len(),
        phases = graph.phases.len(),
        "mapped roadmap"
    );
    Ok(graph)
}
