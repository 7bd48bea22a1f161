use std::cell::Cell;

use pretty_assertions::assert_eq;
use roadmap::error::{CollaboratorError, RoadmapError, TopicError};
use roadmap::pipeline::{RoadmapResponse, generate_roadmap};
use roadmap::research::Researcher;
use roadmap::synthesis::Synthesizer;

struct FakeResearcher {
    result: Result<String, CollaboratorError>,
    calls: Cell<usize>,
}

impl FakeResearcher {
    fn ok(text: &str) -> Self {
        Self {
            result: Ok(text.to_string()),
            calls: Cell::new(0),
        }
    }

    fn failing(message: &str) -> Self {
        Self {
            result: Err(CollaboratorError::request("search", message)),
            calls: Cell::new(0),
        }
    }
}

impl Researcher for FakeResearcher {
    fn research(&self, _topic: &str) -> Result<String, CollaboratorError> {
        self.calls.set(self.calls.get() + 1);
        self.result.clone()
    }
}

struct FakeSynthesizer {
    summary: String,
    calls: Cell<usize>,
}

impl FakeSynthesizer {
    fn new(summary: &str) -> Self {
        Self {
            summary: summary.to_string(),
            calls: Cell::new(0),
        }
    }
}

impl Synthesizer for FakeSynthesizer {
    fn synthesize(&self, _topic: &str, _snippet: &str) -> Result<String, CollaboratorError> {
        self.calls.set(self.calls.get() + 1);
        Ok(self.summary.clone())
    }
}

const SUMMARY: &str = "\
Phase 1: Foundations > Python
Python > Estimated Time (2 months)
Phase 2: Machine Learning > scikit-learn
scikit-learn > Estimated Time (3 months)
Total Estimated Time (5 months)
";

#[test]
fn short_topic_rejected_before_research() {
    let researcher = FakeResearcher::ok("context");
    let synthesizer = FakeSynthesizer::new(SUMMARY);
    let err = generate_roadmap("AI", &researcher, &synthesizer).unwrap_err();
    assert!(matches!(
        err,
        RoadmapError::InvalidTopic(TopicError::Length { len: 2, .. })
    ));
    assert_eq!(researcher.calls.get(), 0);
    assert_eq!(synthesizer.calls.get(), 0);
}

#[test]
fn long_topic_rejected() {
    let researcher = FakeResearcher::ok("context");
    let synthesizer = FakeSynthesizer::new(SUMMARY);
    let err = generate_roadmap(&"x".repeat(101), &researcher, &synthesizer).unwrap_err();
    assert!(matches!(err, RoadmapError::InvalidTopic(_)));
    assert_eq!(researcher.calls.get(), 0);
}

#[test]
fn research_failure_stops_pipeline() {
    let researcher = FakeResearcher::failing("connection reset");
    let synthesizer = FakeSynthesizer::new(SUMMARY);
    let result = generate_roadmap("Data Scientist", &researcher, &synthesizer);
    let response = RoadmapResponse::from(result);
    assert_eq!(
        response,
        RoadmapResponse::Error {
            error: "Research failed: search request failed: connection reset".to_string()
        }
    );
    assert_eq!(synthesizer.calls.get(), 0);
}

#[test]
fn blank_summary_is_synthesis_failure() {
    let researcher = FakeResearcher::ok("context");
    let synthesizer = FakeSynthesizer::new("  \n ");
    let err = generate_roadmap("Data Scientist", &researcher, &synthesizer).unwrap_err();
    assert!(matches!(err, RoadmapError::EmptySummary));
}

#[test]
fn empty_research_is_failure() {
    let researcher = FakeResearcher::ok("");
    let synthesizer = FakeSynthesizer::new(SUMMARY);
    let err = generate_roadmap("Data Scientist", &researcher, &synthesizer).unwrap_err();
    assert!(matches!(err, RoadmapError::EmptyResearch));
    assert!(err.to_string().starts_with("Research failed"));
    assert_eq!(synthesizer.calls.get(), 0);
}

#[test]
fn successful_run_returns_graph_and_summary() {
    let researcher = FakeResearcher::ok("ML engineers build models.");
    let synthesizer = FakeSynthesizer::new(SUMMARY);
    let graph = generate_roadmap("  ML Engineer ", &researcher, &synthesizer).unwrap();
    assert_eq!(graph.summary, SUMMARY);
    assert_eq!(graph.phases.len(), 2);
    assert!(graph.has_edge("Estimated Time (2 months)", "Phase 2: Machine Learning"));
    assert!(graph.has_edge("Estimated Time (3 months)", "Total Estimated Time (5 months)"));
}

#[test]
fn success_response_has_no_error_key() {
    let researcher = FakeResearcher::ok("context");
    let synthesizer = FakeSynthesizer::new("Phase 1: A > B\n");
    let response = RoadmapResponse::from(generate_roadmap("Rust", &researcher, &synthesizer));
    let json = serde_json::to_value(&response).unwrap();
    assert_eq!(
        json,
        serde_json::json!({
            "nodes": ["Phase 1: A", "B"],
            "edges": [["Phase 1: A", "B"]],
            "summary": "Phase 1: A > B\n"
        })
    );
}
