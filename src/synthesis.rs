use serde::Serialize;

use crate::config::CompletionSettings;
use crate::error::CollaboratorError;

/// Turns research material into `>`-delimited roadmap text.
pub trait Synthesizer {
    fn synthesize(&self, topic: &str, snippet: &str) -> Result<String, CollaboratorError>;
}

/// A chat-style text-generation backend.
pub trait CompletionClient {
    fn complete(&self, request: &CompletionRequest) -> Result<String, CollaboratorError>;
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CompletionRequest {
    pub model: String,
    pub messages: Vec<ChatMessage>,
    pub temperature: f32,
    pub max_tokens: u32,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChatMessage {
    pub role: &'static str,
    pub content: String,
}

pub struct PromptSynthesizer<C> {
    client: C,
    settings: CompletionSettings,
}

impl<C: CompletionClient> PromptSynthesizer<C> {
    pub fn new(client: C, settings: CompletionSettings) -> Self {
        Self { client, settings }
    }

    pub fn request(&self, topic: &str, snippet: &str) -> CompletionRequest {
        CompletionRequest {
            model: self.settings.model.clone(),
            messages: vec![
                ChatMessage {
                    role: "system",
                    content: self.settings.system_prompt.clone(),
                },
                ChatMessage {
                    role: "user",
                    content: roadmap_prompt(topic, snippet),
                },
            ],
            temperature: self.settings.temperature,
            max_tokens: self.settings.max_tokens,
        }
    }
}

impl<C: CompletionClient> Synthesizer for PromptSynthesizer<C> {
    fn synthesize(&self, topic: &str, snippet: &str) -> Result<String, CollaboratorError> {
        let request = self.request(topic, snippet);
        tracing::debug!(
            model = %request.model,
            max_tokens = request.max_tokens,
            "requesting roadmap"
        );
        self.client.complete(&request)
    }
}

const FORMAT_EXAMPLE: &str = "\
Phase 1: Fundamentals
Phase 1: Fundamentals > Mathematics, Statistics, Programming Basics
Mathematics, Statistics, Programming Basics > High School Mathematics, Introductory Logic Courses
High School Mathematics, Introductory Logic Courses > Estimated Time (3 months)
Phase 2: Advanced Programming
Phase 2: Advanced Programming > Data Structures and Algorithms
Data Structures and Algorithms > Algorithms Part I & II, Intro to Data Structures
Algorithms Part I & II, Intro to Data Structures > Estimated Time (4 months)
Total Estimated Time (7 months)";

/// Prompt asking for a phased roadmap in the `>` line format.
pub fn roadmap_prompt(topic: &str, snippet: &str) -> String {
    format!(
        "You are an expert career coach and educator.

Break the learning roadmap for \"{topic}\" into clear, numbered phases.

Output format (strict, one hierarchical link per line):
Phase N: Title
Phase N: Title > Prerequisites
Prerequisites > Core Topic or Module
Core Topic or Module > Tool, Platform or Framework
Tool, Platform or Framework > Estimated Time (X months)

Link every time estimate to its tool or module.
End with a single 'Total Estimated Time' line, linked from the final phase's estimate.

Example:
{FORMAT_EXAMPLE}

Context:
{snippet}

Keep the hierarchy clear so it can be turned into a knowledge graph, and commit to concrete timelines."
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::roadmap_parser::parse_roadmap;
    use pretty_assertions::assert_eq;
    use std::cell::RefCell;

    #[derive(Default)]
    struct CapturingClient {
        requests: RefCell<Vec<CompletionRequest>>,
    }

    impl CompletionClient for CapturingClient {
        fn complete(&self, request: &CompletionRequest) -> Result<String, CollaboratorError> {
            self.requests.borrow_mut().push(request.clone());
            Ok("Phase 1: A > B".to_string())
        }
    }

    struct FailingClient;

    impl CompletionClient for FailingClient {
        fn complete(&self, _request: &CompletionRequest) -> Result<String, CollaboratorError> {
            Err(CollaboratorError::request("completion", "401 unauthorized"))
        }
    }

    #[test]
    fn prompt_embeds_topic_and_context() {
        let prompt = roadmap_prompt("DevOps Engineer", "CI/CD pipelines and containers.");
        assert!(prompt.contains("\"DevOps Engineer\""));
        assert!(prompt.contains("Context:\nCI/CD pipelines and containers."));
        assert!(prompt.contains("Total Estimated Time"));
    }

    #[test]
    fn format_example_parses_into_bridged_phases() {
        let graph = parse_roadmap(FORMAT_EXAMPLE);
        assert_eq!(graph.phases.len(), 2);
        assert!(graph.has_edge("Estimated Time (3 months)", "Phase 2: Advanced Programming"));
        assert!(graph.has_edge("Estimated Time (4 months)", "Total Estimated Time (7 months)"));
    }

    #[test]
    fn request_uses_configured_settings() {
        let settings = CompletionSettings {
            model: "gpt-4o".to_string(),
            max_tokens: 512,
            ..CompletionSettings::default()
        };
        let synthesizer = PromptSynthesizer::new(CapturingClient::default(), settings);
        let summary = synthesizer.synthesize("Rust", "systems language").unwrap();
        assert_eq!(summary, "Phase 1: A > B");

        let requests = synthesizer.client.requests.borrow();
        assert_eq!(requests.len(), 1);
        assert_eq!(requests[0].model, "gpt-4o");
        assert_eq!(requests[0].max_tokens, 512);
        assert_eq!(requests[0].messages[0].role, "system");
        assert_eq!(requests[0].messages[0].content, "You are a helpful assistant.");
        assert!(requests[0].messages[1].content.contains("systems language"));
    }

    #[test]
    fn request_serializes_as_chat_payload() {
        let synthesizer = PromptSynthesizer::new(FailingClient, CompletionSettings::default());
        let json = serde_json::to_value(synthesizer.request("Rust", "ctx")).unwrap();
        assert_eq!(json["model"], "gpt-4");
        assert_eq!(json["max_tokens"], 2000);
        assert_eq!(json["messages"][1]["role"], "user");
    }

    #[test]
    fn client_failure_propagates() {
        let synthesizer = PromptSynthesizer::new(FailingClient, CompletionSettings::default());
        let err = synthesizer.synthesize("Rust", "ctx").unwrap_err();
        assert_eq!(err, CollaboratorError::request("completion", "401 unauthorized"));
    }
}
