use crate::roadmap_ast::GraphError;

/// Rejected before any collaborator is called.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum TopicError {
    #[error("Topic cannot be empty")]
    Empty,
    #[error("Topic length must be between {min} and {max} characters (got {len})")]
    Length { len: usize, min: usize, max: usize },
}

/// Failure reported by an external text source.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum CollaboratorError {
    #[error("{service} request failed: {message}")]
    Request {
        service: &'static str,
        message: String,
    },
    #[error("{service} returned an unexpected response: {message}")]
    Response {
        service: &'static str,
        message: String,
    },
}

#[derive(Debug, thiserror::Error)]
pub enum RoadmapError {
    #[error(transparent)]
    InvalidTopic(#[from] TopicError),
    #[error("Research failed: {0}")]
    Research(#[source] CollaboratorError),
    #[error("Research failed: no research material returned")]
    EmptyResearch,
    #[error("Synthesis failed: {0}")]
    Synthesis(#[source] CollaboratorError),
    #[error("Synthesis failed - no summary generated")]
    EmptySummary,
    #[error("Mapping failed - invalid graph structure generated: {0}")]
    Mapping(#[from] GraphError),
}

impl CollaboratorError {
    pub fn request(service: &'static str, message: impl Into<String>) -> Self {
        Self::Request {
            service,
            message: message.into(),
        }
    }

    pub fn response(service: &'static str, message: impl Into<String>) -> Self {
        Self::Response {
            service,
            message: message.into(),
        }
    }
}
