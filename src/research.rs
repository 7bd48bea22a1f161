use serde::Deserialize;

use crate::error::CollaboratorError;

/// Supplies free-form background text about a topic.
pub trait Researcher {
    fn research(&self, topic: &str) -> Result<String, CollaboratorError>;
}

/// A web search backend returning organic results.
pub trait WebSearch {
    fn search(&self, query: &str) -> Result<SearchResults, CollaboratorError>;
}

/// An encyclopedia lookup. `Ok(None)` means no page exists for the title.
pub trait Encyclopedia {
    fn summary(&self, title: &str) -> Result<Option<String>, CollaboratorError>;
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct SearchResults {
    #[serde(default)]
    pub organic_results: Vec<OrganicResult>,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct OrganicResult {
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub snippet: Option<String>,
}

impl SearchResults {
    /// Parses a search API response body.
    pub fn from_json(body: &str) -> Result<Self, CollaboratorError> {
        serde_json::from_str(body).map_err(|e| CollaboratorError::response("search", e.to_string()))
    }

    /// Snippet of the top result, with fallbacks when there is none.
    pub fn lead_snippet(&self) -> String {
        match self.organic_results.first() {
            None => "No search results found on Google.".to_string(),
            Some(result) => result
                .snippet
                .clone()
                .unwrap_or_else(|| "No snippet available.".to_string()),
        }
    }
}

/// Page title for a topic: spaces become underscores.
pub fn encyclopedia_title(topic: &str) -> String {
    topic.replace(' ', "_")
}

/// Combines the top search snippet with an encyclopedia summary.
pub struct WebResearcher<S, E> {
    search: S,
    encyclopedia: E,
}

impl<S: WebSearch, E: Encyclopedia> WebResearcher<S, E> {
    pub fn new(search: S, encyclopedia: E) -> Self {
        Self {
            search,
            encyclopedia,
        }
    }
}

impl<S: WebSearch, E: Encyclopedia> Researcher for WebResearcher<S, E> {
    fn research(&self, topic: &str) -> Result<String, CollaboratorError> {
        let snippet = self.search.search(topic)?.lead_snippet();
        let extract = match self.encyclopedia.summary(&encyclopedia_title(topic))? {
            Some(text) if !text.trim().is_empty() => text,
            Some(_) => format!("No summary found for {topic}."),
            None => format!("No Wikipedia page found for {topic}."),
        };
        tracing::debug!(
            topic,
            snippet_len = snippet.len(),
            extract_len = extract.len(),
            "research complete"
        );
        Ok(format!("{snippet}\n\n{extract}"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use std::cell::RefCell;

    struct FixedSearch(Result<SearchResults, CollaboratorError>);

    impl WebSearch for FixedSearch {
        fn search(&self, _query: &str) -> Result<SearchResults, CollaboratorError> {
            self.0.clone()
        }
    }

    #[derive(Default)]
    struct RecordingEncyclopedia {
        extract: Option<String>,
        titles: RefCell<Vec<String>>,
    }

    impl Encyclopedia for RecordingEncyclopedia {
        fn summary(&self, title: &str) -> Result<Option<String>, CollaboratorError> {
            self.titles.borrow_mut().push(title.to_string());
            Ok(self.extract.clone())
        }
    }

    fn results(snippets: &[Option<&str>]) -> SearchResults {
        SearchResults {
            organic_results: snippets
                .iter()
                .map(|s| OrganicResult {
                    title: None,
                    snippet: s.map(str::to_string),
                })
                .collect(),
        }
    }

    #[test]
    fn parses_search_body() {
        let body = r#"{"search_metadata": {}, "organic_results": [{"title": "T", "snippet": "First"}, {"snippet": "Second"}]}"#;
        let parsed = SearchResults::from_json(body).unwrap();
        assert_eq!(parsed.lead_snippet(), "First");
    }

    #[test]
    fn missing_results_fall_back() {
        let parsed = SearchResults::from_json("{}").unwrap();
        assert_eq!(parsed.lead_snippet(), "No search results found on Google.");
        assert_eq!(results(&[None]).lead_snippet(), "No snippet available.");
    }

    #[test]
    fn malformed_body_is_response_error() {
        let err = SearchResults::from_json("<html>").unwrap_err();
        assert!(matches!(err, CollaboratorError::Response { service: "search", .. }));
    }

    #[test]
    fn combines_snippet_and_extract() {
        let encyclopedia = RecordingEncyclopedia {
            extract: Some("Data science is a field.".to_string()),
            ..Default::default()
        };
        let researcher =
            WebResearcher::new(FixedSearch(Ok(results(&[Some("Top hit")]))), encyclopedia);
        let text = researcher.research("Data Scientist").unwrap();
        assert_eq!(text, "Top hit\n\nData science is a field.");
        assert_eq!(*researcher.encyclopedia.titles.borrow(), vec!["Data_Scientist"]);
    }

    #[test]
    fn missing_page_falls_back() {
        let researcher = WebResearcher::new(
            FixedSearch(Ok(results(&[]))),
            RecordingEncyclopedia::default(),
        );
        let text = researcher.research("DevOps").unwrap();
        assert_eq!(
            text,
            "No search results found on Google.\n\nNo Wikipedia page found for DevOps."
        );
    }

    #[test]
    fn search_failure_propagates() {
        let researcher = WebResearcher::new(
            FixedSearch(Err(CollaboratorError::request("search", "connection refused"))),
            RecordingEncyclopedia::default(),
        );
        let err = researcher.research("DevOps").unwrap_err();
        assert_eq!(err, CollaboratorError::request("search", "connection refused"));
        assert!(researcher.encyclopedia.titles.borrow().is_empty());
    }
}
