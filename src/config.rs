use std::path::Path;

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub completion: CompletionSettings,
    pub layout: LayoutConfig,
}

/// Settings handed to the text-generation collaborator when it is built.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CompletionSettings {
    pub model: String,
    pub max_tokens: u32,
    pub temperature: f32,
    pub system_prompt: String,
}

impl Default for CompletionSettings {
    fn default() -> Self {
        Self {
            model: "gpt-4".to_string(),
            max_tokens: 2000,
            temperature: 0.7,
            system_prompt: "You are a helpful assistant.".to_string(),
        }
    }
}

/// Graph attributes and colors used when exporting a roadmap diagram.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LayoutConfig {
    pub rankdir: String,
    pub splines: String,
    pub nodesep: f32,
    pub ranksep: f32,
    pub font_name: String,
    pub font_size: f32,
    pub node_margin: String,
    pub node_fill: String,
    pub header_fill: String,
    pub header_width: f32,
    pub header_height: f32,
    pub estimate_fill: String,
    pub total_fill: String,
    pub cluster_fill: String,
    pub cluster_border: String,
    pub edge_arrowsize: f32,
    pub edge_penwidth: f32,
    /// Wrap labels wider than this many columns; 0 keeps labels on one line.
    pub wrap_width: usize,
}

impl Default for LayoutConfig {
    fn default() -> Self {
        Self {
            rankdir: "TB".to_string(),
            splines: "ortho".to_string(),
            nodesep: 1.0,
            ranksep: 1.5,
            font_name: "Helvetica".to_string(),
            font_size: 12.0,
            node_margin: "0.3,0.15".to_string(),
            node_fill: "lightyellow".to_string(),
            header_fill: "lightblue".to_string(),
            header_width: 1.8,
            header_height: 0.7,
            estimate_fill: "lightgoldenrod1".to_string(),
            total_fill: "orange".to_string(),
            cluster_fill: "#F0F0F0".to_string(),
            cluster_border: "gray".to_string(),
            edge_arrowsize: 0.8,
            edge_penwidth: 1.0,
            wrap_width: 0,
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("failed to read config {path}: {source}")]
    Read {
        path: String,
        #[source]
        source: std::io::Error,
    },
    #[error("invalid config {path}: {source}")]
    Parse {
        path: String,
        #[source]
        source: serde_json::Error,
    },
}

/// Loads a JSON config file; without a path the defaults are returned.
pub fn load_config(path: Option<&Path>) -> Result<Config, ConfigError> {
    let Some(path) = path else {
        return Ok(Config::default());
    };
    let display = path.display().to_string();
    let contents = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
        path: display.clone(),
        source,
    })?;
    parse_config(&contents).map_err(|source| ConfigError::Parse {
        path: display,
        source,
    })
}

pub fn parse_config(contents: &str) -> Result<Config, serde_json::Error> {
    serde_json::from_str(contents)
}
