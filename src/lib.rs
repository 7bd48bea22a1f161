pub mod config;
pub mod display_width;
pub mod dot_renderer;
pub mod error;
pub mod pipeline;
pub mod research;
pub mod roadmap_ast;
pub mod roadmap_layout;
pub mod roadmap_parser;
pub mod synthesis;

use config::LayoutConfig;
use roadmap_ast::RoadmapGraph;

/// Parses roadmap text and exports it as Graphviz DOT with default styling.
pub fn render(input: &str) -> String {
    render_with_config(input, &LayoutConfig::default())
}

pub fn render_with_config(input: &str, config: &LayoutConfig) -> String {
    export(&roadmap_parser::parse_roadmap(input), config)
}

/// Lays out an already built graph and exports it as DOT.
pub fn export(graph: &RoadmapGraph, config: &LayoutConfig) -> String {
    let plan = roadmap_layout::plan(graph, config);
    dot_renderer::render(&plan, config)
}
