use crate::config::LayoutConfig;
use crate::roadmap_layout::*;

type Attrs = Vec<(&'static str, String)>;

/// Serializes a diagram plan as a Graphviz `digraph`.
pub fn render(plan: &DiagramPlan, config: &LayoutConfig) -> String {
    let mut out = String::new();
    out.push_str("digraph roadmap {\n");
    line(&mut out, 1, &format!("graph [{}];", attr_list(&graph_attrs(config))));
    line(&mut out, 1, &format!("node [{}];", attr_list(&node_defaults(config))));

    for node in &plan.nodes {
        line(&mut out, 1, &node_stmt(node, config));
    }

    if let Some(rank) = &plan.header_rank {
        line(&mut out, 1, &format!("subgraph {HEADER_RANK_ID} {{"));
        line(&mut out, 2, "rank=\"same\";");
        for id in &rank.node_ids {
            line(&mut out, 2, &format!("{id};"));
        }
        for guide in &rank.guides {
            line(&mut out, 2, &edge_stmt(guide, config, &[]));
        }
        line(&mut out, 1, "}");
    }

    for cluster in &plan.clusters {
        line(&mut out, 1, &format!("subgraph {} {{", cluster.id));
        let attrs: Attrs = vec![
            ("label", cluster.label.clone()),
            ("style", "filled,rounded".to_string()),
            ("color", config.cluster_border.clone()),
            ("fillcolor", config.cluster_fill.clone()),
        ];
        line(&mut out, 2, &format!("graph [{}];", attr_list(&attrs)));
        for id in &cluster.node_ids {
            line(&mut out, 2, &format!("{id};"));
        }
        for guide in &cluster.guides {
            let stacked = [("minlen", "1.0".to_string())];
            line(&mut out, 2, &edge_stmt(guide, config, &stacked));
        }
        line(&mut out, 1, "}");
        line(&mut out, 1, &edge_stmt(&cluster.anchor, config, &[]));
    }

    for edge in &plan.edges {
        line(&mut out, 1, &edge_stmt(edge, config, &[]));
    }

    if let Some(total) = &plan.total {
        line(&mut out, 1, &format!("subgraph {} {{", total.cluster_id));
        let attrs: Attrs = vec![
            ("rank", "max".to_string()),
            ("style", "invis".to_string()),
            ("label", "_".to_string()),
        ];
        line(&mut out, 2, &format!("graph [{}];", attr_list(&attrs)));
        line(&mut out, 2, &node_stmt(&total.node, config));
        line(&mut out, 1, "}");
        if let Some(link) = &total.link {
            line(&mut out, 1, &edge_stmt(link, config, &[]));
        }
    }

    out.push_str("}\n");
    out
}

fn line(out: &mut String, depth: usize, text: &str) {
    out.push_str(&"    ".repeat(depth));
    out.push_str(text);
    out.push('\n');
}

fn graph_attrs(config: &LayoutConfig) -> Attrs {
    vec![
        ("rankdir", config.rankdir.clone()),
        ("splines", config.splines.clone()),
        ("nodesep", config.nodesep.to_string()),
        ("ranksep", config.ranksep.to_string()),
        ("fontsize", config.font_size.to_string()),
        ("fontname", config.font_name.clone()),
        ("compound", "true".to_string()),
    ]
}

fn node_defaults(config: &LayoutConfig) -> Attrs {
    vec![
        ("shape", "box".to_string()),
        ("style", "rounded,filled".to_string()),
        ("fillcolor", config.node_fill.clone()),
        ("fontname", config.font_name.clone()),
        ("margin", config.node_margin.clone()),
        ("fixedsize", "false".to_string()),
    ]
}

fn node_stmt(node: &PlannedNode, config: &LayoutConfig) -> String {
    let mut attrs: Attrs = vec![("label", node.label.clone())];
    match node.style {
        NodeStyle::Default => {}
        NodeStyle::PhaseHeader => attrs.extend([
            ("fillcolor", config.header_fill.clone()),
            ("style", "rounded,filled,bold".to_string()),
            ("width", config.header_width.to_string()),
            ("height", config.header_height.to_string()),
            ("group", HEADER_GROUP.to_string()),
        ]),
        NodeStyle::EstimatedTime => attrs.extend([
            ("fillcolor", config.estimate_fill.clone()),
            ("style", "rounded,filled".to_string()),
        ]),
        NodeStyle::TotalTime => attrs.extend([
            ("fillcolor", config.total_fill.clone()),
            ("style", "rounded,filled,bold".to_string()),
            ("shape", "box".to_string()),
        ]),
    }
    format!("{} [{}];", node.id, attr_list(&attrs))
}

fn edge_stmt(
    edge: &PlannedEdge,
    config: &LayoutConfig,
    extra: &[(&'static str, String)],
) -> String {
    let mut attrs: Attrs = Vec::new();
    if edge.kind != EdgeKind::Guide {
        attrs.push(("arrowsize", config.edge_arrowsize.to_string()));
        attrs.push(("penwidth", config.edge_penwidth.to_string()));
    }
    if let Some(ltail) = &edge.ltail {
        attrs.push(("ltail", ltail.clone()));
    }
    if let Some(lhead) = &edge.lhead {
        attrs.push(("lhead", lhead.clone()));
    }
    if matches!(edge.kind, EdgeKind::Soft | EdgeKind::HiddenSoft) {
        attrs.push(("constraint", "false".to_string()));
    }
    if !edge.is_visible() {
        attrs.push(("style", "invis".to_string()));
    }
    attrs.extend(extra.iter().cloned());
    format!("{} -> {} [{}];", edge.from_id, edge.to_id, attr_list(&attrs))
}

fn attr_list(attrs: &[(&'static str, String)]) -> String {
    attrs
        .iter()
        .map(|(key, value)| format!("{key}=\"{}\"", escape(value)))
        .collect::<Vec<_>>()
        .join(", ")
}

fn escape(value: &str) -> String {
    let mut escaped = String::with_capacity(value.len());
    for ch in value.chars() {
        match ch {
            '\\' => escaped.push_str("\\\\"),
            '"' => escaped.push_str("\\\""),
            '\n' => escaped.push_str("\\n"),
            '\r' => {}
            _ => escaped.push(ch),
        }
    }
    escaped
}
