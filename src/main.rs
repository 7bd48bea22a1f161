use std::io::Read;

use clap::{ArgAction, Parser, ValueEnum};
use roadmap::pipeline::RoadmapResponse;
use tracing::Level;

#[derive(Parser)]
#[command(
    name = "roadmap",
    about = "Turn '>'-delimited roadmap text into a phased Graphviz diagram"
)]
struct Cli {
    /// Input file (reads from stdin if not provided)
    file: Option<std::path::PathBuf>,

    /// Output format
    #[arg(long, short = 'f', value_enum, default_value = "dot")]
    format: OutputFormat,

    /// JSON config file
    #[arg(long, short = 'c')]
    config: Option<std::path::PathBuf>,

    /// Wrap node labels at this many columns (overrides the config file)
    #[arg(long, short = 'w')]
    wrap: Option<usize>,

    /// More log output on stderr (-v info, -vv debug)
    #[arg(long, short = 'v', action = ArgAction::Count)]
    verbose: u8,
}

#[derive(ValueEnum, Clone, Copy)]
enum OutputFormat {
    Dot,
    Json,
}

fn main() {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let mut config = roadmap::config::load_config(cli.config.as_deref()).unwrap_or_else(|e| {
        eprintln!("ERROR: {e}");
        std::process::exit(1);
    });
    if let Some(width) = cli.wrap {
        config.layout.wrap_width = width;
    }

    let input = match cli.file {
        Some(path) => std::fs::read_to_string(&path).unwrap_or_else(|e| {
            eprintln!("ERROR: failed to read {}: {e}", path.display());
            std::process::exit(1);
        }),
        None => {
            let mut buf = String::new();
            std::io::stdin().read_to_string(&mut buf).unwrap_or_else(|e| {
                eprintln!("ERROR: failed to read stdin: {e}");
                std::process::exit(1);
            });
            buf
        }
    };

    let graph = roadmap::roadmap_parser::parse_roadmap(&input);
    tracing::info!(nodes = graph.nodes.len(), edges = graph.edges.len(), "parsed roadmap");

    match cli.format {
        OutputFormat::Dot => print!("{}", roadmap::export(&graph, &config.layout)),
        OutputFormat::Json => match serde_json::to_string_pretty(&RoadmapResponse::Roadmap(graph)) {
            Ok(json) => println!("{json}"),
            Err(e) => {
                eprintln!("ERROR: {e}");
                std::process::exit(1);
            }
        },
    }
}

fn init_logging(verbose: u8) {
    let level = match verbose {
        0 => Level::WARN,
        1 => Level::INFO,
        _ => Level::DEBUG,
    };
    tracing_subscriber::fmt()
        .with_max_level(level)
        .with_writer(std::io::stderr)
        .init();
}
