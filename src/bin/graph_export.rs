use std::path::PathBuf;

use clap::Parser;
use datafix_schemas::{build_schema_chain_with, recursive_groups, ReferenceGraph};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "schema-graph-export")]
#[command(about = "Export one version's reference graph to DOT/SVG format")]
struct Cli {
    /// Version to export ("latest", "705", "1451.6")
    #[arg(short, long, default_value = "latest")]
    version: String,

    /// Output file (defaults to schema_<version>.dot)
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Output format: dot or svg
    #[arg(short, long, default_value = "dot")]
    format: String,
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let cli = Cli::parse();

    // Dangling edges are drawn in red instead of failing the export
    let chain = build_schema_chain_with(false)?;
    let schema = chain.resolve(&cli.version)?;
    let graph = ReferenceGraph::from_schema(schema);

    println!(
        "Graph for {}: {} nodes, {} edges, {} dangling, {} recursive groups",
        schema.version(),
        graph.node_count(),
        graph.edge_count(),
        graph.dangling().len(),
        recursive_groups(&graph).len(),
    );

    let dot_content = graph.to_dot();
    let default_name = format!("schema_{}", schema.version());

    match cli.format.as_str() {
        "dot" => {
            let output_path = cli
                .output
                .unwrap_or_else(|| PathBuf::from(format!("{}.dot", default_name)));
            std::fs::write(&output_path, &dot_content)?;
            println!("✅ Exported DOT to: {:?}", output_path);
        }
        "svg" => {
            let output_path = cli
                .output
                .unwrap_or_else(|| PathBuf::from(format!("{}.svg", default_name)));

            // Write DOT to temp file, then convert to SVG
            let temp_dot = output_path.with_extension("temp.dot");
            std::fs::write(&temp_dot, &dot_content)?;

            let output = std::process::Command::new("dot")
                .arg("-Tsvg")
                .arg(&temp_dot)
                .arg("-o")
                .arg(&output_path)
                .output()?;

            let _ = std::fs::remove_file(&temp_dot);

            if output.status.success() {
                println!("✅ Exported SVG to: {:?}", output_path);
            } else {
                eprintln!("❌ GraphViz conversion failed:");
                eprintln!("{}", String::from_utf8_lossy(&output.stderr));
                std::process::exit(1);
            }
        }
        _ => {
            eprintln!("❌ Invalid format. Use 'dot' or 'svg'");
            std::process::exit(1);
        }
    }

    Ok(())
}
