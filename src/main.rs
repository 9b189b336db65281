use anyhow::{Context, Result};
use flow_graph::{
    Column, ColumnType, DesignerConfig, FlowDesigner, GraphEvent, GraphObserver, Notice,
    TableSchema, TransformKind, ValidatedGraph,
};
use std::path::Path;
use tracing::info;
use tracing_subscriber::EnvFilter;

/// Prints notices the way the wizard would toast them
struct ConsoleNotices;

impl GraphObserver for ConsoleNotices {
    fn on_event(&mut self, _event: &GraphEvent) {}

    fn on_notice(&mut self, notice: &Notice) {
        println!("✓ {}: {}", notice.title, notice.description);
    }
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let config = match std::env::args().nth(1) {
        Some(path) => DesignerConfig::load(Path::new(&path))?,
        None => DesignerConfig::default(),
    };
    info!(?config, "starting flow design session");

    let mut designer = FlowDesigner::with_config(config);
    designer.subscribe(ConsoleNotices);

    let customers = designer.add_table(
        TableSchema::new(
            "customers",
            vec![
                Column::primary_key("id", ColumnType::Int),
                Column::new("name", ColumnType::Varchar),
                Column::new("email", ColumnType::Varchar),
                Column::new("created_at", ColumnType::Timestamp),
            ],
        ),
        Some("Production DB"),
    )?;
    let orders = designer.add_table(
        TableSchema::new(
            "orders",
            vec![
                Column::primary_key("id", ColumnType::Int),
                Column::new("customer_id", ColumnType::Int),
                Column::new("total", ColumnType::Decimal),
                Column::new("status", ColumnType::Varchar),
            ],
        ),
        Some("Production DB"),
    )?;

    designer.create_relationship(&customers, "id", &orders, "customer_id")?;
    let filter = designer.add_transformation(TransformKind::Filter, &orders)?;
    let output = designer.add_generic_node(TransformKind::Output)?;
    designer.connect_generic(&filter, &output)?;
    designer.add_column(&output, Column::new("customer_name", ColumnType::Varchar))?;
    designer.add_column(&output, Column::new("order_total", ColumnType::Decimal))?;

    let graph = designer.graph();
    println!("\n📊 Flow Structure:");
    println!("  └─ Nodes: {}", graph.node_count());
    println!("  └─ Edges: {}", graph.edge_count());
    println!("  └─ Events published: {}", designer.events().len());

    let result = graph.validate();
    println!("\n🔎 Validation: {} issue(s)", result.issues.len());
    for issue in &result.issues {
        println!("  └─ {:?}: {}", issue.severity, issue.message);
    }

    let json = graph
        .snapshot()
        .to_json()
        .context("Failed to render flow snapshot")?;
    println!("\n{}", json);

    Ok(())
}
