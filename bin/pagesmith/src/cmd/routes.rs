//! Routes command - print the resolved route table

use std::path::Path;

use color_eyre::eyre::{Result, WrapErr};
use pagesmith_generator::{Builder, RouteTable};

use super::{load_config, resolve_dir};

/// Run the routes command.
pub fn run(config_path: &Path) -> Result<()> {
    let config = load_config(config_path)?;
    let content = resolve_dir(config_path, &config.build.content_dir);
    let output = resolve_dir(config_path, &config.build.output_dir);

    let table = Builder::new(config, &content, output)
        .routes()
        .wrap_err("Failed to resolve routes")?;

    print!("{}", format_table(&table));
    tracing::info!(routes = table.len(), "Resolved routes");

    Ok(())
}

/// One line per route in path order: the path padded to a column, then the
/// owner.
pub fn format_table(table: &RouteTable) -> String {
    let width = table.routes().map(|r| r.path.len()).max().unwrap_or(0);
    let mut out = String::new();
    for route in table.routes() {
        out.push_str(&format!("{:<width$}  {}\n", route.path, route.owner));
    }
    out
}
