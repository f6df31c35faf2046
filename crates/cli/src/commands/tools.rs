//! `remind tools` — List the built-in tools.

use remind_config::AppConfig;
use remind_core::tool::ToolDefinition;

pub async fn run() -> Result<(), Box<dyn std::error::Error>> {
    let config = AppConfig::load().map_err(|e| format!("Failed to load config: {e}"))?;
    let registry = remind_tools::default_registry(&config.tools.file_root);
    println!("🔧 Built-in tools");
    println!("=================");
    println!();
    for line in render(&registry.definitions()) {
        println!("{line}");
    }
    println!();
    println!("  The model invokes a tool by name:");
    println!("    Action: calculator");
    println!("    Action Input: 2 * (3 + 4)");
    println!();
    println!("  file_read is confined to {}", config.tools.file_root.display());
    Ok(())
}

fn render(definitions: &[ToolDefinition]) -> Vec<String> {
    let width = definitions.iter().map(|d| d.name.len()).max().unwrap_or(0);
    definitions
        .iter()
        .map(|d| format!("  {:<width$}  {}", d.name, d.description))
        .collect()
}
