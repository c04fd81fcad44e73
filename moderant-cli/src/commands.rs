//! CLI subcommand handlers.

use crate::Commands;
use crate::ConfigAction;
use moderant_core::severity::{SEVERITY_RULES, Severity};
use std::path::Path;

/// Handle a CLI subcommand.
pub async fn handle_command(command: Commands, workspace: &Path) -> anyhow::Result<()> {
    match command {
        Commands::Config { action } => handle_config(action, workspace).await,
        Commands::Rules => {
            print!("{}", render_rules());
            Ok(())
        }
    }
}

async fn handle_config(action: ConfigAction, workspace: &Path) -> anyhow::Result<()> {
    match action {
        ConfigAction::Init => {
            let config_path = moderant_core::config::workspace_config_path(workspace);
            if config_path.exists() {
                println!(
                    "Configuration file already exists at: {}",
                    config_path.display()
                );
                return Ok(());
            }
            if let Some(config_dir) = config_path.parent() {
                std::fs::create_dir_all(config_dir)?;
            }

            let default_config = moderant_core::ModerantConfig::default();
            let toml_str = toml::to_string_pretty(&default_config)?;
            std::fs::write(&config_path, &toml_str)?;
            println!(
                "Created default configuration at: {}",
                config_path.display()
            );
            Ok(())
        }
        ConfigAction::Show => {
            let config = moderant_core::config::load_config(Some(workspace))
                .map_err(|e| anyhow::anyhow!("Failed to load config: {}", e))?;
            for warning in config.validate()? {
                eprintln!("warning: {}", warning);
            }
            let toml_str = toml::to_string_pretty(&config)?;
            println!("{}", toml_str);
            Ok(())
        }
    }
}

/// The keyword table, in the order rules are checked.
fn render_rules() -> String {
    let mut out = String::from("Severity rules (first match wins, case-insensitive):\n");
    for (index, (keyword, severity)) in SEVERITY_RULES.iter().enumerate() {
        out.push_str(&format!(
            "  {}. contains \"{}\" -> {} ({})\n",
            index + 1,
            keyword,
            severity,
            severity.label()
        ));
    }
    out.push_str(&format!(
        "  {}. otherwise -> {} ({})\n",
        SEVERITY_RULES.len() + 1,
        Severity::LOW,
        Severity::LOW.label()
    ));
    out
}
