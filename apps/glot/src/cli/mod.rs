//! CLI command handling for glot

use anyhow::{anyhow, Context};
use clap::{Parser, Subcommand};
use glot_config::AppConfig;
use glot_language_api::{FsModuleResolver, LanguageInfo, ModuleResolver};
use glot_registry::LanguageRegistry;
use std::path::PathBuf;
use std::sync::Arc;
use tracing::{debug, info};

/// The main CLI struct.
#[derive(Parser)]
#[command(name = "glot")]
#[command(about = "Inspect the languages registered with the glot editor host")]
#[command(version)]
pub struct Cli {
    /// The command to run.
    #[command(subcommand)]
    pub command: Commands,
}

/// The available commands.
#[derive(Subcommand)]
pub enum Commands {
    /// List registered languages
    List {
        /// Print JSON instead of a table
        #[arg(long)]
        json: bool,
    },
    /// Print the language id that handles a file path
    Detect {
        /// File path (it does not need to exist)
        path: PathBuf,
    },
    /// Load a language definition module and print it as JSON
    Load {
        /// Language id or alias (e.g. "sol" or "Solidity")
        language: String,
    },
}

/// Build the registry from configuration and register every bundled language
pub fn build_registry(config: &AppConfig) -> anyhow::Result<LanguageRegistry> {
    let resolver: Arc<dyn ModuleResolver> =
        Arc::new(FsModuleResolver::new(config.modules.search_paths.iter().cloned()));
    let registry = LanguageRegistry::new(config.registry.duplicate_policy);

    let count = glot_language_bundle::register_all(&registry, resolver)
        .context("Failed to register bundled languages")?;
    debug!(languages = count, "Registry initialized");

    Ok(registry)
}

/// Run a parsed command
pub async fn run(cli: Cli, config: &AppConfig) -> anyhow::Result<()> {
    let registry = build_registry(config)?;

    match cli.command {
        Commands::List { json } => {
            let languages = registry.languages();
            if json {
                println!("{}", serde_json::to_string_pretty(&languages)?);
            } else {
                print!("{}", format_table(&languages));
            }
        }
        Commands::Detect { path } => {
            let id = registry
                .language_for_path(&path)
                .ok_or_else(|| anyhow!("No language registered for '{}'", path.display()))?;
            println!("{}", id);
        }
        Commands::Load { language } => {
            let id = if registry.contains(&language) {
                language
            } else {
                registry
                    .find_by_alias(&language)
                    .ok_or_else(|| anyhow!("Unknown language '{}'", language))?
            };

            info!(language = %id, "Loading language definition");
            let module = registry.load(&id).await?;
            println!("{}", serde_json::to_string_pretty(&module.definition)?);
        }
    }

    Ok(())
}

fn format_table(languages: &[LanguageInfo]) -> String {
    let id_width = languages
        .iter()
        .map(|l| l.id.len())
        .chain(std::iter::once("ID".len()))
        .max()
        .unwrap_or(2);

    let mut out = format!("{:<id_width$}  {:<32}  {}\n", "ID", "ALIASES", "EXTENSIONS");
    for language in languages {
        out.push_str(&format!(
            "{:<id_width$}  {:<32}  {}\n",
            language.id,
            language.aliases.join(", "),
            language.extensions.join(" ")
        ));
    }
    out
}
