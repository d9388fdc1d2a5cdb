//! `oax status` - cache statistics

use std::fs;

use console::style;
use miette::{IntoDiagnostic, Result};

use crate::cli::args::GlobalArgs;
use crate::core::{Config, EntityStore};

pub fn run(global: &GlobalArgs) -> Result<()> {
    let config = Config::resolve(global.db.clone(), global.mailto.clone());
    let store = EntityStore::open(&config.db_path).into_diagnostic()?;

    let stats = store.stats().into_diagnostic()?;
    let db_size = fs::metadata(&config.db_path).map(|m| m.len()).unwrap_or(0);

    println!("{}", style("Cache Status").bold());
    println!("{}", style("─".repeat(40)).dim());
    println!("  Location: {}", config.db_path.display());
    println!("  Size:     {} KB", db_size / 1024);
    println!();
    for (kind, count) in stats {
        println!("  {:<13} {}", kind.plural(), style(count).cyan());
    }

    Ok(())
}
