//! `oax init` - bootstrap a fresh cache database

use console::style;
use miette::{IntoDiagnostic, Result};

use crate::cli::args::GlobalArgs;
use crate::core::{Config, EntityStore};

pub fn run(global: &GlobalArgs) -> Result<()> {
    let config = Config::resolve(global.db.clone(), global.mailto.clone());

    EntityStore::init(&config.db_path).into_diagnostic()?;

    println!(
        "{} Initialized cache at {}",
        style("✓").green(),
        config.db_path.display()
    );
    Ok(())
}
