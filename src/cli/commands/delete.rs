//! `oax delete` - remove a cached entity and its child rows

use clap::Args;
use console::style;
use miette::{IntoDiagnostic, Result};

use crate::cli::args::GlobalArgs;
use crate::core::{Config, EntityKind, EntityStore};

#[derive(Args, Debug)]
pub struct DeleteArgs {
    /// OpenAlex ID (bare or prefixed with https://openalex.org/)
    pub id: String,

    /// Entity kind; inferred from the ID's leading letter when omitted
    #[arg(short, long, value_enum)]
    pub kind: Option<EntityKind>,
}

pub fn run(args: DeleteArgs, global: &GlobalArgs) -> Result<()> {
    let config = Config::resolve(global.db.clone(), global.mailto.clone());
    let mut store = EntityStore::open(&config.db_path).into_diagnostic()?;

    let kind = match args.kind.or_else(|| EntityKind::from_id(&args.id)) {
        Some(kind) => kind,
        None => {
            return Err(miette::miette!(
                "cannot infer the entity kind of '{}'; pass --kind",
                args.id
            ));
        }
    };

    store.delete(kind, &args.id).into_diagnostic()?;

    println!("{} Deleted {} {}", style("✓").green(), kind, args.id);
    Ok(())
}
