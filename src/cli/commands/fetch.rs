//! `oax fetch` - fetch entities from the OpenAlex API into the cache

use clap::Args;
use console::style;
use miette::{IntoDiagnostic, Result};

use crate::cli::args::GlobalArgs;
use crate::cli::helpers::group_by_kind;
use crate::core::{fetch_and_store, Config, EntityKind, EntityStore, FetchOutcome, OpenAlexClient};

#[derive(Args, Debug)]
pub struct FetchArgs {
    /// OpenAlex IDs (bare or prefixed with https://openalex.org/)
    #[arg(required = true)]
    pub ids: Vec<String>,

    /// Entity kind; inferred from the ID's leading letter when omitted
    #[arg(short, long, value_enum)]
    pub kind: Option<EntityKind>,
}

pub fn run(args: FetchArgs, global: &GlobalArgs) -> Result<()> {
    let config = Config::resolve(global.db.clone(), global.mailto.clone());
    let mut store = EntityStore::open(&config.db_path).into_diagnostic()?;
    let client = OpenAlexClient::new(&config).into_diagnostic()?;

    let mut fetched = 0usize;
    let mut skipped = 0usize;

    for (kind, ids) in group_by_kind(&args.ids, args.kind)? {
        let id_refs: Vec<&str> = ids.iter().map(String::as_str).collect();
        let outcomes =
            fetch_and_store(&mut store, &client, kind, &id_refs).into_diagnostic()?;

        for outcome in outcomes {
            match outcome {
                FetchOutcome::Inserted(entity) => {
                    fetched += 1;
                    println!("{} cached {} {}", style("✓").green(), kind, entity.full_id());
                }
                FetchOutcome::Conflict { id } => {
                    skipped += 1;
                    println!("{} {} {} already cached", style("-").yellow(), kind, id);
                }
            }
        }
    }

    if skipped > 0 {
        println!("{} fetched, {} already cached", fetched, skipped);
    }
    Ok(())
}
