//! `oax show` - print cached entities as JSON

use clap::Args;
use miette::{IntoDiagnostic, Result};

use crate::cli::args::GlobalArgs;
use crate::cli::helpers::group_by_kind;
use crate::core::{Config, EntityKind, EntityStore};

#[derive(Args, Debug)]
pub struct ShowArgs {
    /// OpenAlex IDs (bare or prefixed with https://openalex.org/)
    #[arg(required = true)]
    pub ids: Vec<String>,

    /// Entity kind; inferred from the ID's leading letter when omitted
    #[arg(short, long, value_enum)]
    pub kind: Option<EntityKind>,

    /// Pretty-print the JSON output
    #[arg(short, long)]
    pub pretty: bool,
}

pub fn run(args: ShowArgs, global: &GlobalArgs) -> Result<()> {
    let config = Config::resolve(global.db.clone(), global.mailto.clone());
    let store = EntityStore::open(&config.db_path).into_diagnostic()?;

    for (kind, ids) in group_by_kind(&args.ids, args.kind)? {
        let id_refs: Vec<&str> = ids.iter().map(String::as_str).collect();
        let entities = store.load_by_ids(kind, &id_refs).into_diagnostic()?;
        for entity in entities {
            print_document(entity.data(), args.pretty)?;
        }
    }
    Ok(())
}

fn print_document(doc: &serde_json::Value, pretty: bool) -> Result<()> {
    let rendered = if pretty {
        serde_json::to_string_pretty(doc).into_diagnostic()?
    } else {
        serde_json::to_string(doc).into_diagnostic()?
    };
    println!("{rendered}");
    Ok(())
}
