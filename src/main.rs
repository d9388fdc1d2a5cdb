use clap::Parser;
use miette::Result;
use openalex_cache::cli::{Cli, Commands};

fn main() -> Result<()> {
    // Reset SIGPIPE to default behavior (terminate silently) for proper Unix piping.
    // Without this, piping to `head`, `grep -q`, etc. causes a panic on broken pipe.
    #[cfg(unix)]
    {
        unsafe {
            libc::signal(libc::SIGPIPE, libc::SIG_DFL);
        }
    }

    miette::set_hook(Box::new(|_| {
        Box::new(
            miette::MietteHandlerOpts::new()
                .terminal_links(true)
                .unicode(true)
                .context_lines(2)
                .tab_width(4)
                .build(),
        )
    }))?;

    let cli = Cli::parse();
    let global = cli.global;

    match cli.command {
        Commands::Init => openalex_cache::cli::commands::init::run(&global),
        Commands::Fetch(args) => openalex_cache::cli::commands::fetch::run(args, &global),
        Commands::Show(args) => openalex_cache::cli::commands::show::run(args, &global),
        Commands::Delete(args) => openalex_cache::cli::commands::delete::run(args, &global),
        Commands::Status => openalex_cache::cli::commands::status::run(&global),
        Commands::Completions(args) => openalex_cache::cli::commands::completions::run(args),
    }
}
