use clap::Parser;
use miette::Result;
use snipbar::cli::{Cli, Commands};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

fn main() -> Result<()> {
    // Reset SIGPIPE to default behavior (terminate silently) for proper Unix piping.
    #[cfg(unix)]
    {
        unsafe {
            libc::signal(libc::SIGPIPE, libc::SIG_DFL);
        }
    }
    // Install miette's fancy error handler
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

    init_tracing(global.verbose);

    match cli.command {
        Commands::Init(args) => snipbar::cli::commands::init::run(args, &global),
        Commands::Categories(args) => snipbar::cli::commands::categories::run(args, &global),
        Commands::Items(args) => snipbar::cli::commands::items::run(args, &global),
        Commands::Facets(args) => snipbar::cli::commands::facets::run(args, &global),
        Commands::Config(cmd) => snipbar::cli::commands::config::run(cmd, &global),
        Commands::Completions(args) => snipbar::cli::commands::completions::run(args),
    }
}

/// Log to stderr; `--verbose` forces debug, otherwise SNIPBAR_LOG or warn
fn init_tracing(verbose: bool) {
    let filter = if verbose {
        EnvFilter::new("snipbar=debug")
    } else {
        EnvFilter::try_from_env("SNIPBAR_LOG").unwrap_or_else(|_| EnvFilter::new("warn"))
    };

    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();
}
