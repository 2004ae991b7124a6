use clap::Parser;
use miette::Result;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};
use wft::cli::{Cli, Commands, GlobalOpts};

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
    init_logging(&global);

    match cli.command {
        Commands::Init(args) => wft::cli::commands::init::run(args),
        Commands::Order(cmd) => wft::cli::commands::order::run(cmd, &global),
        Commands::Import(args) => wft::cli::commands::import::run(args, &global),
        Commands::Status(args) => wft::cli::commands::status::run(args, &global),
        Commands::Parts(args) => wft::cli::commands::parts::run(args, &global),
        Commands::Drift(args) => wft::cli::commands::drift::run(args, &global),
        Commands::Audit(args) => wft::cli::commands::audit::run(args, &global),
        Commands::Pick(cmd) => wft::cli::commands::pick::run(cmd, &global),
        Commands::Cleanup(args) => wft::cli::commands::cleanup::run(args, &global),
        Commands::Settings(cmd) => wft::cli::commands::settings::run(cmd, &global),
        Commands::Config(cmd) => wft::cli::commands::config::run(cmd, &global),
        Commands::Completions(args) => wft::cli::commands::completions::run(args),
    }
}

/// Logs go to stderr; RUST_LOG overrides the --quiet/--verbose default
fn init_logging(global: &GlobalOpts) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(global.log_filter()));

    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().with_writer(std::io::stderr).with_target(false))
        .init();
}
