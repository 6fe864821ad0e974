use clap::Parser;
use flock::cli::{Cli, Commands};
use miette::Result;

fn main() -> Result<()> {
    // Reset SIGPIPE to default behavior (terminate silently) for proper Unix piping.
    // Without this, piping to `head`, `grep -q`, etc. causes a panic on broken pipe.
    // This is standard practice for CLI tools that output to stdout.
    #[cfg(unix)]
    {
        unsafe {
            libc::signal(libc::SIGPIPE, libc::SIG_DFL);
        }
    }
    // Install miette's fancy error handler for beautiful diagnostics
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
        Commands::Init(args) => flock::cli::commands::init::run(args),
        Commands::Member(cmd) => flock::cli::commands::member::run(cmd, &global),
        Commands::Visitor(cmd) => flock::cli::commands::visitor::run(cmd, &global),
        Commands::Convert(cmd) => flock::cli::commands::convert::run(cmd, &global),
        Commands::Import(args) => flock::cli::commands::import::run(args, &global),
        Commands::Export(args) => flock::cli::commands::export::run(args, &global),
        Commands::Report(args) => flock::cli::commands::report::run(args, &global),
        Commands::Status(args) => flock::cli::commands::status::run(args, &global),
        Commands::Feed(cmd) => flock::cli::commands::feed::run(cmd, &global),
    }
}
