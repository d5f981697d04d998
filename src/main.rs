// src/main.rs

use anyhow::Result;
use clap::{CommandFactory, Parser};

mod cli;
mod commands;

use cli::{Cli, Commands};

fn main() -> Result<()> {
    // Successful runs stay quiet unless RUST_LOG asks for more
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let root = cli.root.as_str();

    match cli.command {
        Some(Commands::Table {
            files,
            tables,
            entries,
            declared_order,
            write,
        }) => commands::cmd_table(root, files, &tables, &entries, declared_order, write),

        Some(Commands::Heuristic { files, write }) => {
            commands::cmd_heuristic(root, files, write)
        }

        Some(Commands::Redecode {
            files,
            passes,
            write,
        }) => commands::cmd_redecode(root, files, passes, write),

        Some(Commands::Patch {
            file,
            find_file,
            replace_file,
            dry_run,
        }) => commands::cmd_patch(root, file, &find_file, &replace_file, dry_run),

        Some(Commands::Run {
            plan,
            preset,
            json,
            write,
        }) => commands::cmd_run(root, plan.as_deref(), preset.as_deref(), json, write),

        Some(Commands::Presets) => commands::cmd_presets(),

        Some(Commands::Tables { show }) => commands::cmd_tables(show.as_deref()),

        Some(Commands::Scan { paths, json }) => commands::cmd_scan(root, paths, json),

        Some(Commands::Completions { shell }) => {
            clap_complete::generate(shell, &mut Cli::command(), "mojifix", &mut std::io::stdout());
            Ok(())
        }

        None => {
            // No command provided, show help
            println!("mojifix v{}", env!("CARGO_PKG_VERSION"));
            println!("Run 'mojifix --help' for usage information");
            Ok(())
        }
    }
}
