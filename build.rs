// build.rs

use clap::{Arg, ArgAction, Command};
use clap_mangen::Man;
use std::env;
use std::fs;
use std::path::PathBuf;

/// Common argument: target files or patterns
fn files_arg() -> Arg {
    Arg::new("files")
        .num_args(0..)
        .help("Files or glob patterns (default: message catalogs and events page)")
}

/// Common argument: dry run
fn dry_run_arg() -> Arg {
    Arg::new("dry_run")
        .long("dry-run")
        .action(ArgAction::SetTrue)
        .help("Show a diff of what would change without writing anything")
}

/// Common argument: disable the JSON write guard
fn no_verify_json_arg() -> Arg {
    Arg::new("no_verify_json")
        .long("no-verify-json")
        .action(ArgAction::SetTrue)
        .help("Allow writes that leave a .json file unparseable")
}

fn build_cli() -> Command {
    Command::new("mojifix")
        .version(env!("CARGO_PKG_VERSION"))
        .author("Mojifix Contributors")
        .about("Repair mojibake in localization files and UI sources")
        .subcommand_required(false)
        .arg(
            Arg::new("root")
                .short('C')
                .long("root")
                .global(true)
                .default_value(".")
                .help("Project root that target paths are relative to"),
        )
        .subcommand(
            Command::new("table")
                .about("Apply substitution tables (default: the german table)")
                .arg(files_arg())
                .arg(
                    Arg::new("table")
                        .short('t')
                        .long("table")
                        .value_name("NAME")
                        .action(ArgAction::Append)
                        .help("Built-in table to apply; repeat to combine tables"),
                )
                .arg(
                    Arg::new("entry")
                        .short('e')
                        .long("entry")
                        .value_name("DAMAGED=FIXED")
                        .action(ArgAction::Append)
                        .help("Extra substitution; repeatable"),
                )
                .arg(
                    Arg::new("declared_order")
                        .long("declared-order")
                        .action(ArgAction::SetTrue)
                        .help("Apply entries in declared order instead of longest-first"),
                )
                .arg(dry_run_arg())
                .arg(no_verify_json_arg()),
        )
        .subcommand(
            Command::new("heuristic")
                .about("Detect and decode UTF-8-as-Windows-1252 sequences")
                .arg(files_arg())
                .arg(dry_run_arg())
                .arg(no_verify_json_arg()),
        )
        .subcommand(
            Command::new("redecode")
                .about("Re-decode each file's Latin-1 bytes as UTF-8, keeping it unchanged on failure")
                .arg(files_arg())
                .arg(
                    Arg::new("passes")
                        .short('p')
                        .long("passes")
                        .default_value("1")
                        .help("Number of cycles to attempt (1-3)"),
                )
                .arg(dry_run_arg())
                .arg(no_verify_json_arg()),
        )
        .subcommand(
            Command::new("patch")
                .about("Replace an exact snippet in a file; fails without writing if it is not found exactly once")
                .arg(Arg::new("file").required(true).help("File to patch"))
                .arg(
                    Arg::new("find_file")
                        .long("find-file")
                        .value_name("PATH")
                        .required(true)
                        .help("File holding the exact text expected in FILE"),
                )
                .arg(
                    Arg::new("replace_file")
                        .long("replace-file")
                        .value_name("PATH")
                        .required(true)
                        .help("File holding the replacement text"),
                )
                .arg(dry_run_arg()),
        )
        .subcommand(
            Command::new("run")
                .about("Run a plan file or a built-in preset")
                .arg(Arg::new("plan").help("Path to a plan TOML file"))
                .arg(
                    Arg::new("preset")
                        .short('p')
                        .long("preset")
                        .help("Built-in preset to run instead of a plan file"),
                )
                .arg(
                    Arg::new("json")
                        .long("json")
                        .action(ArgAction::SetTrue)
                        .help("Print the run report as JSON"),
                )
                .arg(dry_run_arg())
                .arg(no_verify_json_arg()),
        )
        .subcommand(Command::new("presets").about("List built-in presets"))
        .subcommand(
            Command::new("tables")
                .about("List built-in substitution tables")
                .arg(
                    Arg::new("show")
                        .long("show")
                        .value_name("NAME")
                        .help("Print every entry of the named table"),
                ),
        )
        .subcommand(
            Command::new("scan")
                .about("Report suspected mojibake without changing anything")
                .arg(
                    Arg::new("paths")
                        .num_args(0..)
                        .help("Files, directories or glob patterns"),
                )
                .arg(
                    Arg::new("json")
                        .long("json")
                        .action(ArgAction::SetTrue)
                        .help("Output findings as JSON"),
                ),
        )
        .subcommand(
            Command::new("completions")
                .about("Generate shell completion scripts")
                .arg(Arg::new("shell").required(true).help("Shell to generate completions for")),
        )
}

fn main() {
    println!("cargo:rerun-if-changed=build.rs");

    let manifest_dir = match env::var("CARGO_MANIFEST_DIR") {
        Ok(dir) => PathBuf::from(dir),
        Err(e) => {
            println!("cargo:warning=CARGO_MANIFEST_DIR not set: {}", e);
            return;
        }
    };
    let man_dir = manifest_dir.join("man");

    if let Err(e) = fs::create_dir_all(&man_dir) {
        println!("cargo:warning=Failed to create man directory: {}", e);
        return;
    }

    let man = Man::new(build_cli());
    let mut buffer = Vec::new();

    if let Err(e) = man.render(&mut buffer) {
        println!("cargo:warning=Failed to render man page: {}", e);
        return;
    }

    let man_path = man_dir.join("mojifix.1");
    if let Err(e) = fs::write(&man_path, buffer) {
        println!("cargo:warning=Failed to write man page: {}", e);
    }
}
