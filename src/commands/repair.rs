// src/commands/repair.rs

//! Single-strategy repair commands

use anyhow::{anyhow, Context, Result};
use mojifix::{
    Action, ApplyOrder, Plan, SnippetPatch, Strategy, SubstitutionTable,
};
use tracing::info;

use super::{execute, targets_or_default};
use crate::cli::WriteArgs;

/// Parse `DAMAGED=FIXED`; the first `=` splits, so FIXED may contain `=`
fn parse_entry(raw: &str) -> Result<(String, String)> {
    let (damaged, fixed) = raw
        .split_once('=')
        .ok_or_else(|| anyhow!("Invalid entry '{}': expected DAMAGED=FIXED", raw))?;
    if damaged.is_empty() {
        return Err(anyhow!("Invalid entry '{}': DAMAGED is empty", raw));
    }
    Ok((damaged.to_string(), fixed.to_string()))
}

/// Build the table for `mojifix table` from named tables and --entry pairs
pub(crate) fn build_table(
    tables: &[String],
    entries: &[String],
    declared_order: bool,
) -> Result<SubstitutionTable> {
    let order = if declared_order {
        ApplyOrder::Declared
    } else {
        ApplyOrder::LongestFirst
    };

    let mut names: Vec<String> = tables.to_vec();
    if names.is_empty() && entries.is_empty() {
        names.push("german".to_string());
    }

    // --entry pairs go first so they override built-in keys
    let mut parts = Vec::with_capacity(names.len() + 1);
    if !entries.is_empty() {
        let pairs = entries
            .iter()
            .map(|e| parse_entry(e))
            .collect::<Result<Vec<_>>>()?;
        parts.push(SubstitutionTable::new("cli", pairs, order)?);
    }
    for name in &names {
        parts.push(SubstitutionTable::named(name, order)?);
    }

    let label = if names.is_empty() {
        "cli".to_string()
    } else {
        names.join("+")
    };
    Ok(SubstitutionTable::combine(label, parts, order)?)
}

pub fn cmd_table(
    root: &str,
    files: Vec<String>,
    tables: &[String],
    entries: &[String],
    declared_order: bool,
    write: WriteArgs,
) -> Result<()> {
    let table = build_table(tables, entries, declared_order)?;
    info!("Applying table '{}' ({} entries)", table.name(), table.len());

    let plan = Plan::new("table").with_step(
        Action::Repair(Strategy::Table(table)),
        targets_or_default(files),
    );
    execute(&plan, root, write)?;
    Ok(())
}

pub fn cmd_heuristic(root: &str, files: Vec<String>, write: WriteArgs) -> Result<()> {
    let plan = Plan::new("heuristic")
        .with_step(Action::Repair(Strategy::Heuristic), targets_or_default(files));
    execute(&plan, root, write)?;
    Ok(())
}

pub fn cmd_redecode(root: &str, files: Vec<String>, passes: u8, write: WriteArgs) -> Result<()> {
    let plan = Plan::new("redecode").with_step(
        Action::Repair(Strategy::Redecode { passes }),
        targets_or_default(files),
    );
    execute(&plan, root, write)?;
    Ok(())
}

pub fn cmd_patch(
    root: &str,
    file: String,
    find_file: &str,
    replace_file: &str,
    dry_run: bool,
) -> Result<()> {
    let find = std::fs::read_to_string(find_file)
        .with_context(|| format!("Failed to read snippet file {}", find_file))?;
    let replace = std::fs::read_to_string(replace_file)
        .with_context(|| format!("Failed to read snippet file {}", replace_file))?;
    if find.is_empty() {
        return Err(anyhow!("Snippet file {} is empty", find_file));
    }

    let plan = Plan::new("patch").with_step(
        Action::Patch(SnippetPatch::single(find, replace)),
        vec![file],
    );
    let write = WriteArgs {
        dry_run,
        no_verify_json: false,
    };
    execute(&plan, root, write)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_entry() {
        assert_eq!(
            parse_entry("Ã¶=ö").unwrap(),
            ("Ã¶".to_string(), "ö".to_string())
        );
        assert_eq!(
            parse_entry("a==b").unwrap(),
            ("a".to_string(), "=b".to_string())
        );
        assert_eq!(parse_entry("Â=").unwrap(), ("Â".to_string(), String::new()));
        assert!(parse_entry("no-separator").is_err());
        assert!(parse_entry("=x").is_err());
    }

    #[test]
    fn test_build_table_defaults_to_german() {
        let table = build_table(&[], &[], false).unwrap();
        assert_eq!(table.name(), "german");
        assert_eq!(table.apply("GrÃ¶ÃŸe"), "Größe");
    }

    #[test]
    fn test_build_table_entries_only() {
        let table = build_table(&[], &["Ã¶=ö".to_string(), "ÃŸ=ß".to_string()], true).unwrap();
        assert_eq!(table.name(), "cli");
        assert_eq!(table.order(), ApplyOrder::Declared);
        assert_eq!(table.apply("GrÃ¶ÃŸe"), "Größe");
    }

    #[test]
    fn test_entry_overrides_builtin_key() {
        let table = build_table(&["german".to_string()], &["Ã¶=oe".to_string()], false).unwrap();
        assert_eq!(table.name(), "german");
        assert_eq!(table.apply("GrÃ¶ÃŸe"), "Groeße");
    }

    #[test]
    fn test_build_table_unknown_name() {
        assert!(build_table(&["nope".to_string()], &[], false).is_err());
    }
}
