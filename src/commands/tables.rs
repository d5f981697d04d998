// src/commands/tables.rs

//! Built-in table listing

use anyhow::Result;
use mojifix::{ApplyOrder, BuiltinTable, SubstitutionTable};
use strum::IntoEnumIterator;

pub fn cmd_tables(show: Option<&str>) -> Result<()> {
    if let Some(name) = show {
        let table = SubstitutionTable::named(name, ApplyOrder::LongestFirst)?;
        println!("Table '{}' ({} entries):", table.name(), table.len());
        for (damaged, fixed) in table.entries() {
            // escape_debug keeps no-break spaces and C1 controls visible
            println!(
                "  {:<12} -> {}",
                damaged.escape_debug().to_string(),
                fixed.escape_debug()
            );
        }
        return Ok(());
    }

    println!("Built-in tables:");
    for builtin in BuiltinTable::iter() {
        let table = SubstitutionTable::builtin(builtin, ApplyOrder::LongestFirst)?;
        println!(
            "  {:<12} {:>3} entries  {}",
            builtin.as_ref(),
            table.len(),
            builtin.description()
        );
    }
    Ok(())
}
