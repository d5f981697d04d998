// src/plan/presets.rs

//! Built-in plans for the usual targets of a Next.js-style app: the two
//! message catalogs and the events page that shipped with mojibake.

use strum_macros::{AsRefStr, Display, EnumIter, EnumString};

use super::{Action, Plan};
use crate::error::Result;
use crate::repair::{ApplyOrder, BuiltinTable, Strategy, SubstitutionTable, MAX_REDECODE_PASSES};

/// Localization catalogs, relative to the project root
pub const MESSAGE_CATALOGS: [&str; 2] = ["src/messages/de.json", "src/messages/en.json"];

/// UI page with hardcoded German text
pub const EVENTS_PAGE: &str = "src/app/[locale]/events/page.tsx";

/// Targets used when a repair command is given no files
pub fn default_targets() -> Vec<String> {
    MESSAGE_CATALOGS
        .iter()
        .copied()
        .chain(std::iter::once(EVENTS_PAGE))
        .map(String::from)
        .collect()
}

fn catalogs() -> Vec<String> {
    MESSAGE_CATALOGS.iter().map(|s| s.to_string()).collect()
}

/// Built-in plans
#[derive(Debug, Clone, Copy, PartialEq, Eq, EnumString, Display, EnumIter, AsRefStr)]
#[strum(serialize_all = "kebab-case")]
pub enum Preset {
    /// German table over catalogs and the events page
    Umlauts,
    /// German and punctuation tables over the catalogs
    Catalogs,
    /// Heuristic repair over catalogs and the events page
    FixText,
    /// One blind re-decode cycle
    Redecode,
    /// Up to three blind re-decode cycles
    RedecodeDeep,
}

impl Preset {
    pub fn description(&self) -> &'static str {
        match self {
            Self::Umlauts => "Replace umlaut mojibake (Ã¤ Ã¶ Ã¼ ÃŸ ...) in catalogs and events page",
            Self::Catalogs => "Replace umlaut and punctuation mojibake in the message catalogs",
            Self::FixText => "Detect and decode UTF-8-as-Windows-1252 runs everywhere",
            Self::Redecode => "Re-decode Latin-1 bytes as UTF-8 once (fails closed)",
            Self::RedecodeDeep => "Re-decode Latin-1 bytes as UTF-8 up to three times",
        }
    }

    /// Build the preset's plan
    pub fn plan(&self) -> Result<Plan> {
        let order = ApplyOrder::LongestFirst;
        let action = match self {
            Self::Umlauts => Action::Repair(Strategy::Table(SubstitutionTable::builtin(
                BuiltinTable::German,
                order,
            )?)),
            Self::Catalogs => {
                let tables = [
                    SubstitutionTable::builtin(BuiltinTable::German, order)?,
                    SubstitutionTable::builtin(BuiltinTable::Punctuation, order)?,
                ];
                Action::Repair(Strategy::Table(SubstitutionTable::combine(
                    "german+punctuation",
                    tables,
                    order,
                )?))
            }
            Self::FixText => Action::Repair(Strategy::Heuristic),
            Self::Redecode => Action::Repair(Strategy::Redecode { passes: 1 }),
            Self::RedecodeDeep => Action::Repair(Strategy::Redecode {
                passes: MAX_REDECODE_PASSES,
            }),
        };

        let targets = match self {
            Self::Catalogs => catalogs(),
            _ => default_targets(),
        };

        Ok(Plan::new(self.as_ref())
            .with_description(self.description())
            .with_step(action, targets))
    }
}
