//! Theme shop commands.
//!
//! Prices come from the built-in catalog; the ledger only enforces balance
//! and ownership.

use chrono::Utc;
use clap::Subcommand;
use focusquest_core::{play_cue, themes, Config, Cue, Event, CATALOG};
use serde::Serialize;

use super::{emit, open_ledger, synthesizer, CliResult};

#[derive(Subcommand)]
pub enum ShopAction {
    /// List themes with price and ownership
    List,
    /// Buy a theme with coins
    Buy {
        /// Theme ID (e.g. "matrix", "ice", "gold")
        id: String,
    },
    /// Equip an owned theme
    Equip {
        /// Theme ID
        id: String,
    },
}

#[derive(Serialize)]
struct ShopEntry {
    id: &'static str,
    name: &'static str,
    cost: u64,
    color: &'static str,
    unlocked: bool,
    equipped: bool,
    affordable: bool,
}

pub fn run(action: ShopAction) -> CliResult {
    let config = Config::load_or_default();
    let mut ledger = open_ledger(&config)?;

    match action {
        ShopAction::List => {
            let entries: Vec<ShopEntry> = CATALOG
                .iter()
                .map(|theme| ShopEntry {
                    id: theme.id,
                    name: theme.name,
                    cost: theme.cost,
                    color: theme.color,
                    unlocked: ledger.is_unlocked(theme.id),
                    equipped: ledger.equipped_theme() == theme.id,
                    affordable: ledger.currency() >= theme.cost,
                })
                .collect();
            println!("{}", serde_json::to_string_pretty(&entries)?);
        }
        ShopAction::Buy { id } => {
            let theme = themes::find(&id).ok_or_else(|| format!("unknown theme: {id}"))?;
            if ledger.is_unlocked(theme.id) {
                return Err(format!("theme '{id}' is already unlocked").into());
            }
            if !ledger.purchase_theme(theme.id, theme.cost)? {
                return Err(format!(
                    "not enough coins for '{id}': have {}, need {}",
                    ledger.currency(),
                    theme.cost
                )
                .into());
            }
            emit(&Event::ThemePurchased {
                theme_id: theme.id.to_string(),
                cost: theme.cost,
                currency_left: ledger.currency(),
                at: Utc::now(),
            })?;
            play_cue(synthesizer(&config).as_mut(), Cue::LevelUp);
        }
        ShopAction::Equip { id } => {
            if !ledger.equip_theme(&id)? {
                return Err(format!("theme '{id}' is locked").into());
            }
            emit(&Event::ThemeEquipped {
                theme_id: id,
                at: Utc::now(),
            })?;
        }
    }
    Ok(())
}
