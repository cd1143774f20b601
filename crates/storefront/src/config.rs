//! Storefront runtime configuration and loaders.
use std::env;
use std::path::PathBuf;

use fulfillment_core::FactionId;

/// Settings that sit outside the engine's tuning file.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct StorefrontConfig {
    /// Directory holding `catalog.ron`, `world.ron` and optionally `config.toml`.
    pub data_dir: PathBuf,
    /// Faction credited with orders that name no requester.
    pub faction: FactionId,
    /// Reject quantities above an entry's cap instead of clamping them.
    pub strict_caps: bool,
}

impl Default for StorefrontConfig {
    fn default() -> Self {
        Self {
            data_dir: PathBuf::from("data"),
            faction: FactionId::PLAYER,
            strict_caps: true,
        }
    }
}

impl StorefrontConfig {
    /// Construct configuration from process environment variables.
    ///
    /// Environment variables:
    /// - `STOREFRONT_DATA_DIR` - Data directory (default: `data`)
    /// - `STOREFRONT_FACTION` - Faction id for unassigned orders (default: 0)
    /// - `STOREFRONT_STRICT_CAPS` - Reject over-cap quantities (default: true)
    pub fn from_env() -> Self {
        Self::from_vars(|key| env::var(key).ok())
    }

    /// Same as [`from_env`](Self::from_env) with an injectable variable source.
    pub fn from_vars(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let mut config = Self::default();

        if let Some(dir) = lookup("STOREFRONT_DATA_DIR").filter(|dir| !dir.is_empty()) {
            config.data_dir = PathBuf::from(dir);
        }

        if let Some(faction) = read_var::<u32>(&lookup, "STOREFRONT_FACTION") {
            config.faction = FactionId(faction);
        }

        if let Some(strict) = read_var::<bool>(&lookup, "STOREFRONT_STRICT_CAPS") {
            config.strict_caps = strict;
        }

        config
    }
}

fn read_var<T>(lookup: &impl Fn(&str) -> Option<String>, key: &str) -> Option<T>
where
    T: std::str::FromStr,
{
    lookup(key)?.trim().parse().ok()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn vars(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn defaults_without_variables() {
        assert_eq!(StorefrontConfig::from_vars(vars(&[])), StorefrontConfig::default());
    }

    #[test]
    fn reads_all_variables() {
        let config = StorefrontConfig::from_vars(vars(&[
            ("STOREFRONT_DATA_DIR", "/srv/colony"),
            ("STOREFRONT_FACTION", "4"),
            ("STOREFRONT_STRICT_CAPS", "false"),
        ]));
        assert_eq!(config.data_dir, PathBuf::from("/srv/colony"));
        assert_eq!(config.faction, FactionId(4));
        assert!(!config.strict_caps);
    }

    #[test]
    fn unparsable_values_keep_defaults() {
        let config = StorefrontConfig::from_vars(vars(&[
            ("STOREFRONT_FACTION", "pirates"),
            ("STOREFRONT_STRICT_CAPS", "maybe"),
        ]));
        assert_eq!(config.faction, FactionId::PLAYER);
        assert!(config.strict_caps);
    }
}
