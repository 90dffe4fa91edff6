pub mod actions;
mod defaults;
pub mod key;
pub mod keybindings;
pub mod loader;
pub mod resolver;

use std::path::PathBuf;

pub use actions::*;
use keybindings::KeybindingsConfig;
pub use loader::{config_dir, data_dir, load};
pub use resolver::KeyResolver;
use serde::{Deserialize, Serialize};

use crate::cli::Args;

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ThemeConfig {
    pub name: String,
}

impl Default for ThemeConfig {
    fn default() -> Self {
        Self {
            name: "Catppuccin Mocha".to_string(),
        }
    }
}

/// Backend the catalog is fetched from and orders are posted to.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ApiConfig {
    pub base_url: String,
    pub timeout_secs: u64,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: "http://localhost:1337".to_string(),
            timeout_secs: 10,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct SessionConfig {
    /// Session file written by the website login. Defaults to `<data dir>/session.json`.
    pub path: Option<PathBuf>,
}

impl SessionConfig {
    pub fn resolved_path(&self) -> PathBuf {
        self.path.clone().unwrap_or_else(|| {
            data_dir().map_or_else(|| PathBuf::from("session.json"), |dir| dir.join("session.json"))
        })
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct OrderConfig {
    /// Delay between the "not logged in" toast and the jump to the authentication page.
    pub login_redirect_delay_ms: u64,
}

impl Default for OrderConfig {
    fn default() -> Self {
        Self {
            login_redirect_delay_ms: 1200,
        }
    }
}

/// The shop behind the catalog.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ShopConfig {
    /// Shown in the catalog footer; empty hides it.
    pub address: String,
}

impl Default for ShopConfig {
    fn default() -> Self {
        Self {
            address: "Jl. Sadarmanah No.155, Cibeber, Kec. Cimahi Sel., Kota Cimahi, Jawa Barat 15032"
                .to_string(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct AppConfig {
    #[serde(default)]
    pub theme: ThemeConfig,
    #[serde(default)]
    pub api: ApiConfig,
    #[serde(default)]
    pub session: SessionConfig,
    #[serde(default)]
    pub order: OrderConfig,
    #[serde(default)]
    pub shop: ShopConfig,
    #[serde(default)]
    pub keybindings: KeybindingsConfig,
}

impl AppConfig {
    /// Command line flags win over the config file.
    pub fn apply_cli_args(&mut self, args: &Args) {
        if let Some(url) = &args.api_url {
            self.api.base_url.clone_from(url);
        }
        if let Some(path) = &args.session {
            self.session.path = Some(path.clone());
        }
        if let Some(theme) = &args.theme {
            self.theme.name.clone_from(theme);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_file_uses_defaults() {
        let config: AppConfig = toml::from_str("").unwrap();
        assert_eq!(config.api.base_url, "http://localhost:1337");
        assert_eq!(config.api.timeout_secs, 10);
        assert_eq!(config.order.login_redirect_delay_ms, 1200);
        assert!(config.session.path.is_none());
    }

    #[test]
    fn test_partial_sections_keep_remaining_defaults() {
        let config: AppConfig = toml::from_str(
            r#"
            [api]
            base_url = "https://laundry.example"

            [keybindings.catalog]
            order = "p"
            "#,
        )
        .unwrap();

        assert_eq!(config.api.base_url, "https://laundry.example");
        assert_eq!(config.api.timeout_secs, 10);
        assert_eq!(config.keybindings.catalog.order.display(), "p");
        assert_eq!(config.keybindings.global.quit.display(), "q");
    }

    #[test]
    fn test_sections_without_keys_use_defaults() {
        let config: AppConfig = toml::from_str(
            r#"
            [theme]
            [shop]
            "#,
        )
        .unwrap();

        assert_eq!(config.theme.name, "Catppuccin Mocha");
        assert!(config.shop.address.contains("Cimahi"));
    }

    #[test]
    fn test_cli_args_override_file() {
        let mut config = AppConfig::default();
        let args = Args {
            api_url: Some("http://127.0.0.1:9000".to_string()),
            session: Some(PathBuf::from("/tmp/me.json")),
            theme: None,
        };
        config.apply_cli_args(&args);

        assert_eq!(config.api.base_url, "http://127.0.0.1:9000");
        assert_eq!(config.session.resolved_path(), PathBuf::from("/tmp/me.json"));
        assert_eq!(config.theme.name, "Catppuccin Mocha");
    }
}
