use std::{collections::HashMap, fs};

use serde::Deserialize;
use tracing::warn;
use url::Url;

#[derive(Debug, Deserialize)]
pub struct Settings {
    pub api_base_url: String,
    pub strip_width: usize,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            api_base_url: "http://127.0.0.1:8443".into(),
            strip_width: catalog_core::DEFAULT_STRIP_WIDTH,
        }
    }
}

pub fn load_settings() -> Settings {
    let mut settings = Settings::default();

    if let Ok(raw) = fs::read_to_string("storefront.toml") {
        if let Ok(file_cfg) = toml::from_str::<HashMap<String, String>>(&raw) {
            if let Some(v) = file_cfg.get("api_base_url") {
                settings.api_base_url = v.clone();
            }
            if let Some(v) = file_cfg.get("strip_width") {
                if let Ok(parsed) = v.parse::<usize>() {
                    settings.strip_width = parsed;
                }
            }
        }
    }

    if let Ok(v) = std::env::var("STOREFRONT_API_URL") {
        settings.api_base_url = v;
    }
    if let Ok(v) = std::env::var("APP__API_URL") {
        settings.api_base_url = v;
    }

    if let Ok(v) = std::env::var("APP__STRIP_WIDTH") {
        if let Ok(parsed) = v.parse::<usize>() {
            settings.strip_width = parsed;
        }
    }

    normalize_settings(settings)
}

fn normalize_settings(mut settings: Settings) -> Settings {
    let defaults = Settings::default();

    match Url::parse(&settings.api_base_url) {
        Ok(_) => {
            settings.api_base_url = settings.api_base_url.trim_end_matches('/').to_string();
        }
        Err(err) => {
            warn!(
                "invalid api_base_url '{}', falling back to default: {err}",
                settings.api_base_url
            );
            settings.api_base_url = defaults.api_base_url;
        }
    }

    if settings.strip_width == 0 {
        settings.strip_width = defaults.strip_width;
    }

    settings
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn trims_trailing_slash_from_valid_base_url() {
        let settings = normalize_settings(Settings {
            api_base_url: "http://shop.example:9000/".into(),
            strip_width: 6,
        });
        assert_eq!(settings.api_base_url, "http://shop.example:9000");
    }

    #[test]
    fn rejects_unparseable_base_url_back_to_default() {
        let settings = normalize_settings(Settings {
            api_base_url: "not a url".into(),
            strip_width: 6,
        });
        assert_eq!(settings.api_base_url, Settings::default().api_base_url);
    }

    #[test]
    fn zero_strip_width_falls_back_to_default() {
        let settings = normalize_settings(Settings {
            api_base_url: "http://shop.example".into(),
            strip_width: 0,
        });
        assert_eq!(settings.strip_width, catalog_core::DEFAULT_STRIP_WIDTH);
    }
}
