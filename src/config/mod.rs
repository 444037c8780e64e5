//! Configuration: a small key=value file overlaid by environment variables.

use std::{
    collections::HashMap,
    env, fs,
    io::{BufRead, BufReader},
    path::PathBuf,
};

use directories::BaseDirs;

use crate::dataset::RenderOptions;

#[derive(Debug, Clone)]
pub struct Config {
    inner: HashMap<String, String>,
    pub config_path: PathBuf,
}

impl Config {
    pub fn load() -> Self {
        let mut map = default_map();
        let config_path = default_config_path();

        // Read the rc file if it exists
        if config_path.exists() {
            if let Ok(file) = fs::File::open(&config_path) {
                let reader = BufReader::new(file);
                for line in reader.lines().map_while(Result::ok) {
                    let line = line.trim();
                    if line.is_empty() || line.starts_with('#') {
                        continue;
                    }
                    if let Some((k, v)) = line.split_once('=') {
                        map.insert(k.trim().to_string(), v.trim().to_string());
                    }
                }
            }
        }

        // Overlay environment variables (take precedence)
        for (k, v) in env::vars() {
            if is_config_key(&k) {
                map.insert(k, v);
            }
        }

        Self { inner: map, config_path }
    }

    pub fn get(&self, key: &str) -> Option<String> {
        // ENV first
        if let Ok(v) = env::var(key) {
            return Some(v);
        }
        self.inner.get(key).cloned()
    }

    pub fn get_bool(&self, key: &str) -> bool {
        self.get(key)
            .map(|v| v.eq_ignore_ascii_case("true"))
            .unwrap_or(false)
    }

    pub fn get_usize(&self, key: &str) -> Option<usize> {
        self.get(key).and_then(|v| v.parse::<usize>().ok())
    }

    pub fn get_u16(&self, key: &str) -> Option<u16> {
        self.get(key).and_then(|v| v.parse::<u16>().ok())
    }

    /// Rendering knobs for frame text and tables.
    pub fn render_options(&self) -> RenderOptions {
        let defaults = RenderOptions::default();
        RenderOptions {
            precision: self.get_usize("FLOAT_PRECISION").unwrap_or(defaults.precision),
            max_rows: self.get_usize("TABLE_MAX_ROWS").unwrap_or(defaults.max_rows),
        }
    }

    /// Fixed display size for collected figures, in terminal cells.
    pub fn chart_size(&self) -> (u16, u16) {
        (
            self.get_u16("CHART_WIDTH").unwrap_or(60),
            self.get_u16("CHART_HEIGHT").unwrap_or(16),
        )
    }
}

fn is_config_key(k: &str) -> bool {
    const KEYS: &[&str] = &[
        "TABLE_MAX_ROWS",
        "FLOAT_PRECISION",
        "CHART_WIDTH",
        "CHART_HEIGHT",
        "PRETTIFY_MARKDOWN",
    ];

    KEYS.contains(&k) || k.starts_with("DATATUTOR_")
}

fn default_config_path() -> PathBuf {
    let base = BaseDirs::new()
        .map(|b| b.config_dir().to_path_buf())
        .unwrap_or_else(|| PathBuf::from("~/.config"));
    base.join("datatutor").join("config")
}

fn default_map() -> HashMap<String, String> {
    let mut m = HashMap::new();

    // Numbers
    m.insert("TABLE_MAX_ROWS".into(), "60".into());
    m.insert("FLOAT_PRECISION".into(), "4".into());
    m.insert("CHART_WIDTH".into(), "60".into());
    m.insert("CHART_HEIGHT".into(), "16".into());

    // Bools as strings
    m.insert("PRETTIFY_MARKDOWN".into(), "true".into());

    m
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_present() {
        let cfg = Config::load();
        let render = cfg.render_options();
        assert!(render.precision > 0);
        assert!(render.max_rows > 0);
        let (w, h) = cfg.chart_size();
        assert!(w > 0 && h > 0);
    }
}
