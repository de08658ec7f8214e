use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Global configuration (stored in ~/.config/tasksheet/)
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct GlobalConfig {
    /// Override for the sheets data file. Defaults to sheets.json in the
    /// data directory.
    #[serde(default)]
    pub data_file: Option<PathBuf>,

    /// UI theme/colors
    #[serde(default)]
    pub theme: ThemeConfig,
}

/// Theme configuration with hex colors
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ThemeConfig {
    /// Sheet background colors offered by the palette popup
    #[serde(default = "default_palette")]
    pub palette: Vec<String>,

    /// Border color for the selected sheet (hex, e.g. "#FFFF00")
    #[serde(default = "default_color_selected")]
    pub color_selected: String,

    /// Border color for unselected sheets (hex, e.g. "#00FFFF")
    #[serde(default = "default_color_normal")]
    pub color_normal: String,

    /// Text color for sheet headings (hex, e.g. "#FFFFFF")
    #[serde(default = "default_color_text")]
    pub color_text: String,

    /// Color for task dates (hex, e.g. "#AAAAAA")
    #[serde(default = "default_color_date")]
    pub color_date: String,

    /// Color for popup borders (hex, e.g. "#00FF00")
    #[serde(default = "default_color_popup_border")]
    pub color_popup_border: String,
}

impl Default for ThemeConfig {
    fn default() -> Self {
        Self {
            palette: default_palette(),
            color_selected: default_color_selected(),
            color_normal: default_color_normal(),
            color_text: default_color_text(),
            color_date: default_color_date(),
            color_popup_border: default_color_popup_border(),
        }
    }
}

fn default_palette() -> Vec<String> {
    [
        "#f28b82", // Coral
        "#BB2649", // Viva Magenta
        "#FFC196", // Peach
        "#55B4B0", // Turquoise
        "#6667AB", // Very Peri
        "#cbf0f8", // Light Blue
        "#d7aefb", // Lavender
    ]
    .iter()
    .map(|s| s.to_string())
    .collect()
}

fn default_color_selected() -> String {
    "#ead49a".to_string() // Yellow
}

fn default_color_normal() -> String {
    "#9C9991".to_string() // Dark Gray
}

fn default_color_text() -> String {
    "#f2ece6".to_string() // Light Rose
}

fn default_color_date() -> String {
    "#C4B0AC".to_string() // Rose (dimmed)
}

fn default_color_popup_border() -> String {
    "#9ffcf8".to_string() // Light Cyan
}

impl ThemeConfig {
    /// Parse a hex color string to RGB tuple
    pub fn parse_hex(hex: &str) -> Option<(u8, u8, u8)> {
        let hex = hex.trim_start_matches('#');
        if hex.len() != 6 || !hex.is_ascii() {
            return None;
        }
        let r = u8::from_str_radix(&hex[0..2], 16).ok()?;
        let g = u8::from_str_radix(&hex[2..4], 16).ok()?;
        let b = u8::from_str_radix(&hex[4..6], 16).ok()?;
        Some((r, g, b))
    }
}

impl GlobalConfig {
    /// Load global config from default location
    pub fn load() -> Result<Self> {
        let config_path = Self::config_path()?;

        if config_path.exists() {
            let content = std::fs::read_to_string(&config_path)
                .with_context(|| format!("Failed to read config from {:?}", config_path))?;
            toml::from_str(&content).context("Failed to parse global config")
        } else {
            Ok(Self::default())
        }
    }

    /// Save global config to default location
    pub fn save(&self) -> Result<()> {
        let config_path = Self::config_path()?;

        if let Some(parent) = config_path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let content = toml::to_string_pretty(self)?;
        std::fs::write(&config_path, content)?;

        Ok(())
    }

    /// Get the path to the global config file
    /// Always uses ~/.config/tasksheet/ on all platforms
    pub fn config_path() -> Result<PathBuf> {
        let home = std::env::var("HOME").context("Could not determine home directory")?;
        Ok(PathBuf::from(home)
            .join(".config")
            .join("tasksheet")
            .join("config.toml"))
    }

    /// Get the path to the global data directory
    pub fn data_dir() -> Result<PathBuf> {
        let dirs = directories::ProjectDirs::from("", "", "tasksheet")
            .context("Could not determine data directory")?;
        Ok(dirs.data_dir().to_path_buf())
    }

    /// Resolve the sheets data file: explicit override first, then the
    /// configured path, then the default location in the data directory.
    pub fn sheets_path(&self, override_path: Option<PathBuf>) -> Result<PathBuf> {
        if let Some(path) = override_path {
            return Ok(path);
        }
        if let Some(ref path) = self.data_file {
            return Ok(path.clone());
        }
        Ok(Self::data_dir()?.join("sheets.json"))
    }
}
