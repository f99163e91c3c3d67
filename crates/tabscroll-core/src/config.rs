use serde::{Deserialize, Serialize};
use std::path::PathBuf;

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AppConfig {
    #[serde(default)]
    pub general: GeneralConfig,
    #[serde(default)]
    pub ui: UiConfig,
    #[serde(default)]
    pub autoscroll: AutoScrollConfig,
    #[serde(default)]
    pub manual_scroll: ManualScrollConfig,
    #[serde(default)]
    pub keymap: KeymapConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GeneralConfig {
    /// Data directory path (log file lives here)
    #[serde(default = "default_data_dir")]
    pub data_dir: PathBuf,
    /// Log level, overridden by RUST_LOG
    #[serde(default = "default_log_level")]
    pub log_level: String,
}

impl Default for GeneralConfig {
    fn default() -> Self {
        Self {
            data_dir: default_data_dir(),
            log_level: default_log_level(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UiConfig {
    /// Idle event poll rate in milliseconds
    #[serde(default = "default_tick_rate")]
    pub tick_rate_ms: u64,
    /// Frame rate while scrolling or animating
    #[serde(default = "default_animation_fps")]
    pub animation_fps: u32,
    /// Show the bottom status bar
    #[serde(default = "default_true")]
    pub show_status_bar: bool,
    #[serde(default)]
    pub theme: ThemeConfig,
}

impl Default for UiConfig {
    fn default() -> Self {
        Self {
            tick_rate_ms: default_tick_rate(),
            animation_fps: default_animation_fps(),
            show_status_bar: default_true(),
            theme: ThemeConfig::default(),
        }
    }
}

/// Theme name plus optional hex colour overrides
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ThemeConfig {
    #[serde(default = "default_theme_name")]
    pub name: String,
    #[serde(default)]
    pub colors: ThemeColorOverrides,
}

impl Default for ThemeConfig {
    fn default() -> Self {
        Self {
            name: default_theme_name(),
            colors: ThemeColorOverrides::default(),
        }
    }
}

/// Each color is a hex string ("#ff0000" or "ff0000")
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ThemeColorOverrides {
    pub bg0: Option<String>,
    pub bg1: Option<String>,
    pub fg0: Option<String>,
    pub fg1: Option<String>,
    pub accent: Option<String>,
    pub muted: Option<String>,
    pub running: Option<String>,
    pub suspended: Option<String>,
    pub error: Option<String>,
}

/// Auto-scroll behaviour
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AutoScrollConfig {
    /// Speed applied when the viewer starts (0 = auto-scroll off)
    #[serde(default)]
    pub initial_speed: f64,
    /// Fine speed adjustment per key press
    #[serde(default = "default_speed_step")]
    pub speed_step: f64,
    /// Coarse speed adjustment per key press
    #[serde(default = "default_coarse_speed_step")]
    pub coarse_speed_step: f64,
    /// Offset advance per tick, in scroll units
    #[serde(default = "default_step_units")]
    pub step_units: f64,
    /// Scroll units per terminal row
    #[serde(default = "default_units_per_line")]
    pub units_per_line: f64,
    /// Speed restored by the toggle key when no previous speed is known
    #[serde(default = "default_resume_speed")]
    pub resume_speed: f64,
}

impl Default for AutoScrollConfig {
    fn default() -> Self {
        Self {
            initial_speed: 0.0,
            speed_step: default_speed_step(),
            coarse_speed_step: default_coarse_speed_step(),
            step_units: default_step_units(),
            units_per_line: default_units_per_line(),
            resume_speed: default_resume_speed(),
        }
    }
}

/// Easing curve for manual scroll animations
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EasingType {
    None,
    Linear,
    Cubic,
    EaseOut,
}

impl Default for EasingType {
    fn default() -> Self {
        EasingType::Cubic
    }
}

/// Keyboard and mouse-wheel scrolling
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ManualScrollConfig {
    #[serde(default = "default_true")]
    pub smooth_enabled: bool,
    #[serde(default = "default_animation_duration")]
    pub animation_duration_ms: u64,
    #[serde(default)]
    pub easing: EasingType,
    /// Rows moved per mouse wheel notch
    #[serde(default = "default_wheel_lines")]
    pub wheel_lines: u16,
}

impl Default for ManualScrollConfig {
    fn default() -> Self {
        Self {
            smooth_enabled: default_true(),
            animation_duration_ms: default_animation_duration(),
            easing: EasingType::default(),
            wheel_lines: default_wheel_lines(),
        }
    }
}

/// Keymap configuration using Vim-style notation
/// Format: "j", "<C-d>" (Ctrl+d), "G" (Shift+g), "<CR>", "<Esc>", "<Space>"
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct KeymapConfig {
    #[serde(default = "default_key_quit")]
    pub quit: String,

    // Auto-scroll speed
    #[serde(default = "default_key_speed_up")]
    pub speed_up: String,
    #[serde(default = "default_key_speed_down")]
    pub speed_down: String,
    #[serde(default = "default_key_speed_up_coarse")]
    pub speed_up_coarse: String,
    #[serde(default = "default_key_speed_down_coarse")]
    pub speed_down_coarse: String,
    /// Toggle between speed 0 and the last non-zero speed
    #[serde(default = "default_key_toggle_autoscroll")]
    pub toggle_autoscroll: String,
    /// Pause auto-scroll while held (press again to release)
    #[serde(default = "default_key_hold")]
    pub hold: String,

    // Manual scrolling
    #[serde(default = "default_key_line_down")]
    pub line_down: String,
    #[serde(default = "default_key_line_up")]
    pub line_up: String,
    #[serde(default = "default_key_half_page_down")]
    pub half_page_down: String,
    #[serde(default = "default_key_half_page_up")]
    pub half_page_up: String,
    #[serde(default = "default_key_page_down")]
    pub page_down: String,
    #[serde(default = "default_key_page_up")]
    pub page_up: String,
    #[serde(default = "default_key_jump_to_top")]
    pub jump_to_top: String,
    #[serde(default = "default_key_jump_to_bottom")]
    pub jump_to_bottom: String,

    // Documents
    #[serde(default = "default_key_open_file")]
    pub open_file: String,
    #[serde(default = "default_key_close_file")]
    pub close_file: String,
    #[serde(default = "default_key_help")]
    pub help: String,
}

impl Default for KeymapConfig {
    fn default() -> Self {
        Self {
            quit: default_key_quit(),
            speed_up: default_key_speed_up(),
            speed_down: default_key_speed_down(),
            speed_up_coarse: default_key_speed_up_coarse(),
            speed_down_coarse: default_key_speed_down_coarse(),
            toggle_autoscroll: default_key_toggle_autoscroll(),
            hold: default_key_hold(),
            line_down: default_key_line_down(),
            line_up: default_key_line_up(),
            half_page_down: default_key_half_page_down(),
            half_page_up: default_key_half_page_up(),
            page_down: default_key_page_down(),
            page_up: default_key_page_up(),
            jump_to_top: default_key_jump_to_top(),
            jump_to_bottom: default_key_jump_to_bottom(),
            open_file: default_key_open_file(),
            close_file: default_key_close_file(),
            help: default_key_help(),
        }
    }
}

fn default_key_quit() -> String { "q".to_string() }
fn default_key_speed_up() -> String { "+".to_string() }
fn default_key_speed_down() -> String { "-".to_string() }
fn default_key_speed_up_coarse() -> String { "]".to_string() }
fn default_key_speed_down_coarse() -> String { "[".to_string() }
fn default_key_toggle_autoscroll() -> String { "s".to_string() }
fn default_key_hold() -> String { "<Space>".to_string() }
fn default_key_line_down() -> String { "j".to_string() }
fn default_key_line_up() -> String { "k".to_string() }
fn default_key_half_page_down() -> String { "<C-d>".to_string() }
fn default_key_half_page_up() -> String { "<C-u>".to_string() }
fn default_key_page_down() -> String { "<C-f>".to_string() }
fn default_key_page_up() -> String { "<C-b>".to_string() }
fn default_key_jump_to_top() -> String { "gg".to_string() }
fn default_key_jump_to_bottom() -> String { "G".to_string() }
fn default_key_open_file() -> String { "o".to_string() }
fn default_key_close_file() -> String { "x".to_string() }
fn default_key_help() -> String { "?".to_string() }

fn default_data_dir() -> PathBuf {
    dirs::data_local_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("tabscroll")
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_true() -> bool {
    true
}

fn default_tick_rate() -> u64 {
    100
}

fn default_animation_fps() -> u32 {
    60
}

fn default_theme_name() -> String {
    "gruvbox-dark".to_string()
}

fn default_speed_step() -> f64 {
    0.1
}

fn default_coarse_speed_step() -> f64 {
    1.0
}

fn default_step_units() -> f64 {
    1.0
}

fn default_units_per_line() -> f64 {
    16.0 // roughly one line of 16pt text
}

fn default_resume_speed() -> f64 {
    1.0
}

fn default_animation_duration() -> u64 {
    150
}

fn default_wheel_lines() -> u16 {
    3
}

/// Expand tilde (~) in path to user's home directory
pub fn expand_tilde(path: &std::path::Path) -> PathBuf {
    match path.to_str() {
        Some("~") => dirs::home_dir().unwrap_or_else(|| path.to_path_buf()),
        Some(s) => match (s.strip_prefix("~/"), dirs::home_dir()) {
            (Some(rest), Some(home)) => home.join(rest),
            _ => path.to_path_buf(),
        },
        None => path.to_path_buf(),
    }
}

impl AppConfig {
    /// Load configuration from the default path, or defaults if absent
    pub fn load() -> crate::Result<Self> {
        Self::load_from(&Self::config_path())
    }

    /// Load configuration from a specific file, or defaults if absent
    pub fn load_from(path: &std::path::Path) -> crate::Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }
        let content = std::fs::read_to_string(path)?;
        Self::from_toml(&content)
    }

    /// Parse configuration from a TOML string
    pub fn from_toml(content: &str) -> crate::Result<Self> {
        toml::from_str(content).map_err(|e| crate::Error::Config(e.to_string()))
    }

    /// Render configuration as pretty TOML
    pub fn to_toml(&self) -> crate::Result<String> {
        toml::to_string_pretty(self).map_err(|e| crate::Error::Config(e.to_string()))
    }

    /// Save configuration to the default path
    pub fn save(&self) -> crate::Result<()> {
        let config_path = Self::config_path();

        if let Some(parent) = config_path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        std::fs::write(&config_path, self.to_toml()?)?;
        Ok(())
    }

    /// Always ~/.config/tabscroll/config.toml on all platforms
    pub fn config_path() -> PathBuf {
        dirs::home_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join(".config")
            .join("tabscroll")
            .join("config.toml")
    }

    /// Get the data directory (with tilde expansion)
    pub fn data_dir(&self) -> PathBuf {
        expand_tilde(&self.general.data_dir)
    }

    pub fn log_path(&self) -> PathBuf {
        self.data_dir().join("tabscroll.log")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_file_uses_defaults() {
        let config = AppConfig::from_toml("").unwrap();
        assert_eq!(config.ui.tick_rate_ms, 100);
        assert_eq!(config.autoscroll.initial_speed, 0.0);
        assert_eq!(config.autoscroll.step_units, 1.0);
        assert_eq!(config.manual_scroll.easing, EasingType::Cubic);
        assert_eq!(config.keymap.hold, "<Space>");
    }

    #[test]
    fn test_partial_sections() {
        let config = AppConfig::from_toml(
            r#"
            [autoscroll]
            initial_speed = 2.5

            [manual_scroll]
            easing = "ease_out"

            [keymap]
            quit = "Q"
            "#,
        )
        .unwrap();

        assert_eq!(config.autoscroll.initial_speed, 2.5);
        assert_eq!(config.autoscroll.units_per_line, 16.0);
        assert_eq!(config.manual_scroll.easing, EasingType::EaseOut);
        assert_eq!(config.keymap.quit, "Q");
        assert_eq!(config.keymap.line_down, "j");
    }

    #[test]
    fn test_invalid_toml_is_config_error() {
        let err = AppConfig::from_toml("[autoscroll\ninitial_speed = ").unwrap_err();
        assert!(matches!(err, crate::Error::Config(_)));
    }

    #[test]
    fn test_round_trip_through_toml() {
        let mut config = AppConfig::default();
        config.ui.theme.name = "nord".to_string();
        let text = config.to_toml().unwrap();
        let parsed = AppConfig::from_toml(&text).unwrap();
        assert_eq!(parsed.ui.theme.name, "nord");
    }

    #[test]
    fn test_missing_file_loads_defaults() {
        let path = std::env::temp_dir().join("tabscroll-missing-config-test.toml");
        let config = AppConfig::load_from(&path).unwrap();
        assert!(config.ui.show_status_bar);
    }

    #[test]
    fn test_expand_tilde() {
        let plain = PathBuf::from("/var/data");
        assert_eq!(expand_tilde(&plain), plain);
        if let Some(home) = dirs::home_dir() {
            assert_eq!(expand_tilde(&PathBuf::from("~/x")), home.join("x"));
        }
    }
}
