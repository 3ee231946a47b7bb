use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::time::Duration;

use crate::game_loop::LoopConfig;
use crate::geometry::{Padding, Size};
use crate::renderer::Color;
use crate::screen::ScreenConfig;

/// Configuration for Gridterm
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct Config {
    pub window: WindowConfig,
    pub font: FontConfig,
    pub layout: LayoutConfig,
    pub timing: TimingConfig,
    pub appearance: AppearanceConfig,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WindowConfig {
    pub title: String,
    /// Initial inner width in physical pixels
    pub width: u32,
    /// Initial inner height in physical pixels
    pub height: u32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FontConfig {
    /// Path to a TTF/OTF file (None = system monospace fallback)
    pub path: Option<String>,
    /// Font size in pixels
    pub size: f32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LayoutConfig {
    /// Inset between the window edge and the grid, in pixels
    pub inner_padding: i32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TimingConfig {
    pub target_fps: u32,
    /// Quiet period before a burst of window resizes is applied
    pub resize_debounce_ms: u64,
    pub fps_update_interval_ms: u64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppearanceConfig {
    /// Cells with this background skip the background fill
    pub default_background: Color,
    /// Show the frame statistics overlay at startup (F1 toggles)
    pub show_debug: bool,
    /// Log per-operation screen timings at debug level
    pub track_performance: bool,
}

impl Default for WindowConfig {
    fn default() -> Self {
        Self {
            title: "Gridterm".to_string(),
            width: 1280,
            height: 720,
        }
    }
}

impl Default for FontConfig {
    fn default() -> Self {
        Self {
            path: None,
            size: 25.0,
        }
    }
}

impl Default for LayoutConfig {
    fn default() -> Self {
        Self { inner_padding: 10 }
    }
}

impl Default for TimingConfig {
    fn default() -> Self {
        Self {
            target_fps: 60,
            resize_debounce_ms: 150,
            fps_update_interval_ms: 1000,
        }
    }
}

impl Default for AppearanceConfig {
    fn default() -> Self {
        Self {
            default_background: Color::BLACK,
            show_debug: false,
            track_performance: false,
        }
    }
}

impl Config {
    /// Load configuration from file, or create default if not exists
    pub fn load(path: Option<PathBuf>) -> anyhow::Result<Self> {
        let config_path = match path {
            Some(path) => path,
            None => default_path()?,
        };

        if config_path.exists() {
            let contents = std::fs::read_to_string(&config_path)?;
            let config: Config = toml::from_str(&contents)?;
            log::info!("Loaded config from {}", config_path.display());
            Ok(config)
        } else {
            let config = Config::default();
            config.save(Some(config_path.clone()))?;
            log::info!("Wrote default config to {}", config_path.display());
            Ok(config)
        }
    }

    /// Save configuration to file
    pub fn save(&self, path: Option<PathBuf>) -> anyhow::Result<()> {
        let config_path = match path {
            Some(path) => path,
            None => default_path()?,
        };

        if let Some(parent) = config_path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let contents = toml::to_string_pretty(self)?;
        std::fs::write(&config_path, contents)?;
        Ok(())
    }

    /// Immutable screen configuration for a font with the given cell size
    pub fn screen_config(&self, cell_size: Size) -> ScreenConfig {
        ScreenConfig {
            cell_size,
            display_size: Size::new(self.window.width as i32, self.window.height as i32),
            inner_padding: Padding::uniform(self.layout.inner_padding.max(0)),
            default_background: self.appearance.default_background,
            track_performance: self.appearance.track_performance,
        }
    }

    pub fn loop_config(&self) -> LoopConfig {
        LoopConfig {
            target_fps: self.timing.target_fps.max(1),
            fps_update_interval: Duration::from_millis(self.timing.fps_update_interval_ms),
            show_debug: self.appearance.show_debug,
        }
    }

    pub fn resize_debounce(&self) -> Duration {
        Duration::from_millis(self.timing.resize_debounce_ms)
    }
}

/// `~/.config/gridterm/config.toml`
fn default_path() -> anyhow::Result<PathBuf> {
    let mut path =
        dirs::config_dir().ok_or_else(|| anyhow::anyhow!("No config directory (HOME unset)"))?;
    path.push("gridterm");
    path.push("config.toml");
    Ok(path)
}

mod dirs {
    use std::path::PathBuf;

    pub fn config_dir() -> Option<PathBuf> {
        std::env::var_os("HOME").map(|home| {
            let mut path = PathBuf::from(home);
            path.push(".config");
            path
        })
    }
}
