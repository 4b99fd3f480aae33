use serde::Deserialize;
use serde_with::DeserializeFromStr;
use std::env;
use std::fs;
use std::iter::FromIterator;
use std::path::{Path, PathBuf};
use std::str::FromStr;
use std::time::Duration;

use crate::calendar::WeekStart;
use crate::cycle::Phase;
use crate::error::{Error, ErrorKind, Result};

const CONFIG_PATH_ENV_VAR: &str = "CYCAL_CONFIG_FILE";

pub(crate) fn find_configfile_locations() -> Vec<PathBuf> {
    let mut locations = Vec::new();

    if let Ok(path) = env::var(CONFIG_PATH_ENV_VAR) {
        locations.push(PathBuf::from(path));
    }

    if let Some(dir) = dirs::config_dir() {
        locations.push(PathBuf::from_iter(
            [dir.as_path(), Path::new("cycal"), Path::new("config.toml")].iter(),
        ));
    }

    if let Some(home) = dirs::home_dir() {
        locations.push(home.join(".cycal.toml"));
    }

    locations
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, DeserializeFromStr)]
pub enum ColorSpec {
    Default,
    Black,
    Red,
    Green,
    Yellow,
    Blue,
    Magenta,
    Cyan,
    White,
}

impl ColorSpec {
    /// Index into the 8 basic ANSI colors, `None` for the terminal default.
    pub fn ansi_index(&self) -> Option<u8> {
        match self {
            ColorSpec::Default => None,
            ColorSpec::Black => Some(0),
            ColorSpec::Red => Some(1),
            ColorSpec::Green => Some(2),
            ColorSpec::Yellow => Some(3),
            ColorSpec::Blue => Some(4),
            ColorSpec::Magenta => Some(5),
            ColorSpec::Cyan => Some(6),
            ColorSpec::White => Some(7),
        }
    }
}

impl FromStr for ColorSpec {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_lowercase().as_str() {
            "default" | "none" => Ok(ColorSpec::Default),
            "black" => Ok(ColorSpec::Black),
            "red" => Ok(ColorSpec::Red),
            "green" => Ok(ColorSpec::Green),
            "yellow" => Ok(ColorSpec::Yellow),
            "blue" => Ok(ColorSpec::Blue),
            "magenta" | "purple" => Ok(ColorSpec::Magenta),
            "cyan" => Ok(ColorSpec::Cyan),
            "white" => Ok(ColorSpec::White),
            _ => Err(Error::new(
                ErrorKind::ConfigParse,
                &format!("Color '{}' not recognized", s),
            )),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct ThemeConfig {
    pub period: ColorSpec,
    pub fertile: ColorSpec,
    pub ovulation: ColorSpec,
    pub premenstrual: ColorSpec,
    pub normal: ColorSpec,
    pub today: ColorSpec,
}

impl Default for ThemeConfig {
    fn default() -> Self {
        ThemeConfig {
            period: ColorSpec::Red,
            fertile: ColorSpec::Green,
            ovulation: ColorSpec::Yellow,
            premenstrual: ColorSpec::Magenta,
            normal: ColorSpec::Default,
            today: ColorSpec::Blue,
        }
    }
}

impl ThemeConfig {
    pub fn color_of(&self, phase: Phase) -> ColorSpec {
        match phase {
            Phase::Period => self.period,
            Phase::Fertile => self.fertile,
            Phase::Ovulation => self.ovulation,
            Phase::Premenstrual => self.premenstrual,
            Phase::Normal => self.normal,
        }
    }
}

/// Values the input form starts out with.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct CycleDefaults {
    pub cycle_length: u32,
    pub period_length: u32,
}

impl Default for CycleDefaults {
    fn default() -> Self {
        CycleDefaults {
            cycle_length: 28,
            period_length: 5,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct Config {
    pub tick_rate_ms: u64,
    pub week_start: WeekStart,
    pub defaults: CycleDefaults,
    pub theme: ThemeConfig,
}

impl Default for Config {
    fn default() -> Config {
        Config {
            tick_rate_ms: 1000,
            week_start: WeekStart::default(),
            defaults: CycleDefaults::default(),
            theme: ThemeConfig::default(),
        }
    }
}

impl Config {
    pub fn tick_rate(&self) -> Duration {
        Duration::from_millis(self.tick_rate_ms)
    }
}

impl FromStr for Config {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        Ok(toml::from_str(s)?)
    }
}

pub fn load_config(path: &Path) -> Result<Config> {
    let content = fs::read_to_string(path)?;
    content.parse().map_err(|e: Error| {
        let msg = format!("{}: {}", path.display(), e.message.as_deref().unwrap_or(""));
        e.with_msg(&msg)
    })
}

pub fn load_suitable_config(path: Option<&Path>) -> Result<Config> {
    if let Some(path) = path {
        log::info!("Loading configuration from {}", path.display());
        return load_config(path);
    }

    for location in find_configfile_locations() {
        if location.is_file() {
            log::info!("Loading configuration from {}", location.display());
            return load_config(&location);
        }
    }

    log::info!("No configuration file found, using defaults");
    Ok(Config::default())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_config_uses_defaults() {
        let config: Config = "".parse().unwrap();
        assert_eq!(config, Config::default());
        assert_eq!(config.tick_rate(), Duration::from_secs(1));
    }

    #[test]
    fn partial_config() {
        let config: Config = r#"
            week_start = "sunday"

            [defaults]
            cycle_length = 30

            [theme]
            fertile = "cyan"
            normal = "white"
        "#
        .parse()
        .unwrap();

        assert_eq!(config.week_start, WeekStart::Sunday);
        assert_eq!(config.defaults.cycle_length, 30);
        assert_eq!(config.defaults.period_length, 5);
        assert_eq!(config.theme.color_of(Phase::Fertile), ColorSpec::Cyan);
        assert_eq!(config.theme.color_of(Phase::Normal), ColorSpec::White);
        assert_eq!(config.theme.color_of(Phase::Period), ColorSpec::Red);
    }

    #[test]
    fn unknown_color_is_rejected() {
        let err = "[theme]\nperiod = \"crimson\"".parse::<Config>().unwrap_err();
        assert!(matches!(err.kind, ErrorKind::ConfigParse));
    }

    #[test]
    fn explicit_path_must_exist() {
        let path = env::temp_dir().join("cycal-does-not-exist.toml");
        let err = load_suitable_config(Some(&path)).unwrap_err();
        assert!(matches!(err.kind, ErrorKind::IOError(_)));
    }

    #[test]
    fn loads_explicit_file() {
        let path = env::temp_dir().join(format!("cycal-config-{}.toml", std::process::id()));
        fs::write(&path, "tick_rate_ms = 250\n").unwrap();

        let config = load_suitable_config(Some(&path)).unwrap();
        fs::remove_file(&path).unwrap();

        assert_eq!(config.tick_rate(), Duration::from_millis(250));
    }
}
