use std::env;
use std::fs;
use std::path::{Path, PathBuf};

use floorplan_core::document::{MeasurementUnit, WallType};
use serde::Deserialize;
use thiserror::Error;

/// 显式指定配置文件路径的环境变量。
pub const CONFIG_ENV: &str = "FLOORPLAN_CONFIG";

/// 应用配置的根结构。
#[derive(Debug, Clone, Default, Deserialize)]
pub struct AppConfig {
    #[serde(default)]
    pub logging: LoggingConfig,
    #[serde(default)]
    pub editor: EditorConfig,
}

impl AppConfig {
    /// 从显式路径加载配置。
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let content = fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        toml::from_str(&content).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }

    /// 自动发现配置文件：优先读取环境变量 `FLOORPLAN_CONFIG`，否则寻找 `./config/default.toml`。
    /// 若文件缺失，则返回默认配置。
    pub fn discover() -> Result<Self, ConfigError> {
        if let Some(path) = env::var_os(CONFIG_ENV) {
            return Self::from_file(PathBuf::from(path));
        }

        let default_path = env::current_dir()
            .map(|dir| dir.join("config").join("default.toml"))
            .map_err(|source| ConfigError::Context {
                message: "获取当前工作目录失败".to_string(),
                source,
            })?;

        if default_path.exists() {
            Self::from_file(default_path)
        } else {
            Ok(Self::default())
        }
    }
}

/// 日志配置，支持设置默认等级。
#[derive(Debug, Clone, Deserialize)]
pub struct LoggingConfig {
    #[serde(default = "LoggingConfig::default_level")]
    pub level: String,
}

impl LoggingConfig {
    fn default_level() -> String {
        "info".to_string()
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: Self::default_level(),
        }
    }
}

/// 编辑器默认值：网格、吸附、新墙体属性与标注单位。
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct EditorConfig {
    pub grid_enabled: bool,
    pub grid_size: f64,
    pub snap: bool,
    pub wall_thickness: f64,
    pub wall_type: WallType,
    pub wall_material: String,
    pub measurement_unit: MeasurementUnit,
}

impl Default for EditorConfig {
    fn default() -> Self {
        Self {
            grid_enabled: true,
            grid_size: 20.0,
            snap: true,
            wall_thickness: 150.0,
            wall_type: WallType::Interior,
            wall_material: "concrete".to_string(),
            measurement_unit: MeasurementUnit::Mm,
        }
    }
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("读取配置文件 {path:?} 失败: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("解析配置文件 {path:?} 失败: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },
    #[error("{message}")]
    Context {
        message: String,
        #[source]
        source: std::io::Error,
    },
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn defaults_are_returned_when_file_missing() {
        let cfg = AppConfig::discover().expect("discover should succeed");
        assert_eq!(cfg.logging.level, "info");
        assert_eq!(cfg.editor, EditorConfig::default());
        assert!(cfg.editor.snap);
        assert!((cfg.editor.grid_size - 20.0).abs() < f64::EPSILON);
    }

    #[test]
    fn load_from_temp_file() {
        let mut file = tempfile::NamedTempFile::new().expect("create temp file");
        writeln!(
            file,
            r#"
            [logging]
            level = "debug"

            [editor]
            grid_size = 50.0
            snap = false
            wall_thickness = 240.0
            wall_type = "load_bearing"
            wall_material = "brick"
            measurement_unit = "cm"
            "#
        )
        .unwrap();

        let cfg = AppConfig::from_file(file.path()).expect("load config");
        assert_eq!(cfg.logging.level, "debug");
        assert!(cfg.editor.grid_enabled);
        assert!((cfg.editor.grid_size - 50.0).abs() < f64::EPSILON);
        assert!(!cfg.editor.snap);
        assert!((cfg.editor.wall_thickness - 240.0).abs() < f64::EPSILON);
        assert_eq!(cfg.editor.wall_type, WallType::LoadBearing);
        assert_eq!(cfg.editor.wall_material, "brick");
        assert_eq!(cfg.editor.measurement_unit, MeasurementUnit::Cm);
    }

    #[test]
    fn unknown_enum_value_is_a_parse_error() {
        let mut file = tempfile::NamedTempFile::new().expect("create temp file");
        writeln!(file, "[editor]\nmeasurement_unit = \"furlong\"").unwrap();

        let err = AppConfig::from_file(file.path()).unwrap_err();
        assert!(matches!(err, ConfigError::Parse { .. }));
    }

    #[test]
    fn missing_file_is_an_io_error() {
        let dir = tempfile::tempdir().expect("create temp dir");
        let err = AppConfig::from_file(dir.path().join("absent.toml")).unwrap_err();
        assert!(matches!(err, ConfigError::Io { .. }));
    }
}
