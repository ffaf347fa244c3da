use crate::error::{AppError, AppResult, ConfigError};
use crate::models::FileTree;
use serde::Deserialize;
use std::path::{Path, PathBuf};
use std::str::FromStr;

/// 指定 TOML 配置文件路径的环境变量
pub const CONFIG_PATH_VAR: &str = "BBOX_REORDER_CONFIG";

/// 程序配置
#[derive(Clone, Debug)]
pub struct Config {
    /// 标注文件目录
    pub annotation_dir: PathBuf,
    /// 标注文件扩展名
    pub annotation_ext: String,
    /// 图片目录
    pub image_dir: PathBuf,
    /// 图片扩展名
    pub image_ext: String,
    /// 文件对数量，`None` 表示从标注目录自动探测
    pub file_count: Option<usize>,
    /// 临时文件名前缀
    pub temp_prefix: String,
    /// 设置后按 JSON 解析标注，并从该字段读取边框
    pub bbox_key: Option<String>,
    /// 同时读取的标注文件数量
    pub max_concurrent_reads: usize,
    /// 只做计划和日志，不实际重命名
    pub dry_run: bool,
    /// 是否显示详细日志
    pub verbose_logging: bool,
    /// 排列清单输出路径
    pub manifest_path: Option<PathBuf>,
    /// 输出日志文件
    pub output_log_file: PathBuf,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            annotation_dir: PathBuf::from("content/annotation"),
            annotation_ext: "json".to_string(),
            image_dir: PathBuf::from("content/images"),
            image_ext: "png".to_string(),
            file_count: Some(4723),
            temp_prefix: "new".to_string(),
            bbox_key: None,
            max_concurrent_reads: 64,
            dry_run: false,
            verbose_logging: false,
            manifest_path: None,
            output_log_file: PathBuf::from("reorder_log.txt"),
        }
    }
}

/// TOML 配置文件内容，所有字段可选
#[derive(Debug, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
struct FileConfig {
    annotation_dir: Option<PathBuf>,
    annotation_ext: Option<String>,
    image_dir: Option<PathBuf>,
    image_ext: Option<String>,
    file_count: Option<usize>,
    temp_prefix: Option<String>,
    bbox_key: Option<String>,
    max_concurrent_reads: Option<usize>,
    dry_run: Option<bool>,
    verbose_logging: Option<bool>,
    manifest_path: Option<PathBuf>,
    output_log_file: Option<PathBuf>,
}

impl Config {
    /// 加载配置：默认值 → TOML 文件（若设置 `BBOX_REORDER_CONFIG`）→ 环境变量
    pub fn load() -> AppResult<Self> {
        let mut config = match std::env::var(CONFIG_PATH_VAR) {
            Ok(path) => Self::from_toml_file(path)?,
            Err(_) => Self::default(),
        };
        config.apply_overrides(|key| std::env::var(key).ok())?;
        config.validate()?;
        Ok(config)
    }

    /// 只从环境变量加载
    pub fn from_env() -> AppResult<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// 以任意键值来源覆盖默认配置
    pub fn from_lookup<F>(lookup: F) -> AppResult<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Self::default();
        config.apply_overrides(lookup)?;
        config.validate()?;
        Ok(config)
    }

    /// 从 TOML 文件加载，未出现的字段使用默认值
    pub fn from_toml_file(path: impl AsRef<Path>) -> AppResult<Self> {
        let path = path.as_ref();
        let content =
            std::fs::read_to_string(path).map_err(|e| AppError::file_read_failed(path, e))?;
        Self::from_toml_str(&content, path)
    }

    fn from_toml_str(content: &str, path: &Path) -> AppResult<Self> {
        let file: FileConfig =
            toml::from_str(content).map_err(|source| ConfigError::TomlParseFailed {
                path: path.to_path_buf(),
                source,
            })?;

        let default = Self::default();
        let config = Self {
            annotation_dir: file.annotation_dir.unwrap_or(default.annotation_dir),
            annotation_ext: file.annotation_ext.unwrap_or(default.annotation_ext),
            image_dir: file.image_dir.unwrap_or(default.image_dir),
            image_ext: file.image_ext.unwrap_or(default.image_ext),
            // 文件中写 0 表示自动探测
            file_count: match file.file_count {
                Some(0) => None,
                Some(n) => Some(n),
                None => default.file_count,
            },
            temp_prefix: file.temp_prefix.unwrap_or(default.temp_prefix),
            bbox_key: file.bbox_key.or(default.bbox_key),
            max_concurrent_reads: file
                .max_concurrent_reads
                .unwrap_or(default.max_concurrent_reads),
            dry_run: file.dry_run.unwrap_or(default.dry_run),
            verbose_logging: file.verbose_logging.unwrap_or(default.verbose_logging),
            manifest_path: file.manifest_path.or(default.manifest_path),
            output_log_file: file.output_log_file.unwrap_or(default.output_log_file),
        };
        config.validate()?;
        Ok(config)
    }

    fn apply_overrides<F>(&mut self, lookup: F) -> AppResult<()>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(v) = lookup("ANNOTATION_DIR") {
            self.annotation_dir = PathBuf::from(v);
        }
        if let Some(v) = lookup("ANNOTATION_EXT") {
            self.annotation_ext = v;
        }
        if let Some(v) = lookup("IMAGE_DIR") {
            self.image_dir = PathBuf::from(v);
        }
        if let Some(v) = lookup("IMAGE_EXT") {
            self.image_ext = v;
        }
        if let Some(v) = lookup("FILE_COUNT") {
            self.file_count = match v.trim() {
                "auto" | "0" => None,
                other => Some(parse_value("FILE_COUNT", other, "usize")?),
            };
        }
        if let Some(v) = lookup("TEMP_PREFIX") {
            self.temp_prefix = v;
        }
        if let Some(v) = lookup("BBOX_KEY") {
            self.bbox_key = (!v.is_empty()).then_some(v);
        }
        if let Some(v) = lookup("MAX_CONCURRENT_READS") {
            self.max_concurrent_reads = parse_value("MAX_CONCURRENT_READS", &v, "usize")?;
        }
        if let Some(v) = lookup("DRY_RUN") {
            self.dry_run = parse_bool("DRY_RUN", &v)?;
        }
        if let Some(v) = lookup("VERBOSE_LOGGING") {
            self.verbose_logging = parse_bool("VERBOSE_LOGGING", &v)?;
        }
        if let Some(v) = lookup("MANIFEST_PATH") {
            self.manifest_path = (!v.is_empty()).then(|| PathBuf::from(v));
        }
        if let Some(v) = lookup("OUTPUT_LOG_FILE") {
            self.output_log_file = PathBuf::from(v);
        }
        Ok(())
    }

    /// 校验配置
    ///
    /// 临时前缀不能为空也不能以数字开头，否则临时文件名可能与最终文件名重叠
    pub fn validate(&self) -> AppResult<()> {
        if self.temp_prefix.is_empty() {
            return Err(AppError::invalid_config("temp_prefix", "不能为空"));
        }
        if self.temp_prefix.starts_with(|c: char| c.is_ascii_digit()) {
            return Err(AppError::invalid_config("temp_prefix", "不能以数字开头"));
        }
        if self.max_concurrent_reads == 0 {
            return Err(AppError::invalid_config("max_concurrent_reads", "至少为 1"));
        }
        if self.annotation_tree() == self.image_tree() {
            return Err(AppError::invalid_config(
                "image_dir",
                "图片目录与扩展名不能和标注完全相同",
            ));
        }
        Ok(())
    }

    /// 标注文件树
    pub fn annotation_tree(&self) -> FileTree {
        FileTree::new(&self.annotation_dir, &self.annotation_ext)
    }

    /// 图片文件树
    pub fn image_tree(&self) -> FileTree {
        FileTree::new(&self.image_dir, &self.image_ext)
    }
}

fn parse_value<T: FromStr>(var_name: &str, value: &str, expected_type: &str) -> AppResult<T> {
    value.trim().parse().map_err(|_| {
        AppError::Config(ConfigError::EnvVarParseFailed {
            var_name: var_name.to_string(),
            value: value.to_string(),
            expected_type: expected_type.to_string(),
        })
    })
}

fn parse_bool(var_name: &str, value: &str) -> AppResult<bool> {
    match value.trim().to_ascii_lowercase().as_str() {
        "1" | "yes" | "on" => Ok(true),
        "0" | "no" | "off" => Ok(false),
        other => parse_value(var_name, other, "bool"),
    }
}
