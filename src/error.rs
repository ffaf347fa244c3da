use std::path::{Path, PathBuf};
use thiserror::Error;

/// 应用程序错误类型
#[derive(Debug, Error)]
pub enum AppError {
    /// 文件操作错误
    #[error("文件错误: {0}")]
    File(#[from] FileError),
    /// 标注记录解析错误
    #[error("记录错误: {0}")]
    Record(#[from] RecordError),
    /// 重命名计划错误
    #[error("计划错误: {0}")]
    Plan(#[from] PlanError),
    /// 配置错误
    #[error("配置错误: {0}")]
    Config(#[from] ConfigError),
}

/// 文件操作错误
#[derive(Debug, Error)]
pub enum FileError {
    /// 文件不存在
    #[error("文件不存在: {}", .path.display())]
    NotFound { path: PathBuf },
    /// 读取文件失败
    #[error("读取文件失败 ({}): {source}", .path.display())]
    ReadFailed {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    /// 写入文件失败
    #[error("写入文件失败 ({}): {source}", .path.display())]
    WriteFailed {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    /// 重命名失败
    #[error("重命名失败 ({} -> {}): {source}", .from.display(), .to.display())]
    RenameFailed {
        from: PathBuf,
        to: PathBuf,
        #[source]
        source: std::io::Error,
    },
    /// 目录不存在
    #[error("目录不存在: {}", .path.display())]
    DirectoryNotFound { path: PathBuf },
}

/// 标注记录解析错误
#[derive(Debug, Error)]
pub enum RecordError {
    /// 格式不符合 `<token>..x1,y1,x2,y2`
    #[error("记录格式错误 ({}): {reason}", .path.display())]
    Malformed { path: PathBuf, reason: String },
    /// 坐标超出 i64 范围
    #[error("坐标溢出 ({}): {value}", .path.display())]
    IntegerOverflow { path: PathBuf, value: String },
    /// JSON 中缺少边框字段
    #[error("缺少字段 '{key}' ({})", .path.display())]
    MissingKey { path: PathBuf, key: String },
    /// 边框数组长度不是 4
    #[error("边框应包含 4 个整数, 实际为 {len} ({})", .path.display())]
    WrongArity { path: PathBuf, len: usize },
    /// JSON 解析失败
    #[error("JSON解析失败 ({}): {source}", .path.display())]
    Json {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}

/// 重命名计划错误（预检阶段发现，尚未改动任何文件）
#[derive(Debug, Error)]
pub enum PlanError {
    /// 源文件缺失
    #[error("源文件缺失: {}", .path.display())]
    MissingSource { path: PathBuf },
    /// 临时文件名已被占用
    #[error("临时文件已存在: {}", .path.display())]
    TempOccupied { path: PathBuf },
    /// 临时命名空间与最终命名空间重叠
    #[error("临时文件名与目标文件名冲突: {}", .path.display())]
    NameCollision { path: PathBuf },
    /// 排列长度与文件数量不一致
    #[error("排列长度 {permutation} 与文件数量 {expected} 不一致")]
    LengthMismatch { permutation: usize, expected: usize },
    /// 重命名中途失败并已回滚
    #[error("重命名失败, 已回滚 {rolled_back} 步, 回滚失败 {rollback_failures} 步: {source}")]
    Aborted {
        rolled_back: usize,
        rollback_failures: usize,
        #[source]
        source: FileError,
    },
}

/// 配置错误
#[derive(Debug, Error)]
pub enum ConfigError {
    /// 环境变量解析失败
    #[error("环境变量 {var_name} 解析失败: 值 '{value}' 无法转换为 {expected_type}")]
    EnvVarParseFailed {
        var_name: String,
        value: String,
        expected_type: String,
    },
    /// 配置文件解析失败
    #[error("配置文件解析失败 ({}): {source}", .path.display())]
    TomlParseFailed {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },
    /// 配置值不合法
    #[error("配置项 {field} 不合法: {reason}")]
    Invalid { field: String, reason: String },
}

// ========== 便捷构造函数 ==========

impl AppError {
    /// 创建文件读取错误
    pub fn file_read_failed(path: impl AsRef<Path>, source: std::io::Error) -> Self {
        if source.kind() == std::io::ErrorKind::NotFound {
            return AppError::File(FileError::NotFound {
                path: path.as_ref().to_path_buf(),
            });
        }
        AppError::File(FileError::ReadFailed {
            path: path.as_ref().to_path_buf(),
            source,
        })
    }

    /// 创建文件写入错误
    pub fn file_write_failed(path: impl AsRef<Path>, source: std::io::Error) -> Self {
        AppError::File(FileError::WriteFailed {
            path: path.as_ref().to_path_buf(),
            source,
        })
    }

    /// 创建记录格式错误
    pub fn malformed(path: impl AsRef<Path>, reason: impl Into<String>) -> Self {
        AppError::Record(RecordError::Malformed {
            path: path.as_ref().to_path_buf(),
            reason: reason.into(),
        })
    }

    /// 创建配置项不合法错误
    pub fn invalid_config(field: impl Into<String>, reason: impl Into<String>) -> Self {
        AppError::Config(ConfigError::Invalid {
            field: field.into(),
            reason: reason.into(),
        })
    }
}

// ========== Result 类型别名 ==========

/// 应用程序结果类型
pub type AppResult<T> = Result<T, AppError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_not_found_read_maps_to_not_found() {
        let err = AppError::file_read_failed(
            "a/1.json",
            std::io::Error::new(std::io::ErrorKind::NotFound, "gone"),
        );
        assert!(matches!(err, AppError::File(FileError::NotFound { .. })));
        assert!(err.to_string().contains("a/1.json"));
    }

    #[test]
    fn test_aborted_exposes_source() {
        use std::error::Error;

        let err = PlanError::Aborted {
            rolled_back: 3,
            rollback_failures: 0,
            source: FileError::RenameFailed {
                from: "x/1.png".into(),
                to: "x/new0.png".into(),
                source: std::io::Error::new(std::io::ErrorKind::PermissionDenied, "denied"),
            },
        };
        assert!(err.to_string().contains("已回滚 3 步"));
        assert!(err.source().is_some());
    }
}
