use std::fmt::Display;
use std::path::{Component, Path, PathBuf};

/// 一个按序号命名的文件目录：`<dir>/<index>.<ext>`
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct FileTree {
    pub dir: PathBuf,
    pub ext: String,
}

impl FileTree {
    /// `dir` 按字面归一化，`./a` 与 `a` 视为同一目录
    pub fn new(dir: impl AsRef<Path>, ext: impl Into<String>) -> Self {
        let ext = ext.into();
        Self {
            dir: normalize(dir.as_ref()),
            ext: ext.trim_start_matches('.').to_string(),
        }
    }

    /// `<dir>/<index>.<ext>`
    pub fn path_for(&self, index: usize) -> PathBuf {
        self.dir.join(format!("{}.{}", index, self.ext))
    }

    /// `<dir>/<prefix><rank>.<ext>`
    pub fn temp_path_for(&self, prefix: &str, rank: usize) -> PathBuf {
        self.dir.join(format!("{}{}.{}", prefix, rank, self.ext))
    }
}

impl Display for FileTree {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}/*.{}", self.dir.display(), self.ext)
    }
}

/// 去掉 `.`，并让 `..` 抵消前一个普通目录；不访问文件系统
fn normalize(path: &Path) -> PathBuf {
    let mut out = PathBuf::new();
    for component in path.components() {
        match component {
            Component::CurDir => {}
            Component::ParentDir => {
                let last = out.components().next_back();
                let can_pop = matches!(last, Some(Component::Normal(_)));
                let at_root = matches!(last, Some(Component::RootDir | Component::Prefix(_)));
                if can_pop {
                    out.pop();
                } else if !at_root {
                    out.push("..");
                }
            }
            other => out.push(other),
        }
    }
    if out.as_os_str().is_empty() {
        out.push(".");
    }
    out
}
