use crate::error::{AppError, AppResult, FileError};
use crate::models::{AnnotationRecord, FileTree, RecordParser};
use futures::{StreamExt, TryStreamExt};
use tokio::fs;

/// 读取并解析 `<dir>/<index>.<ext>`
pub async fn load_record(
    parser: &RecordParser,
    tree: &FileTree,
    index: usize,
) -> AppResult<AnnotationRecord> {
    let path = tree.path_for(index);
    let content = fs::read_to_string(&path)
        .await
        .map_err(|e| AppError::file_read_failed(&path, e))?;

    let bbox = parser.parse(&content, &path)?;
    let record = AnnotationRecord::new(index, bbox, &path)?;
    tracing::debug!(
        "已解析 {}: [{}, {}, {}, {}] 面积 {}",
        path.display(),
        bbox.x1,
        bbox.y1,
        bbox.x2,
        bbox.y2,
        record.area
    );
    Ok(record)
}

/// 读取 `0..count` 的全部记录，结果按序号排列
///
/// 同时最多读取 `max_concurrent` 个文件；任一记录失败则整体失败
pub async fn load_all_records(
    parser: &RecordParser,
    tree: &FileTree,
    count: usize,
    max_concurrent: usize,
) -> AppResult<Vec<AnnotationRecord>> {
    ensure_dir(tree).await?;

    let records: Vec<AnnotationRecord> = futures::stream::iter(0..count)
        .map(|index| load_record(parser, tree, index))
        .buffered(max_concurrent.max(1))
        .try_collect()
        .await?;

    tracing::info!("成功加载 {} 条标注记录 ({})", records.len(), tree);
    Ok(records)
}

/// 从 0 开始连续探测存在的文件，返回第一个缺失的序号
pub async fn discover_count(tree: &FileTree) -> AppResult<usize> {
    ensure_dir(tree).await?;

    let mut count = 0;
    loop {
        let path = tree.path_for(count);
        let exists = fs::try_exists(&path)
            .await
            .map_err(|e| AppError::file_read_failed(&path, e))?;
        if !exists {
            break;
        }
        count += 1;
    }

    tracing::info!("在 {} 中探测到 {} 个连续编号的文件", tree, count);
    Ok(count)
}

async fn ensure_dir(tree: &FileTree) -> AppResult<()> {
    let is_dir = fs::metadata(&tree.dir)
        .await
        .map(|m| m.is_dir())
        .unwrap_or(false);
    if !is_dir {
        return Err(FileError::DirectoryNotFound {
            path: tree.dir.clone(),
        }
        .into());
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::RecordError;
    use tempfile::tempdir;

    fn write_record(tree: &FileTree, index: usize, bbox: [i64; 4]) {
        let content = format!(
            "{{\"bbox\": [{},{},{},{}]}}",
            bbox[0], bbox[1], bbox[2], bbox[3]
        );
        std::fs::write(tree.path_for(index), content).unwrap();
    }

    #[tokio::test]
    async fn test_load_all_keeps_index_order() {
        let dir = tempdir().unwrap();
        let tree = FileTree::new(dir.path(), "json");
        write_record(&tree, 0, [0, 0, 10, 10]);
        write_record(&tree, 1, [0, 0, 1, 1]);
        write_record(&tree, 2, [0, 0, 5, 5]);

        let parser = RecordParser::new(None).unwrap();
        let records = load_all_records(&parser, &tree, 3, 2).await.unwrap();

        let areas: Vec<i64> = records.iter().map(|r| r.area).collect();
        assert_eq!(areas, vec![100, 1, 25]);
        assert_eq!(records[2].index, 2);
    }

    #[tokio::test]
    async fn test_missing_record_is_reported() {
        let dir = tempdir().unwrap();
        let tree = FileTree::new(dir.path(), "json");
        write_record(&tree, 0, [0, 0, 1, 1]);

        let parser = RecordParser::new(None).unwrap();
        let err = load_all_records(&parser, &tree, 2, 4).await.unwrap_err();
        assert!(matches!(err, AppError::File(FileError::NotFound { .. })));
        assert!(err.to_string().contains("1.json"));
    }

    #[tokio::test]
    async fn test_malformed_record_is_reported() {
        let dir = tempdir().unwrap();
        let tree = FileTree::new(dir.path(), "json");
        std::fs::write(tree.path_for(0), "garbage").unwrap();

        let parser = RecordParser::new(None).unwrap();
        let err = load_record(&parser, &tree, 0).await.unwrap_err();
        assert!(matches!(
            err,
            AppError::Record(RecordError::Malformed { .. })
        ));
    }

    #[tokio::test]
    async fn test_discover_count_stops_at_gap() {
        let dir = tempdir().unwrap();
        let tree = FileTree::new(dir.path(), "json");
        for index in [0, 1, 2, 4] {
            write_record(&tree, index, [0, 0, 1, 1]);
        }
        assert_eq!(discover_count(&tree).await.unwrap(), 3);
    }

    #[tokio::test]
    async fn test_missing_directory() {
        let dir = tempdir().unwrap();
        let tree = FileTree::new(dir.path().join("nope"), "json");
        let err = discover_count(&tree).await.unwrap_err();
        assert!(matches!(
            err,
            AppError::File(FileError::DirectoryNotFound { .. })
        ));
    }
}
