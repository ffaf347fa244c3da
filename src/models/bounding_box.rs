//! 边框与标注记录解析

use crate::error::{AppError, AppResult, RecordError};
use regex::Regex;
use serde::Serialize;
use std::path::Path;

/// 旧格式：一个以空白结尾的 token，跳过两个字符（第一个是空白），
/// 再读四个以单个非数字字符分隔的整数
///
/// token 必须读到空白为止，分隔符不能是数字，整数不能被拆开
const LEGACY_PATTERN: &str =
    r"(?s)^\s*\S+\s.\s*([+-]?\d+)\D\s*([+-]?\d+)\D\s*([+-]?\d+)\D\s*([+-]?\d+)";

/// 轴对齐边框，`(x1, y1)` 与 `(x2, y2)` 为两个角点
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct BoundingBox {
    pub x1: i64,
    pub y1: i64,
    pub x2: i64,
    pub y2: i64,
}

impl BoundingBox {
    pub fn new(x1: i64, y1: i64, x2: i64, y2: i64) -> Self {
        Self { x1, y1, x2, y2 }
    }

    pub fn width(&self) -> Option<i64> {
        self.x2.checked_sub(self.x1)
    }

    pub fn height(&self) -> Option<i64> {
        self.y2.checked_sub(self.y1)
    }

    /// `(x2 - x1) * (y2 - y1)`，溢出时返回 `None`
    ///
    /// 反向的边框不做归一化，面积可以为负
    pub fn area(&self) -> Option<i64> {
        self.width()?.checked_mul(self.height()?)
    }
}

/// 单个标注文件解析后的记录
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AnnotationRecord {
    /// 文件名中的原始序号
    pub index: usize,
    pub bbox: BoundingBox,
    /// 排序键
    pub area: i64,
}

impl AnnotationRecord {
    pub fn new(index: usize, bbox: BoundingBox, path: &Path) -> AppResult<Self> {
        let area = bbox.area().ok_or_else(|| RecordError::IntegerOverflow {
            path: path.to_path_buf(),
            value: format!("({} - {}) * ({} - {})", bbox.x2, bbox.x1, bbox.y2, bbox.y1),
        })?;
        Ok(Self { index, bbox, area })
    }
}

/// 标注记录解析器
///
/// 默认按旧格式解析；设置 `bbox_key` 后按 JSON 对象解析，边框取自该字段
#[derive(Debug, Clone)]
pub struct RecordParser {
    legacy: Regex,
    bbox_key: Option<String>,
}

impl RecordParser {
    pub fn new(bbox_key: Option<String>) -> AppResult<Self> {
        let legacy = Regex::new(LEGACY_PATTERN)
            .map_err(|e| AppError::invalid_config("record_pattern", e.to_string()))?;
        Ok(Self { legacy, bbox_key })
    }

    /// 解析一条记录的边框，`path` 仅用于错误信息
    pub fn parse(&self, content: &str, path: &Path) -> AppResult<BoundingBox> {
        match &self.bbox_key {
            Some(key) => parse_json(content, key, path),
            None => self.parse_legacy(content, path),
        }
    }

    fn parse_legacy(&self, content: &str, path: &Path) -> AppResult<BoundingBox> {
        let caps = self
            .legacy
            .captures(content)
            .ok_or_else(|| AppError::malformed(path, "未找到 `<token>..x1,y1,x2,y2` 结构"))?;

        let mut coords = [0i64; 4];
        for (slot, m) in coords.iter_mut().zip(caps.iter().skip(1)) {
            // 四个分组都是必选的，匹配成功时一定存在
            let text = m.map(|m| m.as_str()).unwrap_or_default();
            *slot = text.parse().map_err(|_| RecordError::IntegerOverflow {
                path: path.to_path_buf(),
                value: text.to_string(),
            })?;
        }
        let [x1, y1, x2, y2] = coords;
        Ok(BoundingBox::new(x1, y1, x2, y2))
    }
}

fn parse_json(content: &str, key: &str, path: &Path) -> AppResult<BoundingBox> {
    let value: serde_json::Value =
        serde_json::from_str(content).map_err(|source| RecordError::Json {
            path: path.to_path_buf(),
            source,
        })?;

    let field = value.get(key).ok_or_else(|| RecordError::MissingKey {
        path: path.to_path_buf(),
        key: key.to_string(),
    })?;
    let items = field
        .as_array()
        .ok_or_else(|| AppError::malformed(path, format!("字段 '{}' 不是数组", key)))?;
    if items.len() != 4 {
        return Err(RecordError::WrongArity {
            path: path.to_path_buf(),
            len: items.len(),
        }
        .into());
    }

    let mut coords = [0i64; 4];
    for (slot, item) in coords.iter_mut().zip(items) {
        *slot = item
            .as_i64()
            .ok_or_else(|| AppError::malformed(path, format!("'{}' 不是整数", item)))?;
    }
    let [x1, y1, x2, y2] = coords;
    Ok(BoundingBox::new(x1, y1, x2, y2))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn legacy() -> RecordParser {
        RecordParser::new(None).unwrap()
    }

    #[test]
    fn test_area() {
        assert_eq!(BoundingBox::new(10, 20, 30, 60).area(), Some(800));
        assert_eq!(BoundingBox::new(5, 5, 5, 9).area(), Some(0));
        // 反向边框保留符号
        assert_eq!(BoundingBox::new(30, 20, 10, 60).area(), Some(-800));
        assert_eq!(BoundingBox::new(0, 0, i64::MAX, i64::MAX).area(), None);
    }

    #[test]
    fn test_parse_legacy_with_space() {
        let bbox = legacy()
            .parse(r#"{"bbox": [10,20,30,40]}"#, Path::new("0.json"))
            .unwrap();
        assert_eq!(bbox, BoundingBox::new(10, 20, 30, 40));
    }

    #[test]
    fn test_parse_legacy_spaces_between_numbers() {
        let bbox = legacy()
            .parse("{\"box\": [1, 2, 300, 400]}\n", Path::new("0.json"))
            .unwrap();
        assert_eq!(bbox.area(), Some(299 * 398));
    }

    #[test]
    fn test_parse_legacy_token_must_end_at_whitespace() {
        // 整行是一个 token，之后没有可读的整数
        let err = legacy()
            .parse(r#"{"bbox":[7,8,9,10]}"#, Path::new("0.json"))
            .unwrap_err();
        assert!(matches!(
            err,
            AppError::Record(RecordError::Malformed { .. })
        ));
    }

    #[test]
    fn test_parse_legacy_does_not_split_integers() {
        for content in [r#"{"bbox": [100,20,30]}"#, r#"{"bbox": [1234,5,6]}"#] {
            let err = legacy().parse(content, Path::new("7.json")).unwrap_err();
            assert!(
                matches!(err, AppError::Record(RecordError::Malformed { .. })),
                "{} 应当解析失败: {}",
                content,
                err
            );
        }
    }

    #[test]
    fn test_parse_legacy_multiline_record() {
        let bbox = legacy()
            .parse("{\"bbox\":\n[3,\n4,\n 5,\n 6]}", Path::new("0.json"))
            .unwrap();
        assert_eq!(bbox, BoundingBox::new(3, 4, 5, 6));
    }

    #[test]
    fn test_parse_legacy_negative_and_trailing_fields() {
        let bbox = legacy()
            .parse(
                r#"{"bbox": [-4,-2,6,8], "label": "cat", "score": 3}"#,
                Path::new("0.json"),
            )
            .unwrap();
        assert_eq!(bbox, BoundingBox::new(-4, -2, 6, 8));
        assert_eq!(bbox.area(), Some(100));
    }

    #[test]
    fn test_parse_legacy_rejects_short_record() {
        let err = legacy()
            .parse(r#"{"bbox": [1,2,3]}"#, Path::new("3.json"))
            .unwrap_err();
        assert!(matches!(
            err,
            AppError::Record(RecordError::Malformed { .. })
        ));
        assert!(err.to_string().contains("3.json"));
    }

    #[test]
    fn test_parse_legacy_rejects_huge_integer() {
        let err = legacy()
            .parse(
                r#"{"bbox": [99999999999999999999,2,3,4]}"#,
                Path::new("0.json"),
            )
            .unwrap_err();
        assert!(matches!(
            err,
            AppError::Record(RecordError::IntegerOverflow { .. })
        ));
    }

    #[test]
    fn test_parse_json_mode() {
        let parser = RecordParser::new(Some("bbox".to_string())).unwrap();
        let content = r#"{"label": "dog", "bbox": [1, 1, 4, 5]}"#;
        let bbox = parser.parse(content, Path::new("0.json")).unwrap();
        assert_eq!(bbox.area(), Some(12));
    }

    #[test]
    fn test_parse_json_mode_errors() {
        let parser = RecordParser::new(Some("bbox".to_string())).unwrap();
        let path = Path::new("0.json");

        let missing = parser.parse(r#"{"rect": [1,2,3,4]}"#, path).unwrap_err();
        assert!(matches!(
            missing,
            AppError::Record(RecordError::MissingKey { .. })
        ));

        let arity = parser.parse(r#"{"bbox": [1,2,3,4,5]}"#, path).unwrap_err();
        assert!(matches!(
            arity,
            AppError::Record(RecordError::WrongArity { len: 5, .. })
        ));

        let float = parser.parse(r#"{"bbox": [1.5,2,3,4]}"#, path).unwrap_err();
        assert!(matches!(
            float,
            AppError::Record(RecordError::Malformed { .. })
        ));

        let broken = parser.parse("{not json", path).unwrap_err();
        assert!(matches!(broken, AppError::Record(RecordError::Json { .. })));
    }

    #[test]
    fn test_record_overflowing_area() {
        let bbox = BoundingBox::new(i64::MIN, 0, i64::MAX, 1);
        let err = AnnotationRecord::new(0, bbox, Path::new("0.json")).unwrap_err();
        assert!(matches!(
            err,
            AppError::Record(RecordError::IntegerOverflow { .. })
        ));
    }
}
