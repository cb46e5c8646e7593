use std::collections::HashSet;

use super::models::{LogRecord, StatusRecord};

/// 解析 `git log --pretty=format:%h%x09%an%x09%ad%x09%s` 的输出
///
/// 每个非空行产生一条记录，字段按制表符切分，不做裁剪或校验。
pub fn parse_log(raw: &str) -> Vec<LogRecord> {
    raw.lines()
        .filter(|line| !line.is_empty())
        .map(LogRecord::from_line)
        .collect()
}

/// 解析 `git status --short` 的输出
///
/// 丢弃空白行，相同的行只保留第一次出现的位置。
pub fn parse_status(raw: &str) -> Vec<StatusRecord> {
    let mut seen = HashSet::new();
    raw.lines()
        .filter(|line| !line.trim().is_empty())
        .filter(|line| seen.insert(*line))
        .map(StatusRecord::new)
        .collect()
}
