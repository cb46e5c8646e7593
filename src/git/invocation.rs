//! git 子命令的参数向量
//!
//! 每个参数都是独立的 argv 元素，标题或正文中的引号、空格原样传给 git。

use crate::infrastructure::error::{GitError, GitResult};

/// 短哈希、作者、日期、标题，以制表符分隔
pub const LOG_PRETTY_FORMAT: &str = "--pretty=format:%h%x09%an%x09%ad%x09%s";

pub fn log_args(limit: Option<u32>) -> Vec<String> {
    let mut args = vec![
        "log".to_string(),
        LOG_PRETTY_FORMAT.to_string(),
        "--date=short".to_string(),
    ];
    if let Some(limit) = limit {
        args.push("-n".to_string());
        args.push(limit.to_string());
    }
    args
}

/// HEAD 不存在（仓库还没有提交）时以退出码 1 静默失败
pub fn head_args() -> Vec<String> {
    vec![
        "rev-parse".to_string(),
        "--verify".to_string(),
        "-q".to_string(),
        "HEAD".to_string(),
    ]
}

/// 关闭 core.quotePath，非 ASCII 路径按原样输出而不是八进制转义
pub fn status_args() -> Vec<String> {
    vec![
        "-c".to_string(),
        "core.quotePath=false".to_string(),
        "status".to_string(),
        "--short".to_string(),
    ]
}

pub fn add_all_args() -> Vec<String> {
    vec!["add".to_string(), "-A".to_string()]
}

pub fn add_paths_args(paths: &[String]) -> GitResult<Vec<String>> {
    if paths.is_empty() {
        return Err(GitError::invalid_input("没有选中任何文件", Some("paths")));
    }
    let mut args = vec!["add".to_string(), "--".to_string()];
    args.extend(paths.iter().cloned());
    Ok(args)
}

/// 标题必填；正文为空时只传一个 -m
pub fn commit_args(title: &str, message: &str) -> GitResult<Vec<String>> {
    if title.trim().is_empty() {
        return Err(GitError::invalid_input("提交标题不能为空", Some("title")));
    }
    let mut args = vec!["commit".to_string(), "-m".to_string(), title.to_string()];
    if !message.trim().is_empty() {
        args.push("-m".to_string());
        args.push(message.to_string());
    }
    Ok(args)
}

pub fn push_args() -> Vec<String> {
    vec!["push".to_string()]
}
