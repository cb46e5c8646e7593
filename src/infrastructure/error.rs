use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Git 操作错误类型
#[derive(Error, Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum GitError {
    #[error("找不到命令: {program} (请确认已安装并在 PATH 中)")]
    CommandNotFound { program: String },

    #[error("命令执行失败: {command} (exit code: {}) {}", display_code(.exit_code), .stderr.trim())]
    CommandFailed {
        command: String,
        exit_code: Option<i32>,
        stderr: String,
    },

    #[error("输出解码失败: {command} 的输出不是有效的 {encoding} 文本")]
    DecodingError { command: String, encoding: String },

    #[error("超时错误: {command} 超时 ({timeout_seconds}s)")]
    Timeout { command: String, timeout_seconds: u64 },

    #[error("验证错误: {message}")]
    InvalidInput { message: String, field: Option<String> },

    #[error("配置错误: {message}")]
    Configuration { message: String },

    #[error("IO 错误: {message}")]
    Io { message: String },
}

fn display_code(code: &Option<i32>) -> String {
    match code {
        Some(code) => code.to_string(),
        None => "signal".to_string(),
    }
}

pub type GitResult<T> = Result<T, GitError>;

impl GitError {
    /// 获取错误的严重程度
    pub fn severity(&self) -> ErrorSeverity {
        match self {
            GitError::CommandNotFound { .. } => ErrorSeverity::Critical,
            GitError::Configuration { .. } => ErrorSeverity::Critical,
            GitError::CommandFailed { .. } => ErrorSeverity::High,
            GitError::DecodingError { .. } => ErrorSeverity::High,
            GitError::Io { .. } => ErrorSeverity::High,
            GitError::Timeout { .. } => ErrorSeverity::Medium,
            GitError::InvalidInput { .. } => ErrorSeverity::Low,
        }
    }

    /// 子进程写入 stderr 的内容（仅 CommandFailed 携带）
    pub fn stderr(&self) -> Option<&str> {
        match self {
            GitError::CommandFailed { stderr, .. } => Some(stderr.as_str()),
            _ => None,
        }
    }

    /// 创建命令失败错误
    pub fn command_failed(
        command: impl Into<String>,
        exit_code: Option<i32>,
        stderr: impl Into<String>,
    ) -> Self {
        GitError::CommandFailed {
            command: command.into(),
            exit_code,
            stderr: stderr.into(),
        }
    }

    /// 创建验证错误
    pub fn invalid_input(message: impl Into<String>, field: Option<&str>) -> Self {
        GitError::InvalidInput {
            message: message.into(),
            field: field.map(str::to_string),
        }
    }

    /// 创建配置错误
    pub fn config(message: impl Into<String>) -> Self {
        GitError::Configuration {
            message: message.into(),
        }
    }

    /// 创建超时错误
    pub fn timeout(command: impl Into<String>, timeout_seconds: u64) -> Self {
        GitError::Timeout {
            command: command.into(),
            timeout_seconds,
        }
    }
}

/// 错误严重程度
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub enum ErrorSeverity {
    Critical,
    High,
    Medium,
    Low,
}

impl From<std::io::Error> for GitError {
    fn from(error: std::io::Error) -> Self {
        GitError::Io {
            message: error.to_string(),
        }
    }
}
