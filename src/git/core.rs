use async_trait::async_trait;
use encoding_rs::{Encoding, UTF_8};
use std::ffi::OsStr;
use std::io::ErrorKind;
use std::path::PathBuf;
use std::process::Stdio;
use std::time::Duration;
use tokio::process::Command;

use crate::config::{Config, DEFAULT_TIMEOUT_SECS};
use crate::infrastructure::error::{GitError, GitResult};

/// 执行一条外部命令并返回 stdout 文本
#[async_trait]
pub trait CommandExecutor: Send + Sync {
    async fn execute(&self, args: &[String]) -> GitResult<String>;
}

/// 基于子进程的命令执行器
///
/// 参数以独立的 argv 传递，不经过 shell；stdout 按配置的编码解码，
/// 非零退出码会连同 stderr 一起返回给调用方。
#[derive(Debug, Clone)]
pub struct CommandRunner {
    program: String,
    working_dir: Option<PathBuf>,
    encoding: &'static Encoding,
    timeout: Duration,
}

impl CommandRunner {
    pub fn new(program: impl Into<String>) -> Self {
        Self {
            program: program.into(),
            working_dir: None,
            encoding: UTF_8,
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
        }
    }

    pub fn from_config(config: &Config) -> GitResult<Self> {
        let mut runner = Self::new(config.git_binary.clone())
            .with_encoding(&config.encoding)?
            .with_timeout(config.timeout());
        if let Some(dir) = &config.repo_path {
            runner = runner.with_working_dir(dir.clone());
        }
        Ok(runner)
    }

    pub fn with_working_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.working_dir = Some(dir.into());
        self
    }

    /// 使用 WHATWG 编码标签，如 "utf-8"、"gbk"、"windows-1252"
    pub fn with_encoding(mut self, label: &str) -> GitResult<Self> {
        self.encoding = Encoding::for_label(label.trim().as_bytes())
            .ok_or_else(|| GitError::config(format!("不支持的编码: {}", label)))?;
        Ok(self)
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn program(&self) -> &str {
        &self.program
    }

    pub fn encoding_name(&self) -> &'static str {
        self.encoding.name()
    }

    pub async fn run<S: AsRef<OsStr>>(&self, args: &[S]) -> GitResult<String> {
        let command_line = self.describe(args);

        if let Some(dir) = &self.working_dir {
            if !dir.is_dir() {
                return Err(GitError::Io {
                    message: format!("工作目录不存在: {}", dir.display()),
                });
            }
        }

        let mut command = Command::new(&self.program);
        command
            .args(args)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            // 凭据提示会让子进程一直等待输入
            .env("GIT_TERMINAL_PROMPT", "0")
            .kill_on_drop(true);
        if let Some(dir) = &self.working_dir {
            command.current_dir(dir);
        }
        #[cfg(windows)]
        {
            const CREATE_NO_WINDOW: u32 = 0x0800_0000;
            command.creation_flags(CREATE_NO_WINDOW);
        }

        tracing::debug!(command = %command_line, cwd = ?self.working_dir, "执行命令");

        let child = command.spawn().map_err(|e| match e.kind() {
            ErrorKind::NotFound => GitError::CommandNotFound {
                program: self.program.clone(),
            },
            _ => GitError::Io {
                message: format!("无法启动 {}: {}", self.program, e),
            },
        })?;

        // 超时后 future 被丢弃，kill_on_drop 负责结束子进程
        let output = match tokio::time::timeout(self.timeout, child.wait_with_output()).await {
            Ok(output) => output?,
            Err(_) => {
                tracing::warn!(command = %command_line, timeout = ?self.timeout, "命令超时");
                return Err(GitError::timeout(command_line, self.timeout.as_secs()));
            }
        };

        if !output.status.success() {
            let (stderr, _, _) = self.encoding.decode(&output.stderr);
            tracing::warn!(
                command = %command_line,
                exit_code = ?output.status.code(),
                stderr = %stderr.trim(),
                "命令执行失败"
            );
            return Err(GitError::command_failed(
                command_line,
                output.status.code(),
                stderr.into_owned(),
            ));
        }

        self.encoding
            .decode_without_bom_handling_and_without_replacement(&output.stdout)
            .map(|text| text.into_owned())
            .ok_or_else(|| GitError::DecodingError {
                command: command_line,
                encoding: self.encoding.name().to_string(),
            })
    }

    fn describe<S: AsRef<OsStr>>(&self, args: &[S]) -> String {
        let mut line = self.program.clone();
        for arg in args {
            line.push(' ');
            line.push_str(&arg.as_ref().to_string_lossy());
        }
        line
    }
}

#[async_trait]
impl CommandExecutor for CommandRunner {
    async fn execute(&self, args: &[String]) -> GitResult<String> {
        self.run(args).await
    }
}
