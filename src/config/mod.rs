use serde::Deserialize;
use std::env;
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::infrastructure::error::{GitError, GitResult};

pub const DEFAULT_LOG_LIMIT: u32 = 200;
pub const DEFAULT_TIMEOUT_SECS: u64 = 60;

#[derive(Debug, Clone, PartialEq)]
pub struct Config {
    /// git 可执行文件（名称或路径）
    pub git_binary: String,
    /// 工作区路径，None 表示当前目录
    pub repo_path: Option<PathBuf>,
    /// 子进程输出使用的编码标签（WHATWG 名称，如 utf-8、gbk、windows-1252）
    pub encoding: String,
    pub timeout_secs: u64,
    pub log_limit: u32,
    pub debug: bool,
    pub log_file: Option<PathBuf>,
}

/// 配置文件中的可选字段，未出现的字段保持默认值
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct FileConfig {
    git: Option<String>,
    repo: Option<PathBuf>,
    encoding: Option<String>,
    timeout_secs: Option<u64>,
    log_limit: Option<u32>,
    debug: Option<bool>,
    log_file: Option<PathBuf>,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            git_binary: "git".to_string(),
            repo_path: None,
            encoding: "utf-8".to_string(),
            timeout_secs: DEFAULT_TIMEOUT_SECS,
            log_limit: DEFAULT_LOG_LIMIT,
            debug: false,
            log_file: None,
        }
    }
}

impl Config {
    /// 按 配置文件 -> .env -> 环境变量 的顺序加载，后者覆盖前者
    pub fn load(config_file: Option<&Path>) -> GitResult<Self> {
        let mut config = Config::default();

        match config_file {
            Some(path) => config.load_from_file(path)?,
            None => {
                if let Some(path) = default_config_dir().map(|dir| dir.join("config.toml")) {
                    if path.exists() {
                        config.load_from_file(&path)?;
                    }
                }
            }
        }

        #[cfg(not(test))]
        config.load_from_env_file();
        config.load_from_env();

        Ok(config)
    }

    pub fn load_from_file(&mut self, path: &Path) -> GitResult<()> {
        let content = std::fs::read_to_string(path).map_err(|e| {
            GitError::config(format!("无法读取配置文件 {}: {}", path.display(), e))
        })?;
        self.merge_toml(&content)
            .map_err(|e| GitError::config(format!("{}: {}", path.display(), e)))
    }

    fn merge_toml(&mut self, content: &str) -> Result<(), toml::de::Error> {
        let file: FileConfig = toml::from_str(content)?;
        if let Some(git) = file.git {
            self.git_binary = git;
        }
        if let Some(repo) = file.repo {
            self.repo_path = Some(repo);
        }
        if let Some(encoding) = file.encoding {
            self.encoding = encoding;
        }
        if let Some(timeout) = file.timeout_secs {
            self.timeout_secs = timeout;
        }
        if let Some(limit) = file.log_limit {
            self.log_limit = limit;
        }
        if let Some(debug) = file.debug {
            self.debug = debug;
        }
        if let Some(log_file) = file.log_file {
            self.log_file = Some(log_file);
        }
        Ok(())
    }

    pub fn load_from_env_file(&mut self) {
        // 尝试从用户主目录加载
        if let Some(dir) = default_config_dir() {
            let user_env_path = dir.join(".env");
            if user_env_path.exists() {
                dotenvy::from_path(user_env_path).ok();
            }
        }

        // 尝试从当前目录加载
        dotenvy::dotenv().ok();
    }

    pub fn load_from_env(&mut self) {
        if let Ok(git) = env::var("GIT_PANEL_GIT") {
            self.git_binary = git;
        }
        if let Ok(repo) = env::var("GIT_PANEL_REPO") {
            self.repo_path = Some(PathBuf::from(repo));
        }
        if let Ok(encoding) = env::var("GIT_PANEL_ENCODING") {
            self.encoding = encoding;
        }
        if let Some(timeout) = env::var("GIT_PANEL_TIMEOUT_SECS")
            .ok()
            .and_then(|v| v.parse().ok())
        {
            self.timeout_secs = timeout;
        }
        if let Some(limit) = env::var("GIT_PANEL_LOG_LIMIT")
            .ok()
            .and_then(|v| v.parse().ok())
        {
            self.log_limit = limit;
        }
        if let Ok(debug) = env::var("GIT_PANEL_DEBUG") {
            self.debug = matches!(debug.as_str(), "1" | "true" | "yes");
        }
        if let Ok(log_file) = env::var("GIT_PANEL_LOG_FILE") {
            self.log_file = Some(PathBuf::from(log_file));
        }
    }

    pub fn update_from_args(&mut self, args: &crate::cli::args::Args) {
        // 命令行参数优先级最高
        if let Some(git) = &args.git {
            self.git_binary = git.clone();
        }
        if let Some(repo) = &args.repo {
            self.repo_path = Some(repo.clone());
        }
        if let Some(encoding) = &args.encoding {
            self.encoding = encoding.clone();
        }
        if let Some(timeout) = args.timeout {
            self.timeout_secs = timeout;
        }
        if let Some(limit) = args.limit {
            self.log_limit = limit;
        }
        if args.debug {
            self.debug = true;
        }
        if let Some(log_file) = &args.log_file {
            self.log_file = Some(log_file.clone());
        }
    }

    pub fn validate(&self) -> GitResult<()> {
        if self.git_binary.trim().is_empty() {
            return Err(GitError::config("git 可执行文件不能为空"));
        }
        if self.timeout_secs == 0 {
            return Err(GitError::config("超时时间必须大于 0 秒"));
        }
        if encoding_rs::Encoding::for_label(self.encoding.as_bytes()).is_none() {
            return Err(GitError::config(format!(
                "不支持的编码: {} (请使用 WHATWG 编码名称，如 utf-8、gbk、windows-1252)",
                self.encoding
            )));
        }
        Ok(())
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

fn default_config_dir() -> Option<PathBuf> {
    env::var_os("HOME").map(|home| PathBuf::from(home).join(".git-panel"))
}
