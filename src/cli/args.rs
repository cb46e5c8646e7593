use clap::{Parser, ValueEnum};
use std::path::PathBuf;

#[derive(Parser, Debug, Default)]
#[command(
    name = "git-panel",
    version,
    about = "Git 面板 - 查看日志与状态，暂存、提交并推送",
    long_about = "git-panel 调用本机 git 命令并解析输出。不带动作参数时打开 Log / Status / Commit 三个标签页的终端界面；带 --log、--status、--add-all、--title、--push 时以命令行方式执行。"
)]
pub struct Args {
    /// 打印提交日志（短哈希、作者、日期、标题）
    #[arg(long, default_value_t = false)]
    pub log: bool,

    /// 打印工作区状态（git status --short）
    #[arg(long, default_value_t = false)]
    pub status: bool,

    /// 提交前执行 git add -A
    #[arg(short = 'a', long = "add-all", default_value_t = false)]
    pub add_all: bool,

    /// 提交标题（指定后执行 git commit）
    #[arg(short = 't', long, value_name = "TITLE")]
    pub title: Option<String>,

    /// 提交正文
    #[arg(short = 'm', long, value_name = "MESSAGE", default_value = "")]
    pub message: String,

    /// 提交后（或单独）执行 git push
    #[arg(short = 'p', long, default_value_t = false)]
    pub push: bool,

    /// 日志条数上限
    #[arg(short = 'n', long, value_name = "N")]
    pub limit: Option<u32>,

    /// --log / --status 的输出格式
    #[arg(long, value_enum, default_value_t = OutputFormat::Text)]
    pub format: OutputFormat,

    /// 仓库路径（默认当前目录）
    #[arg(short = 'C', long, value_name = "PATH")]
    pub repo: Option<PathBuf>,

    /// git 可执行文件
    #[arg(long, value_name = "BIN")]
    pub git: Option<String>,

    /// git 输出的文本编码（WHATWG 名称）
    #[arg(long, value_name = "LABEL")]
    pub encoding: Option<String>,

    /// 单条 git 命令的超时时间（秒）
    #[arg(long, value_name = "SECS")]
    pub timeout: Option<u64>,

    /// 配置文件路径（默认 ~/.git-panel/config.toml）
    #[arg(long, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// 日志文件（TUI 模式下只有指定了才会写日志）
    #[arg(long = "log-file", value_name = "PATH")]
    pub log_file: Option<PathBuf>,

    /// 输出调试日志
    #[arg(short = 'd', long, default_value_t = false)]
    pub debug: bool,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    #[default]
    Text,
    Json,
}

impl Args {
    /// 是否指定了任何命令行动作；没有则进入 TUI
    pub fn has_action(&self) -> bool {
        self.log || self.status || self.add_all || self.title.is_some() || self.push
    }
}
