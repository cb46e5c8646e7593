use chrono::{DateTime, Local};

use super::async_manager::{GitCommand, GitEvent, OperationKind};
use crate::git::{LogRecord, StatusRecord};
use crate::infrastructure::error::{ErrorSeverity, GitError};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Tab {
    #[default]
    Log,
    Status,
    Commit,
}

impl Tab {
    pub const ALL: [Tab; 3] = [Tab::Log, Tab::Status, Tab::Commit];

    pub fn title(&self) -> &'static str {
        match self {
            Tab::Log => "Log",
            Tab::Status => "Status",
            Tab::Commit => "Commit",
        }
    }

    pub fn index(&self) -> usize {
        match self {
            Tab::Log => 0,
            Tab::Status => 1,
            Tab::Commit => 2,
        }
    }

    pub fn next(&self) -> Tab {
        Tab::ALL[(self.index() + 1) % Tab::ALL.len()]
    }

    pub fn previous(&self) -> Tab {
        Tab::ALL[(self.index() + Tab::ALL.len() - 1) % Tab::ALL.len()]
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CommitField {
    #[default]
    Title,
    Message,
}

/// 显示在标签栏下方的错误
#[derive(Debug, Clone, PartialEq)]
pub struct ErrorBanner {
    pub kind: OperationKind,
    pub operation: &'static str,
    pub message: String,
    pub stderr: Option<String>,
    pub severity: ErrorSeverity,
}

impl ErrorBanner {
    pub fn new(kind: OperationKind, error: &GitError) -> Self {
        Self {
            kind,
            operation: kind.label(),
            message: error.to_string(),
            stderr: error
                .stderr()
                .map(|s| s.trim().to_string())
                .filter(|s| !s.is_empty()),
            severity: error.severity(),
        }
    }
}

/// TUI 的全部状态，渲染函数只读取它
#[derive(Debug, Clone, Default)]
pub struct AppState {
    pub tab: Tab,
    /// None 表示尚未加载或上次加载失败
    pub log: Option<Vec<LogRecord>>,
    pub status: Option<Vec<StatusRecord>>,
    pub log_selected: usize,
    pub status_selected: usize,
    pub commit_title: String,
    pub commit_message: String,
    pub commit_field: CommitField,
    pub pending: Option<OperationKind>,
    pub error: Option<ErrorBanner>,
    pub notice: Option<String>,
    pub last_refresh: Option<DateTime<Local>>,
    pub repo_label: String,
    pub should_quit: bool,
}

impl AppState {
    pub fn new(repo_label: impl Into<String>) -> Self {
        Self {
            repo_label: repo_label.into(),
            ..Self::default()
        }
    }

    /// 启动时加载两个列表
    pub fn initial_commands() -> Vec<GitCommand> {
        vec![GitCommand::RefreshLog, GitCommand::RefreshStatus]
    }

    /// 切换标签页；目标页数据未加载或加载失败时返回加载命令
    ///
    /// 其他操作进行中也照样排队，worker 会按顺序执行。
    pub fn select_tab(&mut self, tab: Tab) -> Option<GitCommand> {
        self.tab = tab;
        let command = match tab {
            Tab::Log if self.log.is_none() => GitCommand::RefreshLog,
            Tab::Status if self.status.is_none() => GitCommand::RefreshStatus,
            _ => return None,
        };
        if self.pending == Some(command.kind()) {
            return None;
        }
        Some(command)
    }

    /// 当前标签页对应的刷新命令
    pub fn refresh_command(&self) -> GitCommand {
        match self.tab {
            Tab::Log => GitCommand::RefreshLog,
            Tab::Status | Tab::Commit => GitCommand::RefreshStatus,
        }
    }

    pub fn is_busy(&self) -> bool {
        self.pending.is_some()
    }

    pub fn staged_paths(&self) -> Vec<String> {
        self.status
            .iter()
            .flatten()
            .filter(|record| record.staged)
            .map(StatusRecord::path)
            .collect()
    }

    pub fn toggle_selected_status(&mut self) {
        if let Some(record) = self
            .status
            .as_mut()
            .and_then(|records| records.get_mut(self.status_selected))
        {
            record.toggle_staged();
        }
    }

    pub fn set_error(&mut self, kind: OperationKind, error: &GitError) {
        self.error = Some(ErrorBanner::new(kind, error));
        self.notice = None;
    }

    /// 应用 worker 事件，返回需要追加执行的命令
    pub fn apply_event(&mut self, event: GitEvent) -> Option<GitCommand> {
        match event {
            GitEvent::Started(kind) => {
                self.pending = Some(kind);
                None
            }
            GitEvent::LogLoaded(records) => {
                self.pending = None;
                self.log_selected = clamp(self.log_selected, records.len());
                self.log = Some(records);
                self.mark_refreshed(OperationKind::Log);
                None
            }
            GitEvent::StatusLoaded(records) => {
                self.pending = None;
                self.replace_status(records);
                self.mark_refreshed(OperationKind::Status);
                None
            }
            GitEvent::Completed { kind, status } => {
                self.pending = None;
                self.replace_status(status);
                self.mark_refreshed(kind);
                self.notice = Some(format!("{}完成", kind.label()));
                if kind == OperationKind::Commit {
                    self.commit_title.clear();
                    self.commit_message.clear();
                    self.commit_field = CommitField::Title;
                    // 新提交需要出现在日志里
                    return Some(GitCommand::RefreshLog);
                }
                None
            }
            GitEvent::Failed { kind, error } => {
                self.pending = None;
                match kind {
                    OperationKind::Log => self.log = None,
                    OperationKind::Status => self.status = None,
                    _ => {}
                }
                self.set_error(kind, &error);
                None
            }
        }
    }

    fn replace_status(&mut self, records: Vec<StatusRecord>) {
        self.status_selected = clamp(self.status_selected, records.len());
        self.status = Some(records);
    }

    /// 只清除被这次成功覆盖的错误：同类操作的失败，
    /// 或者（修改操作成功时）之前修改操作和状态加载的失败
    fn mark_refreshed(&mut self, kind: OperationKind) {
        let superseded = self.error.as_ref().is_some_and(|banner| {
            banner.kind == kind
                || (kind.is_mutating()
                    && (banner.kind.is_mutating() || banner.kind == OperationKind::Status))
        });
        if superseded {
            self.error = None;
        }
        self.last_refresh = Some(Local::now());
    }
}

fn clamp(index: usize, len: usize) -> usize {
    if len == 0 {
        0
    } else {
        index.min(len - 1)
    }
}
