// 后台 git 任务：界面发送命令，worker 逐条执行并回传事件

use tokio::sync::mpsc;
use tokio::task::JoinHandle;

use crate::git::{CommandExecutor, GitClient, LogRecord, StatusRecord};
use crate::infrastructure::error::GitError;

/// 界面发出的 git 命令
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GitCommand {
    RefreshLog,
    RefreshStatus,
    AddAll,
    AddPaths(Vec<String>),
    Commit { title: String, message: String },
    Push,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OperationKind {
    Log,
    Status,
    AddAll,
    AddSelected,
    Commit,
    Push,
}

impl OperationKind {
    pub fn label(&self) -> &'static str {
        match self {
            OperationKind::Log => "加载日志",
            OperationKind::Status => "加载状态",
            OperationKind::AddAll => "暂存全部",
            OperationKind::AddSelected => "暂存所选",
            OperationKind::Commit => "提交",
            OperationKind::Push => "推送",
        }
    }

    pub fn is_mutating(&self) -> bool {
        !matches!(self, OperationKind::Log | OperationKind::Status)
    }
}

impl GitCommand {
    pub fn kind(&self) -> OperationKind {
        match self {
            GitCommand::RefreshLog => OperationKind::Log,
            GitCommand::RefreshStatus => OperationKind::Status,
            GitCommand::AddAll => OperationKind::AddAll,
            GitCommand::AddPaths(_) => OperationKind::AddSelected,
            GitCommand::Commit { .. } => OperationKind::Commit,
            GitCommand::Push => OperationKind::Push,
        }
    }

    pub fn is_mutating(&self) -> bool {
        self.kind().is_mutating()
    }
}

/// worker 回传的结果
#[derive(Debug, Clone)]
pub enum GitEvent {
    Started(OperationKind),
    LogLoaded(Vec<LogRecord>),
    StatusLoaded(Vec<StatusRecord>),
    /// 修改类操作完成，附带操作后的最新状态
    Completed {
        kind: OperationKind,
        status: Vec<StatusRecord>,
    },
    Failed {
        kind: OperationKind,
        error: GitError,
    },
}

/// 单 worker 的命令调度器
///
/// 命令按提交顺序逐条执行，同一工作区上不会并发运行两个 git 进程。
pub struct Dispatcher {
    commands: mpsc::UnboundedSender<GitCommand>,
    events: mpsc::UnboundedReceiver<GitEvent>,
    worker: Option<JoinHandle<()>>,
}

impl Dispatcher {
    pub fn spawn<E>(client: GitClient<E>) -> Self
    where
        E: CommandExecutor + 'static,
    {
        let (command_tx, command_rx) = mpsc::unbounded_channel();
        let (event_tx, event_rx) = mpsc::unbounded_channel();
        let worker = tokio::spawn(run_worker(client, command_rx, event_tx));
        Self {
            commands: command_tx,
            events: event_rx,
            worker: Some(worker),
        }
    }

    /// worker 已停止时返回 false
    pub fn submit(&self, command: GitCommand) -> bool {
        tracing::debug!(?command, "提交 git 命令");
        self.commands.send(command).is_ok()
    }

    pub fn try_next_event(&mut self) -> Option<GitEvent> {
        self.events.try_recv().ok()
    }

    pub async fn next_event(&mut self) -> Option<GitEvent> {
        self.events.recv().await
    }

    /// 中止 worker；正在运行的 git 子进程随之被结束
    pub fn shutdown(&mut self) {
        if let Some(worker) = self.worker.take() {
            worker.abort();
        }
    }
}

impl Drop for Dispatcher {
    fn drop(&mut self) {
        self.shutdown();
    }
}

async fn run_worker<E: CommandExecutor>(
    client: GitClient<E>,
    mut commands: mpsc::UnboundedReceiver<GitCommand>,
    events: mpsc::UnboundedSender<GitEvent>,
) {
    while let Some(command) = commands.recv().await {
        if events.send(GitEvent::Started(command.kind())).is_err() {
            break;
        }
        let event = execute_command(&client, command).await;
        if events.send(event).is_err() {
            break;
        }
    }
    tracing::debug!("git worker 退出");
}

pub async fn execute_command<E: CommandExecutor>(client: &GitClient<E>, command: GitCommand) -> GitEvent {
    let kind = command.kind();
    let result = match command {
        GitCommand::RefreshLog => return wrap(kind, client.log().await, GitEvent::LogLoaded),
        GitCommand::RefreshStatus => {
            return wrap(kind, client.status().await, GitEvent::StatusLoaded)
        }
        GitCommand::AddAll => client.add_all().await,
        GitCommand::AddPaths(paths) => client.add_paths(&paths).await,
        GitCommand::Commit { title, message } => client.commit(&title, &message).await,
        GitCommand::Push => client.push().await,
    };
    wrap(kind, result, |status| GitEvent::Completed { kind, status })
}

fn wrap<T>(
    kind: OperationKind,
    result: Result<T, GitError>,
    on_success: impl FnOnce(T) -> GitEvent,
) -> GitEvent {
    match result {
        Ok(value) => on_success(value),
        Err(error) => {
            tracing::warn!(operation = kind.label(), %error, "git 操作失败");
            GitEvent::Failed { kind, error }
        }
    }
}
