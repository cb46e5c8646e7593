use super::core::{CommandExecutor, CommandRunner};
use super::invocation;
use super::models::{LogRecord, StatusRecord};
use super::parser::{parse_log, parse_status};
use crate::config::Config;
use crate::infrastructure::error::{GitError, GitResult};

/// 日志 / 状态查询与 add、commit、push 操作
///
/// 每个修改仓库的操作成功后都会重新获取一次状态并返回，
/// 调用方拿到的始终是完整的新列表。
pub struct GitClient<E = CommandRunner> {
    executor: E,
    log_limit: Option<u32>,
}

impl GitClient<CommandRunner> {
    pub fn from_config(config: &Config) -> GitResult<Self> {
        let runner = CommandRunner::from_config(config)?;
        Ok(Self::new(runner).with_log_limit(config.log_limit))
    }
}

impl<E: CommandExecutor> GitClient<E> {
    pub fn new(executor: E) -> Self {
        Self {
            executor,
            log_limit: None,
        }
    }

    /// 0 表示不限制
    pub fn with_log_limit(mut self, limit: u32) -> Self {
        self.log_limit = (limit > 0).then_some(limit);
        self
    }

    pub fn executor(&self) -> &E {
        &self.executor
    }

    /// 还没有任何提交的仓库返回空列表
    pub async fn log(&self) -> GitResult<Vec<LogRecord>> {
        if !self.has_commits().await? {
            tracing::debug!("仓库尚无提交");
            return Ok(Vec::new());
        }
        let raw = self
            .executor
            .execute(&invocation::log_args(self.log_limit))
            .await?;
        let records = parse_log(&raw);
        tracing::debug!(count = records.len(), "已加载提交日志");
        Ok(records)
    }

    async fn has_commits(&self) -> GitResult<bool> {
        match self.executor.execute(&invocation::head_args()).await {
            Ok(_) => Ok(true),
            Err(GitError::CommandFailed {
                exit_code: Some(1),
                ..
            }) => Ok(false),
            Err(e) => Err(e),
        }
    }

    pub async fn status(&self) -> GitResult<Vec<StatusRecord>> {
        let raw = self.executor.execute(&invocation::status_args()).await?;
        let records = parse_status(&raw);
        tracing::debug!(count = records.len(), "已加载工作区状态");
        Ok(records)
    }

    pub async fn add_all(&self) -> GitResult<Vec<StatusRecord>> {
        self.mutate("add -A", invocation::add_all_args()).await
    }

    pub async fn add_paths(&self, paths: &[String]) -> GitResult<Vec<StatusRecord>> {
        let args = invocation::add_paths_args(paths)?;
        self.mutate("add", args).await
    }

    pub async fn commit(&self, title: &str, message: &str) -> GitResult<Vec<StatusRecord>> {
        let args = invocation::commit_args(title, message)?;
        self.mutate("commit", args).await
    }

    pub async fn push(&self) -> GitResult<Vec<StatusRecord>> {
        self.mutate("push", invocation::push_args()).await
    }

    async fn mutate(&self, operation: &str, args: Vec<String>) -> GitResult<Vec<StatusRecord>> {
        self.executor.execute(&args).await?;
        tracing::info!(operation, "git 操作完成");
        self.status().await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::git::testing::ScriptedExecutor;
    use crate::infrastructure::error::GitError;

    #[tokio::test]
    async fn test_log_uses_limit_and_parses() {
        let executor = ScriptedExecutor::new().respond(
            "log",
            "abc123\tJane Doe\t2024-01-01\tFix bug\ndef456\tJohn\t2024-01-02\tAdd feature\n",
        );
        let client = GitClient::new(executor).with_log_limit(2);

        let records = client.log().await.unwrap();
        assert_eq!(records.len(), 2);
        assert_eq!(records[0].fields, vec!["abc123", "Jane Doe", "2024-01-01", "Fix bug"]);

        let calls = client.executor().calls();
        assert_eq!(calls[0], invocation::head_args());
        assert_eq!(calls[1], invocation::log_args(Some(2)));
    }

    #[tokio::test]
    async fn test_zero_limit_means_unlimited() {
        let client = GitClient::new(ScriptedExecutor::new()).with_log_limit(0);
        client.log().await.unwrap();
        assert_eq!(client.executor().calls()[1], invocation::log_args(None));
    }

    #[tokio::test]
    async fn test_status_deduplicates() {
        let executor = ScriptedExecutor::new().respond("status", " M file1.txt\n?? file2.txt\n M file1.txt\n");
        let client = GitClient::new(executor);
        let records = client.status().await.unwrap();
        assert_eq!(records.len(), 2);
        assert_eq!(records[1].line, "?? file2.txt");
    }

    #[tokio::test]
    async fn test_commit_passes_quotes_verbatim_then_refreshes_status() {
        let executor = ScriptedExecutor::new().respond("status", "?? later.txt\n");
        let client = GitClient::new(executor);

        let status = client
            .commit("Say \"hello\"", "He said \"bye\" and left")
            .await
            .unwrap();
        assert_eq!(status.len(), 1);

        let calls = client.executor().calls();
        assert_eq!(
            calls[0],
            vec!["commit", "-m", "Say \"hello\"", "-m", "He said \"bye\" and left"]
        );
        assert_eq!(client.executor().subcommands(), vec!["commit", "status"]);
    }

    #[tokio::test]
    async fn test_failed_mutation_skips_refresh() {
        let executor = ScriptedExecutor::new().fail(
            "push",
            GitError::command_failed("git push", Some(128), "fatal: no upstream"),
        );
        let client = GitClient::new(executor);

        let err = client.push().await.unwrap_err();
        assert_eq!(err.stderr(), Some("fatal: no upstream"));
        assert_eq!(client.executor().subcommands(), vec!["push"]);
    }

    #[tokio::test]
    async fn test_missing_git_is_not_an_empty_list() {
        let executor = ScriptedExecutor::new().fail(
            "log",
            GitError::CommandNotFound {
                program: "git".to_string(),
            },
        );
        let client = GitClient::new(executor);
        assert!(matches!(
            client.log().await,
            Err(GitError::CommandNotFound { .. })
        ));
    }

    #[tokio::test]
    async fn test_unborn_head_is_an_empty_log() {
        let executor = ScriptedExecutor::new().fail(
            "rev-parse",
            GitError::command_failed("git rev-parse --verify -q HEAD", Some(1), ""),
        );
        let client = GitClient::new(executor);

        assert!(client.log().await.unwrap().is_empty());
        assert_eq!(client.executor().subcommands(), vec!["rev-parse"]);
    }

    #[tokio::test]
    async fn test_head_check_outside_repository_fails() {
        let executor = ScriptedExecutor::new().fail(
            "rev-parse",
            GitError::command_failed(
                "git rev-parse --verify -q HEAD",
                Some(128),
                "fatal: not a git repository (or any of the parent directories): .git",
            ),
        );
        let client = GitClient::new(executor);

        let err = client.log().await.unwrap_err();
        assert!(err.stderr().unwrap().contains("not a git repository"));
        assert_eq!(client.executor().subcommands(), vec!["rev-parse"]);
    }

    #[tokio::test]
    async fn test_empty_title_never_reaches_git() {
        let client = GitClient::new(ScriptedExecutor::new());
        let err = client.commit("", "body").await.unwrap_err();
        assert!(matches!(err, GitError::InvalidInput { .. }));
        assert!(client.executor().calls().is_empty());
    }

    #[tokio::test]
    async fn test_add_all_and_add_paths() {
        let client = GitClient::new(ScriptedExecutor::new());
        client.add_all().await.unwrap();
        client
            .add_paths(&["src/lib.rs".to_string()])
            .await
            .unwrap();

        let calls = client.executor().calls();
        assert_eq!(calls[0], vec!["add", "-A"]);
        assert_eq!(calls[2], vec!["add", "--", "src/lib.rs"]);
        assert_eq!(
            client.executor().subcommands(),
            vec!["add", "status", "add", "status"]
        );
    }

    #[tokio::test]
    async fn test_nonexistent_binary_through_runner() {
        let client = GitClient::new(CommandRunner::new("git-panel-missing-binary"));
        assert!(matches!(
            client.status().await,
            Err(GitError::CommandNotFound { .. })
        ));
    }
}
