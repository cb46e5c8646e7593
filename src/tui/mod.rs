pub mod app;
pub mod async_manager;
pub mod input_handler;
pub mod rendering;

use anyhow::Result;
use crossterm::{
    event::{self, Event},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{
    backend::{Backend, CrosstermBackend},
    Terminal,
};
use std::io;
use std::time::Duration;

use crate::git::{CommandExecutor, GitClient};
use app::AppState;
use async_manager::Dispatcher;

const TICK: Duration = Duration::from_millis(100);

/// 运行 TUI 应用
pub async fn run_tui<E>(client: GitClient<E>, repo_label: String) -> Result<()>
where
    E: CommandExecutor + 'static,
{
    // 设置终端
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let mut dispatcher = Dispatcher::spawn(client);
    let mut state = AppState::new(repo_label);
    for command in AppState::initial_commands() {
        dispatcher.submit(command);
    }

    let res = run_app(&mut terminal, &mut state, &mut dispatcher).await;
    dispatcher.shutdown();

    // 恢复终端
    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    res
}

/// 主循环：绘制 -> 处理按键 -> 消费 worker 事件
async fn run_app<B: Backend>(
    terminal: &mut Terminal<B>,
    state: &mut AppState,
    dispatcher: &mut Dispatcher,
) -> Result<()> {
    loop {
        terminal.draw(|f| rendering::render(f, state))?;

        if let Some(Event::Key(key)) = next_input(poll_terminal).await? {
            if let Some(command) = input_handler::handle_key(state, key) {
                if !dispatcher.submit(command) {
                    anyhow::bail!("git worker 已停止");
                }
            }
        }

        if state.should_quit {
            tracing::info!("退出 TUI");
            return Ok(());
        }

        while let Some(git_event) = dispatcher.try_next_event() {
            if let Some(follow_up) = state.apply_event(git_event) {
                dispatcher.submit(follow_up);
            }
        }
    }
}

/// 在阻塞线程池里等待终端输入，等待期间 runtime 继续推进 git worker
async fn next_input<F>(poll: F) -> Result<Option<Event>>
where
    F: FnOnce() -> io::Result<Option<Event>> + Send + 'static,
{
    Ok(tokio::task::spawn_blocking(poll).await??)
}

fn poll_terminal() -> io::Result<Option<Event>> {
    if event::poll(TICK)? {
        event::read().map(Some)
    } else {
        Ok(None)
    }
}
