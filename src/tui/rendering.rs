use ratatui::{
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, List, ListItem, ListState, Paragraph, Tabs, Wrap},
    Frame,
};

use super::app::{AppState, CommitField, ErrorBanner, Tab};
use crate::infrastructure::error::ErrorSeverity;

const ALT_ROW_BG: Color = Color::Rgb(48, 48, 48);

/// 绘制整个界面，只读取状态
pub fn render(f: &mut Frame, state: &AppState) {
    let banner_height = match &state.error {
        Some(banner) if banner.stderr.is_some() => 4,
        Some(_) => 3,
        None => 0,
    };

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3),             // 标签栏
            Constraint::Length(banner_height), // 错误
            Constraint::Min(0),                // 内容
            Constraint::Length(1),             // 状态栏
        ])
        .split(f.size());

    render_tabs(f, state, chunks[0]);
    if let Some(banner) = &state.error {
        render_error(f, banner, chunks[1]);
    }
    match state.tab {
        Tab::Log => render_log(f, state, chunks[2]),
        Tab::Status => render_status(f, state, chunks[2]),
        Tab::Commit => render_commit(f, state, chunks[2]),
    }
    render_status_bar(f, state, chunks[3]);
}

fn render_tabs(f: &mut Frame, state: &AppState, area: Rect) {
    let titles: Vec<Line> = Tab::ALL.iter().map(|t| Line::from(t.title())).collect();
    let tabs = Tabs::new(titles)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .title(format!(" git-panel · {} ", state.repo_label)),
        )
        .select(state.tab.index())
        .style(Style::default().fg(Color::White))
        .highlight_style(
            Style::default()
                .fg(Color::Yellow)
                .add_modifier(Modifier::BOLD),
        );
    f.render_widget(tabs, area);
}

fn render_error(f: &mut Frame, banner: &ErrorBanner, area: Rect) {
    let color = match banner.severity {
        ErrorSeverity::Critical | ErrorSeverity::High => Color::Red,
        ErrorSeverity::Medium | ErrorSeverity::Low => Color::Yellow,
    };
    let mut lines = vec![Line::from(Span::styled(
        banner.message.clone(),
        Style::default().fg(color).add_modifier(Modifier::BOLD),
    ))];
    if let Some(stderr) = &banner.stderr {
        lines.push(Line::from(Span::styled(
            stderr.clone(),
            Style::default().fg(Color::Gray),
        )));
    }

    let paragraph = Paragraph::new(lines)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(Style::default().fg(color))
                .title(format!(" {}失败 ", banner.operation)),
        )
        .wrap(Wrap { trim: true });
    f.render_widget(paragraph, area);
}

/// 偶数行默认背景，奇数行深灰
fn row_style(index: usize) -> Style {
    if index % 2 == 1 {
        Style::default().bg(ALT_ROW_BG)
    } else {
        Style::default()
    }
}

fn placeholder(f: &mut Frame, area: Rect, title: &str, text: &str) {
    let paragraph = Paragraph::new(text.to_string())
        .style(Style::default().add_modifier(Modifier::BOLD))
        .alignment(Alignment::Center)
        .block(Block::default().borders(Borders::ALL).title(title.to_string()));
    f.render_widget(paragraph, area);
}

fn render_log(f: &mut Frame, state: &AppState, area: Rect) {
    let records = match &state.log {
        Some(records) if !records.is_empty() => records,
        Some(_) => return placeholder(f, area, "Log", "没有提交记录"),
        None if state.is_busy() => return placeholder(f, area, "Log", "加载中..."),
        None => return placeholder(f, area, "Log", "日志不可用"),
    };

    let items: Vec<ListItem> = records
        .iter()
        .enumerate()
        .map(|(i, record)| {
            let line = Line::from(vec![
                Span::styled(
                    format!("{:<9} ", record.hash().unwrap_or("")),
                    Style::default().fg(Color::Yellow),
                ),
                Span::styled(
                    format!("{:<10} ", record.date().unwrap_or("")),
                    Style::default().fg(Color::Cyan),
                ),
                Span::styled(
                    format!("{:<16} ", record.author().unwrap_or("")),
                    Style::default().fg(Color::Green),
                ),
                Span::raw(record.fields.get(3..).map(|f| f.join(" ")).unwrap_or_default()),
            ]);
            ListItem::new(line).style(row_style(i))
        })
        .collect();

    let list = List::new(items)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .title(format!("Log ({})", records.len())),
        )
        .highlight_style(Style::default().add_modifier(Modifier::BOLD | Modifier::REVERSED));

    let mut list_state = ListState::default();
    list_state.select(Some(state.log_selected));
    f.render_stateful_widget(list, area, &mut list_state);
}

fn render_status(f: &mut Frame, state: &AppState, area: Rect) {
    let records = match &state.status {
        Some(records) if !records.is_empty() => records,
        Some(_) => return placeholder(f, area, "Status", "没有修改的文件"),
        None if state.is_busy() => return placeholder(f, area, "Status", "加载中..."),
        None => return placeholder(f, area, "Status", "状态不可用"),
    };

    let items: Vec<ListItem> = records
        .iter()
        .enumerate()
        .map(|(i, record)| {
            let mark = if record.staged { "[x] " } else { "[ ] " };
            let code_color = match record.code() {
                "??" => Color::Red,
                code if code.starts_with(' ') => Color::Yellow,
                _ => Color::Green,
            };
            let line = Line::from(vec![
                Span::raw(mark),
                Span::styled(record.line.clone(), Style::default().fg(code_color)),
            ]);
            ListItem::new(line).style(row_style(i))
        })
        .collect();

    let list = List::new(items)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .title(format!("Status ({})", records.len())),
        )
        .highlight_style(Style::default().add_modifier(Modifier::BOLD | Modifier::REVERSED));

    let mut list_state = ListState::default();
    list_state.select(Some(state.status_selected));
    f.render_stateful_widget(list, area, &mut list_state);
}

fn render_commit(f: &mut Frame, state: &AppState, area: Rect) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3), // 标题
            Constraint::Min(3),    // 正文
            Constraint::Length(3), // 操作说明
        ])
        .split(area);

    let focused = Style::default().fg(Color::Yellow);
    let normal = Style::default().fg(Color::White);
    let (title_style, message_style) = match state.commit_field {
        CommitField::Title => (focused, normal),
        CommitField::Message => (normal, focused),
    };

    let title = Paragraph::new(state.commit_title.as_str())
        .block(Block::default().borders(Borders::ALL).title("Title").border_style(title_style));
    f.render_widget(title, chunks[0]);

    let message = Paragraph::new(state.commit_message.as_str())
        .wrap(Wrap { trim: false })
        .block(Block::default().borders(Borders::ALL).title("Message").border_style(message_style));
    f.render_widget(message, chunks[1]);

    let help = Paragraph::new("Ctrl+S: Commit | Ctrl+A: Add All | Ctrl+P: Push | Tab: 切换输入框 | Esc: 返回")
        .style(Style::default().fg(Color::Gray))
        .block(Block::default().borders(Borders::ALL));
    f.render_widget(help, chunks[2]);

    if state.commit_field == CommitField::Title {
        let x = chunks[0].x + 1 + state.commit_title.chars().count() as u16;
        let max_x = chunks[0].x + chunks[0].width.saturating_sub(2);
        f.set_cursor(x.min(max_x), chunks[0].y + 1);
    }
}

fn render_status_bar(f: &mut Frame, state: &AppState, area: Rect) {
    let left = if let Some(kind) = state.pending {
        Span::styled(
            format!("⏳ {}...", kind.label()),
            Style::default().fg(Color::Yellow),
        )
    } else if let Some(notice) = &state.notice {
        Span::styled(notice.clone(), Style::default().fg(Color::Green))
    } else {
        Span::styled(
            help_text(state.tab),
            Style::default().fg(Color::Gray),
        )
    };

    let right = state
        .last_refresh
        .map(|t| format!("刷新于 {}", t.format("%H:%M:%S")))
        .unwrap_or_default();

    let chunks = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Min(0), Constraint::Length(20)])
        .split(area);
    f.render_widget(Paragraph::new(Line::from(left)), chunks[0]);
    f.render_widget(
        Paragraph::new(right)
            .alignment(Alignment::Right)
            .style(Style::default().fg(Color::Cyan)),
        chunks[1],
    );
}

fn help_text(tab: Tab) -> &'static str {
    match tab {
        Tab::Log => "Tab/←→: 切换 | ↑↓/jk: 移动 | r: 刷新 | q: 退出",
        Tab::Status => "Space: 选择 | a: 暂存所选 | A: 暂存全部 | r: 刷新 | q: 退出",
        Tab::Commit => "输入标题和正文后按 Ctrl+S 提交",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::git::{LogRecord, StatusRecord};
    use crate::infrastructure::error::GitError;
    use crate::tui::async_manager::OperationKind;
    use ratatui::{backend::TestBackend, Terminal};

    fn draw(state: &AppState) -> String {
        let mut terminal = Terminal::new(TestBackend::new(100, 20)).unwrap();
        terminal.draw(|f| render(f, state)).unwrap();
        terminal
            .backend()
            .buffer()
            .content
            .iter()
            .map(|cell| cell.symbol())
            .collect()
    }

    #[test]
    fn test_render_log_rows() {
        let mut state = AppState::new("demo");
        state.log = Some(vec![
            LogRecord::from_line("abc123\tJane Doe\t2024-01-01\tFix bug"),
            LogRecord::from_line("def456\tJohn Roe\t2024-01-02\tAdd feature"),
        ]);
        let screen = draw(&state);
        assert!(screen.contains("abc123"));
        assert!(screen.contains("Fix bug"));
        assert!(screen.contains("Add feature"));
        assert!(screen.contains("Log (2)"));
    }

    #[test]
    fn test_render_empty_status_differs_from_error() {
        let mut state = AppState::new("demo");
        state.tab = Tab::Status;
        state.status = Some(Vec::new());
        let empty = draw(&state);
        assert!(empty.contains("Status"));

        state.status = None;
        state.set_error(
            OperationKind::Status,
            &GitError::CommandNotFound {
                program: "git".to_string(),
            },
        );
        let failed = draw(&state);
        assert!(failed.contains("git"));
        assert_ne!(empty, failed);
    }

    #[test]
    fn test_render_status_marks_selected_files() {
        let mut state = AppState::new("demo");
        state.tab = Tab::Status;
        let mut staged = StatusRecord::new(" M a.rs");
        staged.toggle_staged();
        state.status = Some(vec![staged, StatusRecord::new("?? b.rs")]);
        let screen = draw(&state);
        assert!(screen.contains("[x]  M a.rs"));
        assert!(screen.contains("[ ] ?? b.rs"));
    }

    #[test]
    fn test_render_commit_form() {
        let mut state = AppState::new("demo");
        state.tab = Tab::Commit;
        state.commit_title = "My title".to_string();
        state.commit_message = "Body text".to_string();
        let screen = draw(&state);
        assert!(screen.contains("My title"));
        assert!(screen.contains("Body text"));
        assert!(screen.contains("Ctrl+S"));
    }
}
