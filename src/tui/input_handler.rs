use crossterm::event::{KeyCode, KeyEvent, KeyEventKind, KeyModifiers};

use super::app::{AppState, CommitField, Tab};
use super::async_manager::{GitCommand, OperationKind};
use crate::infrastructure::error::GitError;

const PAGE_SIZE: usize = 10;

/// 按键 -> 状态变更，需要执行 git 时返回对应命令
pub fn handle_key(state: &mut AppState, key: KeyEvent) -> Option<GitCommand> {
    if key.kind != KeyEventKind::Press {
        return None;
    }

    let ctrl = key.modifiers.contains(KeyModifiers::CONTROL);
    if ctrl {
        return handle_ctrl(state, key.code);
    }

    match key.code {
        KeyCode::BackTab => return state.select_tab(state.tab.previous()),
        KeyCode::F(5) => return Some(state.refresh_command()),
        _ => {}
    }

    if state.tab == Tab::Commit {
        return handle_commit_form(state, key.code);
    }

    match key.code {
        KeyCode::Char('q') | KeyCode::Esc => {
            state.should_quit = true;
            None
        }
        KeyCode::Tab | KeyCode::Right => state.select_tab(state.tab.next()),
        KeyCode::Left => state.select_tab(state.tab.previous()),
        KeyCode::Char('1') => state.select_tab(Tab::Log),
        KeyCode::Char('2') => state.select_tab(Tab::Status),
        KeyCode::Char('3') => state.select_tab(Tab::Commit),
        KeyCode::Char('r') => Some(state.refresh_command()),
        KeyCode::Down | KeyCode::Char('j') => {
            move_selection(state, |i, len| (i + 1).min(len - 1));
            None
        }
        KeyCode::Up | KeyCode::Char('k') => {
            move_selection(state, |i, _| i.saturating_sub(1));
            None
        }
        KeyCode::PageDown => {
            move_selection(state, |i, len| (i + PAGE_SIZE).min(len - 1));
            None
        }
        KeyCode::PageUp => {
            move_selection(state, |i, _| i.saturating_sub(PAGE_SIZE));
            None
        }
        KeyCode::Home | KeyCode::Char('g') => {
            move_selection(state, |_, _| 0);
            None
        }
        KeyCode::End | KeyCode::Char('G') => {
            move_selection(state, |_, len| len - 1);
            None
        }
        KeyCode::Char(' ') if state.tab == Tab::Status => {
            state.toggle_selected_status();
            None
        }
        KeyCode::Char('a') if state.tab == Tab::Status => add_selected(state),
        KeyCode::Char('A') => Some(GitCommand::AddAll),
        _ => None,
    }
}

fn handle_ctrl(state: &mut AppState, code: KeyCode) -> Option<GitCommand> {
    match code {
        KeyCode::Char('c') => {
            state.should_quit = true;
            None
        }
        KeyCode::Char('a') => Some(GitCommand::AddAll),
        KeyCode::Char('p') => Some(GitCommand::Push),
        KeyCode::Char('s') => submit_commit(state),
        _ => None,
    }
}

fn handle_commit_form(state: &mut AppState, code: KeyCode) -> Option<GitCommand> {
    match code {
        KeyCode::Esc => state.select_tab(Tab::Status),
        KeyCode::Tab => {
            state.commit_field = match state.commit_field {
                CommitField::Title => CommitField::Message,
                CommitField::Message => CommitField::Title,
            };
            None
        }
        KeyCode::Enter => {
            match state.commit_field {
                CommitField::Title => state.commit_field = CommitField::Message,
                CommitField::Message => state.commit_message.push('\n'),
            }
            None
        }
        KeyCode::Backspace => {
            active_field(state).pop();
            None
        }
        KeyCode::Char(c) => {
            active_field(state).push(c);
            None
        }
        _ => None,
    }
}

fn active_field(state: &mut AppState) -> &mut String {
    match state.commit_field {
        CommitField::Title => &mut state.commit_title,
        CommitField::Message => &mut state.commit_message,
    }
}

fn submit_commit(state: &mut AppState) -> Option<GitCommand> {
    if state.commit_title.trim().is_empty() {
        state.set_error(
            OperationKind::Commit,
            &GitError::invalid_input("提交标题不能为空", Some("title")),
        );
        state.tab = Tab::Commit;
        state.commit_field = CommitField::Title;
        return None;
    }
    Some(GitCommand::Commit {
        title: state.commit_title.clone(),
        message: state.commit_message.clone(),
    })
}

fn add_selected(state: &mut AppState) -> Option<GitCommand> {
    let paths = state.staged_paths();
    if paths.is_empty() {
        state.notice = Some("用空格选择文件，或按 A 暂存全部".to_string());
        return None;
    }
    Some(GitCommand::AddPaths(paths))
}

fn move_selection(state: &mut AppState, step: impl Fn(usize, usize) -> usize) {
    let (len, selected) = match state.tab {
        Tab::Log => (
            state.log.as_ref().map_or(0, Vec::len),
            &mut state.log_selected,
        ),
        Tab::Status => (
            state.status.as_ref().map_or(0, Vec::len),
            &mut state.status_selected,
        ),
        Tab::Commit => return,
    };
    if len > 0 {
        *selected = step(*selected, len);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::git::{LogRecord, StatusRecord};

    fn press(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    fn ctrl(c: char) -> KeyEvent {
        KeyEvent::new(KeyCode::Char(c), KeyModifiers::CONTROL)
    }

    fn type_text(state: &mut AppState, text: &str) {
        for c in text.chars() {
            handle_key(state, press(KeyCode::Char(c)));
        }
    }

    #[test]
    fn test_quit_keys() {
        let mut state = AppState::new("repo");
        handle_key(&mut state, press(KeyCode::Char('q')));
        assert!(state.should_quit);

        let mut state = AppState::new("repo");
        handle_key(&mut state, ctrl('c'));
        assert!(state.should_quit);
    }

    #[test]
    fn test_tab_navigation_requests_missing_data() {
        let mut state = AppState::new("repo");
        state.log = Some(Vec::new());

        assert_eq!(
            handle_key(&mut state, press(KeyCode::Tab)),
            Some(GitCommand::RefreshStatus)
        );
        assert_eq!(state.tab, Tab::Status);

        assert_eq!(handle_key(&mut state, press(KeyCode::Char('3'))), None);
        assert_eq!(state.tab, Tab::Commit);

        handle_key(&mut state, press(KeyCode::BackTab));
        assert_eq!(state.tab, Tab::Status);
    }

    #[test]
    fn test_commit_form_typing_and_submit() {
        let mut state = AppState::new("repo");
        state.tab = Tab::Commit;

        type_text(&mut state, "Fix \"quoted\" bug");
        handle_key(&mut state, press(KeyCode::Enter));
        assert_eq!(state.commit_field, CommitField::Message);
        type_text(&mut state, "qa");
        handle_key(&mut state, press(KeyCode::Backspace));

        assert!(!state.should_quit);
        assert_eq!(
            handle_key(&mut state, ctrl('s')),
            Some(GitCommand::Commit {
                title: "Fix \"quoted\" bug".to_string(),
                message: "q".to_string(),
            })
        );
    }

    #[test]
    fn test_commit_without_title_shows_error() {
        let mut state = AppState::new("repo");
        state.tab = Tab::Log;
        assert_eq!(handle_key(&mut state, ctrl('s')), None);
        assert_eq!(state.tab, Tab::Commit);
        assert!(state.error.is_some());
    }

    #[test]
    fn test_status_toggle_and_add_selected() {
        let mut state = AppState::new("repo");
        state.tab = Tab::Status;
        state.status = Some(vec![
            StatusRecord::new(" M a.rs"),
            StatusRecord::new("?? b.rs"),
        ]);

        assert_eq!(handle_key(&mut state, press(KeyCode::Char('a'))), None);
        assert!(state.notice.is_some());

        handle_key(&mut state, press(KeyCode::Down));
        handle_key(&mut state, press(KeyCode::Char(' ')));
        assert_eq!(
            handle_key(&mut state, press(KeyCode::Char('a'))),
            Some(GitCommand::AddPaths(vec!["b.rs".to_string()]))
        );
    }

    #[test]
    fn test_selection_stays_in_bounds() {
        let mut state = AppState::new("repo");
        state.log = Some(vec![
            LogRecord::from_line("a\tA\t2024-01-01\tone"),
            LogRecord::from_line("b\tB\t2024-01-02\ttwo"),
        ]);

        handle_key(&mut state, press(KeyCode::PageDown));
        assert_eq!(state.log_selected, 1);
        handle_key(&mut state, press(KeyCode::Down));
        assert_eq!(state.log_selected, 1);
        handle_key(&mut state, press(KeyCode::Char('g')));
        assert_eq!(state.log_selected, 0);
        handle_key(&mut state, press(KeyCode::Up));
        assert_eq!(state.log_selected, 0);
    }

    #[test]
    fn test_global_mutations() {
        let mut state = AppState::new("repo");
        assert_eq!(handle_key(&mut state, ctrl('a')), Some(GitCommand::AddAll));
        assert_eq!(handle_key(&mut state, ctrl('p')), Some(GitCommand::Push));
        assert_eq!(
            handle_key(&mut state, press(KeyCode::F(5))),
            Some(GitCommand::RefreshLog)
        );
    }
}
