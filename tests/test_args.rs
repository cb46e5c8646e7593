use clap::Parser;
use git_panel::cli::args::{Args, OutputFormat};
use std::path::PathBuf;

#[test]
fn test_args_default() {
    let args = Args::parse_from(["git-panel"]);
    assert!(!args.log);
    assert!(!args.status);
    assert!(!args.add_all);
    assert!(args.title.is_none());
    assert_eq!(args.message, "");
    assert!(!args.push);
    assert_eq!(args.format, OutputFormat::Text);
    assert!(!args.has_action());
}

#[test]
fn test_args_with_values() {
    let args = Args::parse_from([
        "git-panel",
        "--add-all",
        "--title",
        "Fix \"quoted\" bug",
        "--message",
        "Body",
        "--push",
        "--log",
        "-n",
        "5",
        "--format",
        "json",
        "-C",
        "/tmp/repo",
        "--git",
        "/usr/bin/git",
        "--encoding",
        "gbk",
        "--timeout",
        "15",
        "--debug",
    ]);
    assert!(args.add_all);
    assert_eq!(args.title.as_deref(), Some("Fix \"quoted\" bug"));
    assert_eq!(args.message, "Body");
    assert!(args.push);
    assert!(args.log);
    assert_eq!(args.limit, Some(5));
    assert_eq!(args.format, OutputFormat::Json);
    assert_eq!(args.repo, Some(PathBuf::from("/tmp/repo")));
    assert_eq!(args.git.as_deref(), Some("/usr/bin/git"));
    assert_eq!(args.encoding.as_deref(), Some("gbk"));
    assert_eq!(args.timeout, Some(15));
    assert!(args.debug);
    assert!(args.has_action());
}

#[test]
fn test_each_action_flag_leaves_tui_mode() {
    for flag in ["--log", "--status", "-a", "-p"] {
        let args = Args::parse_from(["git-panel", flag]);
        assert!(args.has_action(), "{} should be a CLI action", flag);
    }
    let args = Args::parse_from(["git-panel", "-t", "title"]);
    assert!(args.has_action());
}

#[test]
fn test_invalid_format_is_rejected() {
    assert!(Args::try_parse_from(["git-panel", "--format", "xml"]).is_err());
}
