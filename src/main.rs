use clap::Parser;
use git_panel::cli::args::Args;
use git_panel::cli::commands::handle_cli;
use git_panel::config::Config;
use git_panel::git::GitClient;
use git_panel::infrastructure::logging::{setup_logging, LoggingConfig};
use git_panel::tui;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    let mut config = Config::load(args.config.as_deref())?;
    config.update_from_args(&args);
    config.validate()?;

    let tui_mode = !args.has_action();
    let logging = if tui_mode {
        LoggingConfig::for_tui(config.debug, config.log_file.clone())
    } else {
        LoggingConfig::for_cli(config.debug)
    };
    setup_logging(logging)?;

    tracing::debug!(?config, tui_mode, "配置加载完成");

    let client = GitClient::from_config(&config)?;

    if tui_mode {
        tui::run_tui(client, repo_label(&config)).await
    } else {
        handle_cli(&args, &client).await
    }
}

fn repo_label(config: &Config) -> String {
    let path = match &config.repo_path {
        Some(path) => path.clone(),
        None => std::env::current_dir().unwrap_or_default(),
    };
    path.file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string())
}
