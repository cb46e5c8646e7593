use std::io;
use std::path::PathBuf;
use std::sync::Arc;
use tracing::Level;
use tracing_subscriber::{
    fmt::{self, format::FmtSpan},
    layer::SubscriberExt,
    util::SubscriberInitExt,
    EnvFilter, Layer,
};

/// 日志配置
#[derive(Debug, Clone)]
pub struct LoggingConfig {
    pub level: Level,
    pub format: LogFormat,
    pub output: LogOutput,
    pub include_file_location: bool,
    pub include_span_events: bool,
    pub filter: Option<String>,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: Level::WARN,
            format: LogFormat::Compact,
            output: LogOutput::Stderr,
            include_file_location: false,
            include_span_events: false,
            filter: None,
        }
    }
}

impl LoggingConfig {
    /// 命令行模式：日志写到 stderr，避免混入 --log/--status 的输出
    pub fn for_cli(debug: bool) -> Self {
        Self {
            level: if debug { Level::DEBUG } else { Level::WARN },
            include_file_location: debug,
            ..Self::default()
        }
    }

    /// TUI 模式：终端被备用屏幕占用，日志只能写文件，没有文件就不输出
    pub fn for_tui(debug: bool, log_file: Option<PathBuf>) -> Self {
        Self {
            level: if debug { Level::DEBUG } else { Level::INFO },
            output: match log_file {
                Some(path) => LogOutput::File(path),
                None => LogOutput::Disabled,
            },
            ..Self::default()
        }
    }
}

/// 日志格式
#[derive(Debug, Clone)]
pub enum LogFormat {
    /// 人类可读的格式
    Pretty,
    /// 紧凑格式
    Compact,
    /// JSON 格式
    Json,
}

/// 日志输出目标
#[derive(Debug, Clone, PartialEq)]
pub enum LogOutput {
    /// 标准错误
    Stderr,
    /// 文件
    File(PathBuf),
    /// 不输出
    Disabled,
}

/// 设置日志系统
pub fn setup_logging(config: LoggingConfig) -> anyhow::Result<()> {
    let env_filter = build_env_filter(&config)?;

    match config.output.clone() {
        LogOutput::Stderr => {
            let fmt_layer = create_fmt_layer(&config, io::stderr).with_filter(env_filter);
            tracing_subscriber::registry().with(fmt_layer).try_init()?;
        }
        LogOutput::File(path) => {
            let file = std::fs::OpenOptions::new()
                .create(true)
                .append(true)
                .open(&path)?;
            let fmt_layer = create_fmt_layer(&config, Arc::new(file)).with_filter(env_filter);
            tracing_subscriber::registry().with(fmt_layer).try_init()?;
        }
        LogOutput::Disabled => {}
    }

    Ok(())
}

fn build_env_filter(config: &LoggingConfig) -> anyhow::Result<EnvFilter> {
    let filter = if let Some(filter) = &config.filter {
        EnvFilter::try_new(filter)?
    } else {
        EnvFilter::from_default_env().add_directive(format!("git_panel={}", config.level).parse()?)
    };
    Ok(filter)
}

fn create_fmt_layer<W>(
    config: &LoggingConfig,
    make_writer: W,
) -> Box<dyn Layer<tracing_subscriber::Registry> + Send + Sync>
where
    W: for<'writer> fmt::MakeWriter<'writer> + Send + Sync + 'static,
{
    let mut layer = fmt::layer()
        .with_writer(make_writer)
        .with_target(true)
        .with_level(true)
        .with_ansi(matches!(config.output, LogOutput::Stderr));

    if config.include_file_location {
        layer = layer.with_file(true).with_line_number(true);
    }

    if config.include_span_events {
        layer = layer.with_span_events(FmtSpan::CLOSE);
    }

    match config.format {
        LogFormat::Pretty => layer.pretty().boxed(),
        LogFormat::Compact => layer.compact().boxed(),
        LogFormat::Json => layer.json().boxed(),
    }
}
