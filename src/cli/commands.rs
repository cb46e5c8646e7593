use super::args::{Args, OutputFormat};
use crate::git::{CommandExecutor, GitClient, LogRecord, StatusRecord};

/// 命令行模式：依次执行 add、commit、push，再输出日志 / 状态
///
/// 任一步失败即停止，后续步骤不会执行。
pub async fn handle_cli<E: CommandExecutor>(args: &Args, client: &GitClient<E>) -> anyhow::Result<()> {
    if args.add_all {
        client.add_all().await?;
        println!("✓ git add -A");
    }

    if let Some(title) = &args.title {
        client.commit(title, &args.message).await?;
        println!("✓ 已提交: {}", title);
    }

    if args.push {
        client.push().await?;
        println!("✓ 已推送");
    }

    if args.log {
        let records = client.log().await?;
        print!("{}", render_log(&records, args.format)?);
    }

    if args.status {
        let records = client.status().await?;
        print!("{}", render_status(&records, args.format)?);
    }

    Ok(())
}

pub fn render_log(records: &[LogRecord], format: OutputFormat) -> anyhow::Result<String> {
    match format {
        OutputFormat::Json => Ok(format!("{}\n", serde_json::to_string_pretty(records)?)),
        OutputFormat::Text => Ok(format_log_text(records)),
    }
}

pub fn render_status(records: &[StatusRecord], format: OutputFormat) -> anyhow::Result<String> {
    match format {
        OutputFormat::Json => Ok(format!("{}\n", serde_json::to_string_pretty(records)?)),
        OutputFormat::Text => Ok(format_status_text(records)),
    }
}

pub fn format_log_text(records: &[LogRecord]) -> String {
    if records.is_empty() {
        return "没有提交记录\n".to_string();
    }
    let mut output = String::new();
    for record in records {
        output.push_str(&format!(
            "{:<9} {:<10} {:<16} {}\n",
            record.hash().unwrap_or(""),
            record.date().unwrap_or(""),
            record.author().unwrap_or(""),
            record.fields.get(3..).map(|f| f.join(" ")).unwrap_or_default(),
        ));
    }
    output
}

pub fn format_status_text(records: &[StatusRecord]) -> String {
    if records.is_empty() {
        return "没有修改的文件\n".to_string();
    }
    let mut output = String::new();
    for record in records {
        output.push_str(&record.line);
        output.push('\n');
    }
    output
}
