use serde::Serialize;

/// `git log` 的一行，按制表符切分后的字段
///
/// 约定顺序为 短哈希、作者、日期、标题，但解析时不校验字段数量。
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LogRecord {
    pub fields: Vec<String>,
}

impl LogRecord {
    pub fn from_line(line: &str) -> Self {
        Self {
            fields: line.split('\t').map(str::to_string).collect(),
        }
    }

    pub fn field(&self, index: usize) -> Option<&str> {
        self.fields.get(index).map(String::as_str)
    }

    pub fn hash(&self) -> Option<&str> {
        self.field(0)
    }

    pub fn author(&self) -> Option<&str> {
        self.field(1)
    }

    pub fn date(&self) -> Option<&str> {
        self.field(2)
    }

    pub fn subject(&self) -> Option<&str> {
        self.field(3)
    }
}

/// `git status --short` 的一行
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StatusRecord {
    pub line: String,
    /// 是否选中用于 "暂存所选"
    pub staged: bool,
}

impl StatusRecord {
    pub fn new(line: impl Into<String>) -> Self {
        Self {
            line: line.into(),
            staged: false,
        }
    }

    /// 两个字符的状态码（XY），如 " M"、"??"、"R "
    pub fn code(&self) -> &str {
        self.line.get(..2).unwrap_or(&self.line)
    }

    /// 文件路径；重命名或复制（R / C）时返回新路径，带引号的路径会被还原
    pub fn path(&self) -> String {
        let rest = self.line.get(3..).unwrap_or("");
        let target = match rest.rsplit_once(" -> ") {
            Some((_, to)) if self.is_rename_or_copy() => to,
            _ => rest,
        };
        unquote_path(target)
    }

    fn is_rename_or_copy(&self) -> bool {
        self.code().contains(|c| c == 'R' || c == 'C')
    }

    pub fn toggle_staged(&mut self) {
        self.staged = !self.staged;
    }
}

/// git 对含空格、引号或控制字符的路径加双引号并转义
fn unquote_path(path: &str) -> String {
    let inner = match path
        .strip_prefix('"')
        .and_then(|p| p.strip_suffix('"'))
    {
        Some(inner) => inner,
        None => return path.to_string(),
    };

    let mut out = String::with_capacity(inner.len());
    let mut chars = inner.chars();
    while let Some(c) = chars.next() {
        if c != '\\' {
            out.push(c);
            continue;
        }
        match chars.next() {
            Some('n') => out.push('\n'),
            Some('t') => out.push('\t'),
            Some(other) => out.push(other),
            None => out.push('\\'),
        }
    }
    out
}
