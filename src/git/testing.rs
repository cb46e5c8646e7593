use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Mutex;

use super::core::CommandExecutor;
use crate::infrastructure::error::{GitError, GitResult};

/// 按子命令返回预设输出，并记录每次调用的参数
#[derive(Default)]
pub struct ScriptedExecutor {
    responses: Mutex<HashMap<String, GitResult<String>>>,
    calls: Mutex<Vec<Vec<String>>>,
}

impl ScriptedExecutor {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn respond(self, subcommand: &str, output: &str) -> Self {
        self.set(subcommand, Ok(output.to_string()));
        self
    }

    pub fn fail(self, subcommand: &str, error: GitError) -> Self {
        self.set(subcommand, Err(error));
        self
    }

    pub fn set(&self, subcommand: &str, result: GitResult<String>) {
        self.responses
            .lock()
            .unwrap()
            .insert(subcommand.to_string(), result);
    }

    pub fn calls(&self) -> Vec<Vec<String>> {
        self.calls.lock().unwrap().clone()
    }

    pub fn subcommands(&self) -> Vec<String> {
        self.calls().iter().map(|args| subcommand_of(args)).collect()
    }
}

/// 跳过 `-c key=value` 之类的全局参数
fn subcommand_of(args: &[String]) -> String {
    let mut iter = args.iter();
    while let Some(arg) = iter.next() {
        if arg == "-c" {
            iter.next();
            continue;
        }
        return arg.clone();
    }
    String::new()
}

#[async_trait]
impl CommandExecutor for ScriptedExecutor {
    async fn execute(&self, args: &[String]) -> GitResult<String> {
        self.calls.lock().unwrap().push(args.to_vec());
        let subcommand = subcommand_of(args);
        self.responses
            .lock()
            .unwrap()
            .get(&subcommand)
            .cloned()
            .unwrap_or_else(|| Ok(String::new()))
    }
}
