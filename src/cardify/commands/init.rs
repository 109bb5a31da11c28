use crate::commands::{CardifyPaths, CmdMessage, CmdResult};
use crate::config::CardifyConfig;
use crate::error::Result;
use crate::model::Scope;
use std::fs;

pub fn run(paths: &CardifyPaths, scope: Scope) -> Result<CmdResult> {
    let dir = paths.scope_dir(scope)?;
    fs::create_dir_all(&dir)?;
    if !dir.join("config.json").exists() {
        CardifyConfig::default().save(&dir)?;
    }
    let mut result = CmdResult::default();
    result.add_message(CmdMessage::success(format!(
        "Initialized cardify store at {}",
        dir.display()
    )));
    Ok(result)
}
