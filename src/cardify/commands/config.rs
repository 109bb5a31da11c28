use crate::commands::{CardifyPaths, CmdMessage, CmdResult};
use crate::config::CardifyConfig;
use crate::error::Result;
use crate::model::Scope;

#[derive(Debug, Clone)]
pub enum ConfigAction {
    ShowAll,
    ShowKey(String),
    Set(String, String),
}

pub fn run(paths: &CardifyPaths, scope: Scope, action: ConfigAction) -> Result<CmdResult> {
    let dir = paths.scope_dir(scope)?;
    let mut config = CardifyConfig::load(&dir)?;
    let mut result = CmdResult::default();

    match action {
        ConfigAction::ShowAll => return Ok(result.with_config(config)),
        ConfigAction::ShowKey(key) => match config.get(&key) {
            Some(val) => result.add_message(CmdMessage::info(val)),
            None => result.add_message(CmdMessage::error(format!("Unknown config key: {}", key))),
        },
        ConfigAction::Set(key, value) => {
            if let Err(e) = config.set(&key, &value) {
                result.add_message(CmdMessage::error(e));
                return Ok(result);
            }
            config.save(&dir)?;
            let display_val = config.get(&key).unwrap_or(value);
            result.add_message(CmdMessage::success(format!("{} set to {}", key, display_val)));
            result = result.with_config(config);
        }
    }
    Ok(result)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn paths(temp: &TempDir) -> CardifyPaths {
        CardifyPaths {
            project: Some(temp.path().join("project")),
            global: temp.path().join("global"),
        }
    }

    #[test]
    fn set_persists_per_scope() {
        let temp = TempDir::new().unwrap();
        let paths = paths(&temp);
        run(
            &paths,
            Scope::Global,
            ConfigAction::Set("history-limit".into(), "25".into()),
        )
        .unwrap();

        let global = run(&paths, Scope::Global, ConfigAction::ShowAll).unwrap();
        assert_eq!(global.config.unwrap().history_limit, Some(25));
        let project = run(&paths, Scope::Project, ConfigAction::ShowAll).unwrap();
        assert_eq!(project.config.unwrap().history_limit, None);
    }

    #[test]
    fn bad_value_is_an_error_message() {
        let temp = TempDir::new().unwrap();
        let result = run(
            &paths(&temp),
            Scope::Project,
            ConfigAction::Set("default-width".into(), "wide".into()),
        )
        .unwrap();
        assert!(result.has_errors());
        assert!(!temp.path().join("project").join("config.json").exists());
    }

    #[test]
    fn show_key() {
        let temp = TempDir::new().unwrap();
        let result = run(
            &paths(&temp),
            Scope::Project,
            ConfigAction::ShowKey("default-height".into()),
        )
        .unwrap();
        assert_eq!(result.messages[0].content, "600");
    }
}
