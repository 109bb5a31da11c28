use crate::api::{CardifyApi, CardifyPaths};
use crate::config::CardifyConfig;
use crate::error::{CardifyError, Result};
use crate::model::Scope;
use crate::store::fs::FileStore;
use directories::{BaseDirs, ProjectDirs};
use std::ffi::OsString;
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

/// Overrides the platform data directory used for the global store.
pub const GLOBAL_DATA_ENV: &str = "CARDIFY_GLOBAL_DATA";

const STORE_DIR: &str = ".cardify";

pub struct CardifyContext {
    pub api: CardifyApi<FileStore>,
    pub scope: Scope,
    pub config: CardifyConfig,
}

/// Find the project root by walking up from cwd looking for a directory
/// that has both .git and .cardify. A directory with .git but no .cardify
/// doesn't stop the search, so nested repos share their parent's store.
/// Returns None if nothing matches before reaching home or root.
pub fn find_project_root(cwd: &Path) -> Option<PathBuf> {
    let home_dir = BaseDirs::new().map(|bd| bd.home_dir().to_path_buf());
    let mut current = cwd.to_path_buf();

    loop {
        if current.join(".git").exists() && current.join(STORE_DIR).exists() {
            return Some(current);
        }

        if home_dir.as_ref() == Some(&current) {
            return None;
        }

        match current.parent() {
            Some(parent) if parent != current => current = parent.to_path_buf(),
            _ => return None,
        }
    }
}

/// The global store directory: the override when set and non-empty,
/// otherwise the platform data dir.
pub fn global_data_dir(env_override: Option<OsString>) -> Result<PathBuf> {
    if let Some(dir) = env_override.filter(|d| !d.is_empty()) {
        return Ok(PathBuf::from(dir));
    }
    ProjectDirs::from("com", "cardify", "cardify")
        .map(|dirs| dirs.data_dir().to_path_buf())
        .ok_or_else(|| CardifyError::Store("Could not determine a data directory".to_string()))
}

pub fn initialize(cwd: &Path, use_global: bool) -> Result<CardifyContext> {
    let project_dir = find_project_root(cwd)
        .map(|root| root.join(STORE_DIR))
        .unwrap_or_else(|| cwd.join(STORE_DIR));
    let global_dir = global_data_dir(std::env::var_os(GLOBAL_DATA_ENV))?;

    let scope = if use_global {
        Scope::Global
    } else {
        Scope::Project
    };
    debug!(?scope, project = %project_dir.display(), global = %global_dir.display(), "context");

    let config_dir = match scope {
        Scope::Project => &project_dir,
        Scope::Global => &global_dir,
    };
    let config = CardifyConfig::load(config_dir).unwrap_or_else(|e| {
        warn!(error = %e, "ignoring unreadable config");
        CardifyConfig::default()
    });

    let store = FileStore::new(Some(project_dir.clone()), global_dir.clone());
    let paths = CardifyPaths {
        project: Some(project_dir),
        global: global_dir,
    };

    Ok(CardifyContext {
        api: CardifyApi::new(store, paths),
        scope,
        config,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn test_find_project_root_with_git_and_store() {
        let temp = TempDir::new().unwrap();
        let root = temp.path();
        fs::create_dir(root.join(".git")).unwrap();
        fs::create_dir(root.join(".cardify")).unwrap();

        assert_eq!(find_project_root(root), Some(root.to_path_buf()));
    }

    #[test]
    fn test_find_project_root_git_only_continues_up() {
        let temp = TempDir::new().unwrap();
        let parent = temp.path();
        let child = parent.join("child-repo");

        fs::create_dir(&child).unwrap();
        fs::create_dir(parent.join(".git")).unwrap();
        fs::create_dir(parent.join(".cardify")).unwrap();
        fs::create_dir(child.join(".git")).unwrap();

        assert_eq!(find_project_root(&child), Some(parent.to_path_buf()));
    }

    #[test]
    fn test_find_project_root_nested_child_has_store() {
        let temp = TempDir::new().unwrap();
        let parent = temp.path();
        let child = parent.join("child-repo");

        fs::create_dir(&child).unwrap();
        fs::create_dir(parent.join(".git")).unwrap();
        fs::create_dir(parent.join(".cardify")).unwrap();
        fs::create_dir(child.join(".git")).unwrap();
        fs::create_dir(child.join(".cardify")).unwrap();

        assert_eq!(find_project_root(&child), Some(child.clone()));
    }

    #[test]
    fn test_find_project_root_store_without_git() {
        let temp = TempDir::new().unwrap();
        let root = temp.path();
        fs::create_dir(root.join(".cardify")).unwrap();

        assert_eq!(find_project_root(root), None);
    }

    #[test]
    fn test_global_dir_override() {
        let dir = global_data_dir(Some(OsString::from("/tmp/cardify-global"))).unwrap();
        assert_eq!(dir, PathBuf::from("/tmp/cardify-global"));
    }

    #[test]
    fn test_empty_override_is_ignored() {
        let dir = global_data_dir(Some(OsString::new()));
        if let Ok(dir) = dir {
            assert_ne!(dir, PathBuf::new());
        }
    }

    #[test]
    fn test_initialize_falls_back_to_cwd_store() {
        let temp = TempDir::new().unwrap();
        let ctx = initialize(temp.path(), false).unwrap();
        assert_eq!(ctx.scope, Scope::Project);
        assert_eq!(
            ctx.api.paths().project,
            Some(temp.path().join(".cardify"))
        );
    }
}
