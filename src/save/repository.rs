use std::fs;
use std::path::{Path, PathBuf};

use crate::game::{Game, GameLog, Step, StepResult};

use super::{SaveError, SaveGame};

pub trait Repository {
    fn load_game(&self, name: &str) -> Result<SaveGame, SaveError>;
    fn save_game(&self, name: &str, save: &SaveGame) -> Result<(), SaveError>;
}

/// Stores each game as `<root>/<name>.json`.
pub struct JsonFileRepository {
    root: PathBuf,
}

impl JsonFileRepository {
    pub fn new(root: impl AsRef<Path>) -> Result<Self, SaveError> {
        let root = root.as_ref().to_path_buf();
        fs::create_dir_all(&root)?;
        Ok(Self { root })
    }

    pub fn path_for(&self, name: &str) -> Result<PathBuf, SaveError> {
        if name.is_empty() || name.contains(['/', '\\']) || name.starts_with('.') {
            return Err(SaveError::Invalid(format!("unusable save name {name:?}")));
        }
        Ok(self.root.join(format!("{name}.json")))
    }
}

impl Repository for JsonFileRepository {
    fn load_game(&self, name: &str) -> Result<SaveGame, SaveError> {
        let path = self.path_for(name)?;
        if !path.exists() {
            return Err(SaveError::NotFound(name.to_string()));
        }
        let json = fs::read_to_string(&path)?;
        let save = serde_json::from_str(&json)?;
        log::debug!("loaded {}", path.display());
        Ok(save)
    }

    fn save_game(&self, name: &str, save: &SaveGame) -> Result<(), SaveError> {
        let path = self.path_for(name)?;
        let temp_path = path.with_extension("json.tmp");
        fs::write(&temp_path, serde_json::to_string_pretty(save)?)?;
        fs::rename(&temp_path, &path)?;
        log::debug!("saved {}", path.display());
        Ok(())
    }
}

/// Loads `name`, applies one step and writes the game back if it changed.
pub fn apply_saved_step<R: Repository, L: GameLog>(
    repo: &R,
    name: &str,
    step: Step,
    sink: L,
) -> Result<StepResult, SaveError> {
    let state = repo.load_game(name)?.into_state()?;
    let mut game = Game::from_state(state, sink);
    let result = game.take_step(step)?;
    if !result.is_no_effect() {
        repo.save_game(name, &SaveGame::from_state(&game.state))?;
    }
    Ok(result)
}
