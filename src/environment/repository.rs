use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::{from_slice, to_string_pretty};
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

use super::types::StoredUser;

const SESSION_PATH: &str = "session.json";

/// Local persistence for the signed-in session.
#[derive(Clone)]
pub struct Repository {
    session: Arc<Mutex<Option<StoredUser>>>,
    directory: PathBuf,
}

impl Repository {
    pub fn new() -> Self {
        Self::with_directory(data_directory())
    }

    pub fn with_directory(directory: PathBuf) -> Self {
        let session = read(&directory, SESSION_PATH).ok().flatten();
        Self {
            session: Arc::new(Mutex::new(session)),
            directory,
        }
    }

    pub fn current_user(&self) -> Option<StoredUser> {
        self.session.lock().ok()?.clone()
    }

    pub fn store_user(&self, user: StoredUser) -> Result<(), String> {
        let mut session = self
            .session
            .lock()
            .map_err(|e| format!("Session Data Error: {e:?}"))?;
        *session = Some(user);
        write(&self.directory, SESSION_PATH, &*session)
    }

    pub fn clear(&self) -> Result<(), String> {
        let mut session = self
            .session
            .lock()
            .map_err(|e| format!("Session Data Error: {e:?}"))?;
        *session = None;
        write(&self.directory, SESSION_PATH, &*session)
    }
}

impl Default for Repository {
    fn default() -> Self {
        Self::new()
    }
}

fn read<T: DeserializeOwned>(directory: &Path, name: &str) -> Result<Option<T>, String> {
    let data_path = directory.join(name);
    if !data_path.exists() {
        return Ok(None);
    };
    let data = std::fs::read(&data_path)
        .map_err(|e| format!("Could not read {}: {e:?}", data_path.display()))?;
    let obj: T =
        from_slice(&data).map_err(|e| format!("Could not parse {}: {e:?}", data_path.display()))?;
    Ok(Some(obj))
}

fn write<T: Serialize>(directory: &Path, name: &str, value: &T) -> Result<(), String> {
    let data_path = directory.join(name);
    let data = to_string_pretty(&value).map_err(|e| format!("Could not serialize value: {e:?}"))?;
    std::fs::write(&data_path, data)
        .map_err(|e| format!("Could not write to {}: {e:?}", data_path.display()))?;
    Ok(())
}

fn data_directory() -> PathBuf {
    use directories_next::ProjectDirs;
    if let Some(proj_dirs) = ProjectDirs::from("com", "showtell", "showtell") {
        let dirs = proj_dirs.config_dir().to_path_buf();
        if !dirs.exists() {
            if let Err(e) = std::fs::create_dir_all(&dirs) {
                log::error!("Could not create directory {}: {e:?}", dirs.display());
                panic!("Couldn't find a folder to save data")
            }
        }
        dirs
    } else {
        panic!("Couldn't find a folder to save data")
    }
}
