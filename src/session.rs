use std::{
    fs,
    path::{Path, PathBuf},
    sync::{Arc, RwLock},
};

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize, de::DeserializeOwned};
use thiserror::Error;
use tracing::{debug, info};

use crate::domain::TeamItem;

const ACCOUNT_FILE: &str = "account.json";
const TEAM_FILE: &str = "team.json";

/// How long a remembered account stays valid.
pub const REMEMBER_DAYS: i64 = 7;

#[derive(Debug, Error)]
pub enum SessionError {
    #[error("failed to access {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("malformed session file {path}: {source}")]
    Json {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RememberedAccount {
    pub username: String,
    pub password: String,
    pub expires_at: DateTime<Utc>,
}

/// Small JSON files kept under the state directory.
#[derive(Debug, Clone)]
pub struct SessionStore {
    dir: PathBuf,
}

impl SessionStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    pub fn remember(
        &self,
        username: &str,
        password: &str,
        now: DateTime<Utc>,
    ) -> Result<RememberedAccount, SessionError> {
        let account = RememberedAccount {
            username: username.to_string(),
            password: password.to_string(),
            expires_at: now + Duration::days(REMEMBER_DAYS),
        };
        self.write(ACCOUNT_FILE, &account)?;
        Ok(account)
    }

    /// Remembered account, unless it has expired. Expired files are removed.
    pub fn account(&self, now: DateTime<Utc>) -> Result<Option<RememberedAccount>, SessionError> {
        let Some(account) = self.read::<RememberedAccount>(ACCOUNT_FILE)? else {
            return Ok(None);
        };
        if account.expires_at <= now {
            debug!(username = %account.username, "remembered account expired");
            self.forget()?;
            return Ok(None);
        }
        Ok(Some(account))
    }

    pub fn forget(&self) -> Result<(), SessionError> {
        self.remove(ACCOUNT_FILE)
    }

    pub fn team(&self) -> Result<Option<TeamItem>, SessionError> {
        self.read(TEAM_FILE)
    }

    pub fn save_team(&self, team: &TeamItem) -> Result<(), SessionError> {
        self.write(TEAM_FILE, team)
    }

    fn path(&self, name: &str) -> PathBuf {
        self.dir.join(name)
    }

    fn read<T: DeserializeOwned>(&self, name: &str) -> Result<Option<T>, SessionError> {
        let path = self.path(name);
        let raw = match fs::read_to_string(&path) {
            Ok(raw) => raw,
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => return Ok(None),
            Err(source) => return Err(SessionError::Io { path, source }),
        };
        serde_json::from_str(&raw)
            .map(Some)
            .map_err(|source| SessionError::Json { path, source })
    }

    fn write<T: Serialize>(&self, name: &str, value: &T) -> Result<(), SessionError> {
        fs::create_dir_all(&self.dir).map_err(|source| SessionError::Io {
            path: self.dir.clone(),
            source,
        })?;
        let path = self.path(name);
        let raw = serde_json::to_string_pretty(value).map_err(|source| SessionError::Json {
            path: path.clone(),
            source,
        })?;
        fs::write(&path, raw).map_err(|source| SessionError::Io { path, source })
    }

    fn remove(&self, name: &str) -> Result<(), SessionError> {
        let path = self.path(name);
        match fs::remove_file(&path) {
            Ok(()) => Ok(()),
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(source) => Err(SessionError::Io { path, source }),
        }
    }
}

#[derive(Debug, Default)]
struct SessionState {
    token: Option<String>,
    team: Option<TeamItem>,
}

/// Bearer token and current team. Shared by the UI loop and the HTTP client;
/// written only on login, logout and team switch. The token never touches
/// disk.
#[derive(Debug, Clone)]
pub struct Session {
    state: Arc<RwLock<SessionState>>,
    store: SessionStore,
}

impl Session {
    pub fn new(store: SessionStore) -> Self {
        Self {
            state: Arc::new(RwLock::new(SessionState::default())),
            store,
        }
    }

    /// Restores the persisted team, if any.
    pub fn restore(store: SessionStore) -> Result<Self, SessionError> {
        let team = store.team()?;
        let session = Self::new(store);
        session.write_state(|state| state.team = team);
        Ok(session)
    }

    pub fn store(&self) -> &SessionStore {
        &self.store
    }

    pub fn token(&self) -> Option<String> {
        self.read_state(|state| state.token.clone())
    }

    pub fn is_logged_in(&self) -> bool {
        self.read_state(|state| state.token.as_deref().is_some_and(|token| !token.is_empty()))
    }

    pub fn sign_in(&self, token: impl Into<String>) {
        let token = token.into();
        self.write_state(|state| state.token = Some(token));
        info!("signed in");
    }

    pub fn sign_out(&self) {
        self.write_state(|state| state.token = None);
        info!("signed out");
    }

    pub fn team(&self) -> Option<TeamItem> {
        self.read_state(|state| state.team.clone())
    }

    pub fn switch_team(&self, team: TeamItem) -> Result<(), SessionError> {
        self.store.save_team(&team)?;
        info!(team = %team.name, "switched team");
        self.write_state(|state| state.team = Some(team));
        Ok(())
    }

    fn read_state<T>(&self, read: impl FnOnce(&SessionState) -> T) -> T {
        let guard = self.state.read().unwrap_or_else(|poisoned| poisoned.into_inner());
        read(&guard)
    }

    fn write_state(&self, write: impl FnOnce(&mut SessionState)) {
        let mut guard = self
            .state
            .write()
            .unwrap_or_else(|poisoned| poisoned.into_inner());
        write(&mut guard);
    }
}
