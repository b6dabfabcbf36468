use skyhold_core::{CoreError, CoreResult, SessionProvider};
use skyhold_shared::{Role, User};
use std::fs;
use std::io::ErrorKind;
use std::path::PathBuf;
use std::sync::Mutex;
use tracing::{info, warn};
use uuid::Uuid;

use crate::app_config::{AuthConfig, Config, SessionBackendKind};
use crate::StoreResult;

/// Where the signed-in user survives a restart.
pub trait SessionBackend: Send + Sync {
    fn load(&self) -> StoreResult<Option<User>>;
    fn save(&self, user: &User) -> StoreResult<()>;
    fn clear(&self) -> StoreResult<()>;
}

#[derive(Debug, Default)]
pub struct MemorySessionBackend {
    slot: Mutex<Option<User>>,
}

impl SessionBackend for MemorySessionBackend {
    fn load(&self) -> StoreResult<Option<User>> {
        Ok(self.slot.lock().unwrap_or_else(|p| p.into_inner()).clone())
    }

    fn save(&self, user: &User) -> StoreResult<()> {
        *self.slot.lock().unwrap_or_else(|p| p.into_inner()) = Some(user.clone());
        Ok(())
    }

    fn clear(&self) -> StoreResult<()> {
        *self.slot.lock().unwrap_or_else(|p| p.into_inner()) = None;
        Ok(())
    }
}

/// Keeps the user as a JSON document on disk.
#[derive(Debug, Clone)]
pub struct FileSessionBackend {
    path: PathBuf,
}

impl FileSessionBackend {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

impl SessionBackend for FileSessionBackend {
    fn load(&self) -> StoreResult<Option<User>> {
        match fs::read_to_string(&self.path) {
            Ok(raw) => Ok(Some(serde_json::from_str(&raw)?)),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    fn save(&self, user: &User) -> StoreResult<()> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(&self.path, serde_json::to_vec_pretty(user)?)?;
        Ok(())
    }

    fn clear(&self) -> StoreResult<()> {
        match fs::remove_file(&self.path) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e.into()),
        }
    }
}

/// Holds the current identity. Owned by the application shell.
pub struct SessionStore {
    backend: Box<dyn SessionBackend>,
    auth: AuthConfig,
    user: Option<User>,
}

impl SessionStore {
    /// Restores any persisted session. A corrupt session file is discarded
    /// rather than failing startup.
    pub fn open(backend: Box<dyn SessionBackend>, auth: AuthConfig) -> StoreResult<Self> {
        let user = match backend.load() {
            Ok(user) => user,
            Err(e) => {
                warn!("Discarding unreadable session: {}", e);
                backend.clear()?;
                None
            }
        };
        if let Some(user) = &user {
            info!(user_id = %user.id, role = ?user.role, "Session restored");
        }
        Ok(Self { backend, auth, user })
    }

    pub fn from_config(config: &Config) -> StoreResult<Self> {
        let backend: Box<dyn SessionBackend> = match config.session.backend {
            SessionBackendKind::Memory => Box::new(MemorySessionBackend::default()),
            SessionBackendKind::File => Box::new(FileSessionBackend::new(config.session.path.clone())),
        };
        Self::open(backend, config.auth.clone())
    }

    /// Create a regular account and sign it in.
    pub fn register(&mut self, name: &str, email: &str, password: &str) -> CoreResult<User> {
        if name.trim().is_empty() || email.trim().is_empty() || password.is_empty() {
            return Err(CoreError::ValidationError("name, email and password are required".to_string()));
        }
        let user = User {
            id: Uuid::new_v4().to_string(),
            name: name.trim().to_string(),
            email: email.trim().to_string(),
            role: Role::User,
        };
        self.sign_in(user)
    }

    fn sign_in(&mut self, user: User) -> CoreResult<User> {
        self.backend.save(&user)?;
        info!(user_id = %user.id, role = ?user.role, "Signed in");
        self.user = Some(user.clone());
        Ok(user)
    }
}

impl SessionProvider for SessionStore {
    fn current_user(&self) -> Option<User> {
        self.user.clone()
    }

    /// Mock authentication: the configured admin credentials yield an admin,
    /// any other email signs in as a regular user named after its local part.
    fn login(&mut self, email: &str, password: &str) -> CoreResult<User> {
        let email = email.trim();
        if email.is_empty() || password.is_empty() {
            return Err(CoreError::ValidationError("email and password are required".to_string()));
        }

        let user = if email == self.auth.admin_email && password == self.auth.admin_password.expose().as_str() {
            User {
                id: "1".to_string(),
                name: self.auth.admin_name.clone(),
                email: email.to_string(),
                role: Role::Admin,
            }
        } else {
            User {
                id: Uuid::new_v4().to_string(),
                name: email.split('@').next().unwrap_or(email).to_string(),
                email: email.to_string(),
                role: Role::User,
            }
        };
        self.sign_in(user)
    }

    fn logout(&mut self) -> CoreResult<()> {
        self.backend.clear()?;
        if let Some(user) = self.user.take() {
            info!(user_id = %user.id, "Signed out");
        }
        Ok(())
    }
}
