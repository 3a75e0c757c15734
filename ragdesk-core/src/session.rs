//! Operator session: the bearer credential, where it is persisted, and the
//! navigation state the HTTP layer reports back to the caller.
//!
//! A `Session` is passed explicitly to every request-issuing function.

use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use crate::error::{ApiError, ApiResult};
use crate::routes::Route;

// ============================================================================
// Credential storage
// ============================================================================

/// Persistence for the bearer token between runs.
pub trait CredentialStore: Send + Sync {
    fn load(&self) -> ApiResult<Option<String>>;
    fn save(&self, token: &str) -> ApiResult<()>;
    fn clear(&self) -> ApiResult<()>;
}

/// Token kept in a single file, created on first save.
#[derive(Debug, Clone)]
pub struct FileCredentialStore {
    path: PathBuf,
}

impl FileCredentialStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl CredentialStore for FileCredentialStore {
    fn load(&self) -> ApiResult<Option<String>> {
        match fs::read_to_string(&self.path) {
            Ok(s) => {
                let token = s.trim();
                Ok((!token.is_empty()).then(|| token.to_string()))
            }
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(ApiError::Credential(format!(
                "cannot read {}: {}",
                self.path.display(),
                e
            ))),
        }
    }

    fn save(&self, token: &str) -> ApiResult<()> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(&self.path, token)?;
        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;
            fs::set_permissions(&self.path, fs::Permissions::from_mode(0o600))?;
        }
        Ok(())
    }

    fn clear(&self) -> ApiResult<()> {
        match fs::remove_file(&self.path) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e.into()),
        }
    }
}

/// In-process store, for tests and one-shot scripting.
#[derive(Debug, Default)]
pub struct MemoryCredentialStore {
    token: Mutex<Option<String>>,
}

impl MemoryCredentialStore {
    pub fn with_token(token: impl Into<String>) -> Self {
        Self {
            token: Mutex::new(Some(token.into())),
        }
    }
}

impl CredentialStore for MemoryCredentialStore {
    fn load(&self) -> ApiResult<Option<String>> {
        Ok(lock(&self.token).clone())
    }

    fn save(&self, token: &str) -> ApiResult<()> {
        *lock(&self.token) = Some(token.to_string());
        Ok(())
    }

    fn clear(&self) -> ApiResult<()> {
        *lock(&self.token) = None;
        Ok(())
    }
}

// ============================================================================
// Session
// ============================================================================

#[derive(Debug)]
struct NavState {
    location: Route,
    redirect: Option<Route>,
}

pub struct Session {
    store: Box<dyn CredentialStore>,
    token: Mutex<Option<String>>,
    nav: Mutex<NavState>,
}

impl Session {
    /// Open a session, picking up any previously persisted token.
    pub fn open(store: Box<dyn CredentialStore>) -> ApiResult<Self> {
        let token = store.load()?;
        Ok(Self {
            store,
            token: Mutex::new(token),
            nav: Mutex::new(NavState {
                location: Route::Dashboard,
                redirect: None,
            }),
        })
    }

    /// Session with no persistence and no credential.
    pub fn ephemeral() -> Self {
        Self {
            store: Box::new(MemoryCredentialStore::default()),
            token: Mutex::new(None),
            nav: Mutex::new(NavState {
                location: Route::Dashboard,
                redirect: None,
            }),
        }
    }

    pub fn token(&self) -> Option<String> {
        lock(&self.token).clone()
    }

    pub fn is_authenticated(&self) -> bool {
        lock(&self.token).is_some()
    }

    /// Remember a freshly issued token, in memory and in the store.
    pub fn store_token(&self, token: &str) -> ApiResult<()> {
        self.store.save(token)?;
        *lock(&self.token) = Some(token.to_string());
        Ok(())
    }

    /// Forget the credential everywhere.
    pub fn logout(&self) -> ApiResult<()> {
        *lock(&self.token) = None;
        self.store.clear()
    }

    /// Re-read the store; a missing token signs the session out.
    pub fn check_auth(&self) -> ApiResult<bool> {
        let stored = self.store.load()?;
        let authenticated = stored.is_some();
        *lock(&self.token) = stored;
        Ok(authenticated)
    }

    pub fn visit(&self, route: Route) {
        lock(&self.nav).location = route;
    }

    pub fn location(&self) -> Route {
        lock(&self.nav).location.clone()
    }

    pub fn redirect(&self, route: Route) {
        lock(&self.nav).redirect = Some(route);
    }

    /// Pending redirect raised by the HTTP layer, consumed on read.
    pub fn take_redirect(&self) -> Option<Route> {
        lock(&self.nav).redirect.take()
    }

    /// 401 handling: drop the credential and send the operator to login.
    pub(crate) fn expire(&self) {
        if let Err(e) = self.logout() {
            tracing::warn!(error = %e, "Failed to clear stored credential");
        }
        self.redirect(Route::Login);
    }
}

impl std::fmt::Debug for Session {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Session")
            .field("authenticated", &self.is_authenticated())
            .field("nav", &*lock(&self.nav))
            .finish()
    }
}

/// Attach the bearer credential to an outgoing request, when there is one.
pub fn with_credential(req: reqwest::RequestBuilder, token: Option<&str>) -> reqwest::RequestBuilder {
    match token {
        Some(t) => req.bearer_auth(t),
        None => req,
    }
}

pub(crate) fn lock<T>(m: &Mutex<T>) -> std::sync::MutexGuard<'_, T> {
    m.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}
