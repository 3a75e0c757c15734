//! Screen routes of the admin dashboard and the navigation guard.

use std::fmt;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Route {
    Login,
    Dashboard,
    Documents,
    DocumentsUpload,
    DocumentDetail(String),
    Test,
    Analytics,
    Conversations,
    Users,
    VectorDb,
    RagConfig,
    Settings,
    ServerError,
    NotFound,
}

impl Route {
    /// Resolve a URL path; anything unrecognized is `NotFound`.
    pub fn parse(path: &str) -> Route {
        let trimmed = path.split(['?', '#']).next().unwrap_or("");
        let segments: Vec<&str> = trimmed.split('/').filter(|s| !s.is_empty()).collect();

        match segments.as_slice() {
            [] => Route::Dashboard,
            ["login"] => Route::Login,
            ["documents"] => Route::Documents,
            ["documents", "upload"] => Route::DocumentsUpload,
            ["documents", id] => Route::DocumentDetail((*id).to_string()),
            ["test"] => Route::Test,
            ["analytics"] => Route::Analytics,
            ["conversations"] => Route::Conversations,
            ["users"] => Route::Users,
            ["vector-db"] => Route::VectorDb,
            ["rag-config"] => Route::RagConfig,
            ["settings"] => Route::Settings,
            ["500"] => Route::ServerError,
            _ => Route::NotFound,
        }
    }

    pub fn path(&self) -> String {
        match self {
            Route::Login => "/login".to_string(),
            Route::Dashboard => "/".to_string(),
            Route::Documents => "/documents".to_string(),
            Route::DocumentsUpload => "/documents/upload".to_string(),
            Route::DocumentDetail(id) => format!("/documents/{}", id),
            Route::Test => "/test".to_string(),
            Route::Analytics => "/analytics".to_string(),
            Route::Conversations => "/conversations".to_string(),
            Route::Users => "/users".to_string(),
            Route::VectorDb => "/vector-db".to_string(),
            Route::RagConfig => "/rag-config".to_string(),
            Route::Settings => "/settings".to_string(),
            Route::ServerError => "/500".to_string(),
            Route::NotFound => "/404".to_string(),
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            Route::Login => "login",
            Route::Dashboard => "dashboard",
            Route::Documents => "documents",
            Route::DocumentsUpload => "documents-upload",
            Route::DocumentDetail(_) => "documents-detail",
            Route::Test => "test",
            Route::Analytics => "analytics",
            Route::Conversations => "conversations",
            Route::Users => "users",
            Route::VectorDb => "vector-db",
            Route::RagConfig => "rag-config",
            Route::Settings => "settings",
            Route::ServerError => "server-error",
            Route::NotFound => "not-found",
        }
    }

    pub fn title(&self) -> &'static str {
        match self {
            Route::Login => "Login",
            Route::Dashboard => "Dashboard",
            Route::Documents => "Documents",
            Route::DocumentsUpload => "Upload Document",
            Route::DocumentDetail(_) => "Document Detail",
            Route::Test => "Test Query",
            Route::Analytics => "Analytics",
            Route::Conversations => "Conversations",
            Route::Users => "Users",
            Route::VectorDb => "Vector DB",
            Route::RagConfig => "RAG Config",
            Route::Settings => "Settings",
            Route::ServerError => "Server Error",
            Route::NotFound => "Page Not Found",
        }
    }

    pub fn requires_auth(&self) -> bool {
        !matches!(self, Route::Login | Route::ServerError | Route::NotFound)
    }
}

impl fmt::Display for Route {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.path())
    }
}

pub fn page_title(route: &Route) -> String {
    format!("{} - Admin Dashboard", route.title())
}

/// Where navigation to `to` actually lands.
///
/// Protected screens bounce to `Login` without a credential, and an
/// authenticated operator is sent from `Login` to the dashboard.
pub fn guard(to: Route, authenticated: bool) -> Route {
    if to.requires_auth() && !authenticated {
        Route::Login
    } else if to == Route::Login && authenticated {
        Route::Dashboard
    } else {
        to
    }
}
