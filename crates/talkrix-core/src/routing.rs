use crate::session::KeyValueStore;
use crate::session::Session;
use crate::session::SessionStore;
use crate::session::StoreError;
use crate::state::Section;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Route {
    Login,
    Register,
    Page(Section),
    Campaign(String),
}

impl Route {
    pub fn dashboard() -> Self {
        Self::Page(Section::Overview)
    }

    pub fn is_protected(&self) -> bool {
        !matches!(self, Self::Login | Self::Register)
    }

    pub fn path(&self) -> String {
        match self {
            Self::Login => "/login".to_string(),
            Self::Register => "/register".to_string(),
            Self::Page(section) => section.path().to_string(),
            Self::Campaign(id) => format!("/campaigns/{id}"),
        }
    }

    pub fn parse(path: &str) -> Option<Self> {
        let path = path.trim().trim_end_matches('/');
        match path {
            "/login" => return Some(Self::Login),
            "/register" => return Some(Self::Register),
            "" => return Some(Self::dashboard()),
            _ => {}
        }
        if let Some(section) = Section::ALL.iter().find(|s| s.path() == path) {
            return Some(Self::Page(*section));
        }
        path.strip_prefix("/campaigns/")
            .filter(|id| !id.is_empty() && !id.contains('/'))
            .map(|id| Self::Campaign(id.to_string()))
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RouteDecision {
    Render { route: Route, session: Option<Session> },
    RedirectToLogin,
}

/// Gate run before a route renders. A protected route without a stored token
/// records itself as the post-login target and redirects.
pub fn gate<S: KeyValueStore>(
    route: Route,
    sessions: &mut SessionStore<S>,
) -> Result<RouteDecision, StoreError> {
    if !route.is_protected() {
        return Ok(RouteDecision::Render {
            route,
            session: sessions.read(),
        });
    }
    match sessions.read() {
        Some(session) => Ok(RouteDecision::Render {
            route,
            session: Some(session),
        }),
        None => {
            sessions.set_redirect_target(&route.path())?;
            Ok(RouteDecision::RedirectToLogin)
        }
    }
}

/// Where a successful login lands: the stored redirect target if it names a
/// protected route, the dashboard otherwise.
pub fn landing_after_login<S: KeyValueStore>(
    sessions: &mut SessionStore<S>,
) -> Result<Route, StoreError> {
    let target = sessions
        .take_redirect_target()?
        .and_then(|path| Route::parse(&path))
        .filter(Route::is_protected);
    Ok(target.unwrap_or_else(Route::dashboard))
}
