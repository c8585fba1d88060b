use std::fs;
use std::path::Path;
use std::path::PathBuf;

use anyhow::bail;
use anyhow::Context;
use talkrix_api::ApiClient;
use talkrix_api::ApiError;
use talkrix_core::config::API_URL_ENV;
use talkrix_core::routing::gate;
use talkrix_core::routing::Route;
use talkrix_core::routing::RouteDecision;
use talkrix_core::session::Session;
use talkrix_core::Config;
use talkrix_core::FileStore;
use talkrix_core::SessionStore;

const APP_DIR: &str = "talkrix";
const CONFIG_FILE: &str = "config.toml";
const SESSION_FILE: &str = "session.json";
pub const LOG_FILE: &str = "talkrix.log";

/// Everything a command needs: resolved configuration and the persisted
/// session.
pub struct AppContext {
    pub config: Config,
    pub sessions: SessionStore<FileStore>,
    pub data_dir: PathBuf,
}

impl AppContext {
    pub fn load(api_url: Option<String>) -> anyhow::Result<Self> {
        let config_path = config_dir()?.join(CONFIG_FILE);
        let config = load_config(&config_path)?
            .with_api_url_override(std::env::var(API_URL_ENV).ok())
            .with_api_url_override(api_url);

        let data_dir = data_dir()?;
        let session_path = config
            .storage
            .session_path
            .clone()
            .unwrap_or_else(|| data_dir.join(SESSION_FILE));
        let store = FileStore::open(&session_path)
            .with_context(|| format!("failed to open session store {}", session_path.display()))?;
        tracing::debug!(
            "api {} session {}",
            config.api.base_url,
            session_path.display()
        );

        Ok(Self {
            config,
            sessions: SessionStore::new(store),
            data_dir,
        })
    }

    /// Client without credentials, for login and signup.
    pub fn anonymous_client(&self) -> ApiClient {
        ApiClient::new(&self.config.api.base_url)
    }

    /// Gates a protected route. Without a stored token the route is
    /// remembered for after login and the command fails.
    pub fn authorize(&mut self, route: Route) -> anyhow::Result<(Session, ApiClient)> {
        match gate(route, &mut self.sessions)? {
            RouteDecision::Render {
                session: Some(session),
                ..
            } => {
                let client = self.anonymous_client().with_token(&session.token);
                Ok((session, client))
            }
            RouteDecision::Render { session: None, .. } | RouteDecision::RedirectToLogin => {
                bail!("not logged in; run `talkrix login` first")
            }
        }
    }

    /// Converts an API failure for the user. A rejected token ends the
    /// session so the next protected command asks for a login.
    pub fn api_failure(&mut self, err: ApiError) -> anyhow::Error {
        if err.is_unauthorized() {
            if let Err(store_err) = self.sessions.teardown() {
                tracing::warn!("failed to clear session: {}", store_err);
            }
            return anyhow::anyhow!("{err}; please run `talkrix login` again");
        }
        anyhow::Error::new(err)
    }
}

pub fn config_dir() -> anyhow::Result<PathBuf> {
    dirs::config_dir()
        .map(|dir| dir.join(APP_DIR))
        .context("could not determine the config directory")
}

pub fn data_dir() -> anyhow::Result<PathBuf> {
    let dir = dirs::data_dir()
        .map(|dir| dir.join(APP_DIR))
        .context("could not determine the data directory")?;
    fs::create_dir_all(&dir).with_context(|| format!("failed to create {}", dir.display()))?;
    Ok(dir)
}

/// Missing file means defaults.
pub fn load_config(path: &Path) -> anyhow::Result<Config> {
    match fs::read_to_string(path) {
        Ok(raw) => {
            toml::from_str(&raw).with_context(|| format!("invalid config file {}", path.display()))
        }
        Err(err) if err.kind() == std::io::ErrorKind::NotFound => Ok(Config::default()),
        Err(err) => Err(err).with_context(|| format!("failed to read {}", path.display())),
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use talkrix_core::config::DEFAULT_API_URL;
    use talkrix_core::UiTheme;

    use super::*;

    #[test]
    fn missing_config_file_uses_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let config = load_config(&dir.path().join("absent.toml")).unwrap();
        assert_eq!(config, Config::default());
        assert_eq!(config.api.base_url, DEFAULT_API_URL);
    }

    #[test]
    fn toml_sections_are_read() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(CONFIG_FILE);
        fs::write(
            &path,
            "[api]\nbase_url = \"https://api.talkrix.io\"\n\n[ui]\npage_size = 50\ntheme = \"ocean\"\n",
        )
        .unwrap();

        let config = load_config(&path).unwrap();
        assert_eq!(config.api.base_url, "https://api.talkrix.io");
        assert_eq!(config.page_size(), 50);
        assert_eq!(config.ui.theme, UiTheme::Ocean);
    }

    #[test]
    fn malformed_config_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(CONFIG_FILE);
        fs::write(&path, "[ui]\npage_size = \"many\"\n").unwrap();
        assert!(load_config(&path).is_err());
    }
}
