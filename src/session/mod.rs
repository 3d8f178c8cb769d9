use std::sync::Arc;

use parking_lot::Mutex;
use reqwest::cookie::Jar;
use reqwest::redirect::Policy;
use reqwest::{Client, StatusCode};
use tokio::sync::Semaphore;
use url::Url;

use crate::achievements::{self, types::AchievementTag};
use crate::auth::types::Credentials;
use crate::constants::AUTH_SESSION_ID;
use crate::errors::{request_error, session_expired_error, unknown_error};
use crate::Error;

pub mod types;

pub use self::types::SessionConfig;

pub type SessionLostCallback = Box<dyn FnOnce() + Send>;

/// HTTP client bound to a single authenticated web session
///
/// Redirects are never followed, the site answers `302 Found` once the
/// session cookie stops being accepted.
pub struct SessionFetcher {
    client: Client,
    config: SessionConfig,
    credentials: Credentials,
    in_flight: Semaphore,
    on_session_lost: Mutex<Option<SessionLostCallback>>,
}

impl SessionFetcher {
    pub fn new<F>(
        credentials: Credentials,
        config: SessionConfig,
        on_session_lost: F,
    ) -> Result<Self, Error>
    where
        F: FnOnce() + Send + 'static,
    {
        let jar = Jar::default();
        let cookie = match config.cookie_domain() {
            Some(domain) => format!(
                "{}={}; Domain={}",
                AUTH_SESSION_ID,
                credentials.session_id(),
                domain
            ),
            None => format!("{}={}", AUTH_SESSION_ID, credentials.session_id()),
        };
        jar.add_cookie_str(&cookie, config.base_url());

        let client = Client::builder()
            .cookie_provider(Arc::new(jar))
            .redirect(Policy::none())
            .timeout(*config.timeout())
            .build()
            .map_err(request_error)?;

        log::debug!(
            "Created session for {} with {:?}",
            credentials.profile_name(),
            credentials
        );
        Ok(Self {
            client,
            in_flight: Semaphore::new((*config.request_limit()).max(1)),
            config,
            credentials,
            on_session_lost: Mutex::new(Some(Box::new(on_session_lost))),
        })
    }

    pub fn credentials(&self) -> &Credentials {
        &self.credentials
    }

    /// Resolve `path` against the configured site root
    pub fn url_for(&self, path: &str) -> Result<Url, Error> {
        self.config.base_url().join(path).map_err(unknown_error)
    }

    pub fn achievements_url(&self) -> Result<Url, Error> {
        let mut url = self.config.base_url().clone();
        url.path_segments_mut()
            .map_err(|_| unknown_error("base url cannot be a base"))?
            .pop_if_empty()
            .extend([
                "account",
                "view-profile",
                self.credentials.profile_name().as_str(),
                "achievements",
            ]);
        Ok(url)
    }

    fn notify_session_lost(&self) {
        let callback = self.on_session_lost.lock().take();
        if let Some(callback) = callback {
            log::info!("Session of {} expired", self.credentials.profile_name());
            callback();
        }
    }

    async fn authenticated_get(&self, url: Url) -> Result<Vec<u8>, Error> {
        let _permit = self.in_flight.acquire().await.map_err(unknown_error)?;
        log::debug!("GET {}", url);
        let response = self.client.get(url).send().await.map_err(request_error)?;
        if response.status() == StatusCode::FOUND {
            self.notify_session_lost();
            return Err(session_expired_error());
        }
        let response = response.error_for_status().map_err(request_error)?;
        let body = response.bytes().await.map_err(request_error)?;
        Ok(body.to_vec())
    }

    /// Page body as text, undecodable bytes are replaced
    pub async fn get_page(&self, url: Url) -> Result<String, Error> {
        let body = self.authenticated_get(url).await?;
        Ok(String::from_utf8_lossy(&body).into_owned())
    }

    pub async fn fetch(&self, path: &str) -> Result<String, Error> {
        let url = self.url_for(path)?;
        self.get_page(url).await
    }

    pub async fn get_achievements(&self) -> Result<Vec<AchievementTag>, Error> {
        let url = self.achievements_url()?;
        let page = self.get_page(url).await?;
        Ok(achievements::parse_unlocked(&page))
    }

    #[cfg(feature = "installer")]
    pub async fn get_installer(&self) -> Result<Vec<u8>, Error> {
        let url = self.url_for(crate::constants::INSTALLER_PATH)?;
        self.authenticated_get(url).await
    }

    /// Release pooled connections, consumes the fetcher
    pub async fn shutdown(self) {
        log::debug!("Closing session for {}", self.credentials.profile_name());
        drop(self.client);
    }
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::time::{Duration, Instant};

    use mockito::Matcher;
    use tokio::net::TcpListener;

    use super::*;
    use crate::errors::ErrorKind;

    fn credentials() -> Credentials {
        Credentials::new("poesessid", "profile_name").unwrap()
    }

    fn fetcher(server: &mockito::ServerGuard, lost: Arc<AtomicUsize>) -> SessionFetcher {
        let config = SessionConfig::new(&server.url()).unwrap();
        SessionFetcher::new(credentials(), config, move || {
            lost.fetch_add(1, Ordering::SeqCst);
        })
        .expect("Failed to build fetcher")
    }

    #[tokio::test]
    async fn sends_session_cookie() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("GET", "/account/view-profile/profile_name/achievements")
            .match_header("cookie", Matcher::Regex("POESESSID=poesessid".to_string()))
            .with_status(200)
            .with_body(r#"<div class="achievement"><h2>Augmentation</h2></div>"#)
            .create_async()
            .await;

        let lost = Arc::new(AtomicUsize::new(0));
        let fetcher = fetcher(&server, lost.clone());
        let tags = fetcher.get_achievements().await.expect("Fetch failed");

        assert_eq!(tags, vec![AchievementTag::new("Augmentation")]);
        assert_eq!(lost.load(Ordering::SeqCst), 0);
        mock.assert_async().await;
        fetcher.shutdown().await;
    }

    #[tokio::test]
    async fn redirect_expires_session() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("GET", "/account/view-profile/profile_name/achievements")
            .with_status(302)
            .with_header("location", "/login")
            .expect(2)
            .create_async()
            .await;

        let lost = Arc::new(AtomicUsize::new(0));
        let fetcher = fetcher(&server, lost.clone());

        for _ in 0..2 {
            let err = fetcher
                .get_achievements()
                .await
                .expect_err("Redirect accepted");
            assert_eq!(err.kind(), ErrorKind::SessionExpired);
        }
        assert_eq!(lost.load(Ordering::SeqCst), 1);
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn invalid_utf8_is_replaced() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("GET", "/page")
            .with_status(200)
            .with_body(b"ok \xff\xfe done".to_vec())
            .create_async()
            .await;

        let fetcher = fetcher(&server, Arc::new(AtomicUsize::new(0)));
        let page = fetcher.fetch("page").await.expect("Fetch failed");
        assert_eq!(page, "ok \u{FFFD}\u{FFFD} done");
    }

    #[tokio::test]
    async fn profile_name_is_escaped() {
        let server = mockito::Server::new_async().await;
        let config = SessionConfig::new(&server.url()).unwrap();
        let credentials = Credentials::new("poesessid", "Some Exile/2").unwrap();
        let fetcher = SessionFetcher::new(credentials, config, || {}).unwrap();

        let url = fetcher.achievements_url().unwrap();
        assert_eq!(
            url.path(),
            "/account/view-profile/Some%20Exile%2F2/achievements"
        );
    }

    #[tokio::test]
    async fn unreachable_backend() {
        let config = SessionConfig::new("http://127.0.0.1:9/").unwrap();
        let fetcher = SessionFetcher::new(credentials(), config, || {}).unwrap();
        let err = fetcher.fetch("page").await.expect_err("Fetch succeeded");
        assert_eq!(err.kind(), ErrorKind::Request);
    }

    #[tokio::test]
    async fn error_status_fails() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("GET", "/account/view-profile/profile_name/achievements")
            .with_status(503)
            .with_body("<html>Down for maintenance</html>")
            .create_async()
            .await;

        let lost = Arc::new(AtomicUsize::new(0));
        let fetcher = fetcher(&server, lost.clone());
        let err = fetcher
            .get_achievements()
            .await
            .expect_err("Error page accepted");
        assert_eq!(err.kind(), ErrorKind::Request);
        assert_eq!(lost.load(Ordering::SeqCst), 0);
    }

    /// Accepts connections and never answers them
    async fn silent_server() -> String {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let address = listener.local_addr().unwrap();
        tokio::spawn(async move {
            let mut sockets = Vec::new();
            while let Ok((socket, _)) = listener.accept().await {
                sockets.push(socket);
            }
        });
        format!("http://{}/", address)
    }

    #[tokio::test]
    async fn request_times_out() {
        let config = SessionConfig::new(&silent_server().await)
            .unwrap()
            .with_timeout(Duration::from_millis(50));
        let fetcher = SessionFetcher::new(credentials(), config, || {}).unwrap();

        let err = fetcher.fetch("page").await.expect_err("Fetch succeeded");
        assert_eq!(err.kind(), ErrorKind::Request);
        assert!(err.is_transient());
    }

    #[tokio::test]
    async fn request_limit_serializes_requests() {
        let timeout = Duration::from_millis(200);
        let config = SessionConfig::new(&silent_server().await)
            .unwrap()
            .with_timeout(timeout)
            .with_request_limit(1);
        let fetcher = SessionFetcher::new(credentials(), config, || {}).unwrap();

        let started = Instant::now();
        let (first, second) = tokio::join!(fetcher.fetch("first"), fetcher.fetch("second"));
        assert!(first.is_err() && second.is_err());
        // the second request only starts once the first one timed out
        assert!(started.elapsed() >= timeout * 2);
        assert_eq!(fetcher.in_flight.available_permits(), 1);
    }

    #[test]
    fn default_config() {
        let config = SessionConfig::default();
        assert_eq!(config.base_url().as_str(), "https://www.pathofexile.com/");
        assert_eq!(config.cookie_domain().as_deref(), Some("pathofexile.com"));
        assert_eq!(*config.request_limit(), 30);
        assert_eq!(config.timeout().as_secs(), 30);
    }
}
