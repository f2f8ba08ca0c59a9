//! Shared HTTP adapter state.
//!
//! HTTP handlers accept this state via `actix_web::web::Data` so they only
//! depend on domain ports (use-cases) and remain testable without I/O.

use std::sync::Arc;

use crate::domain::ports::{ArticleCommand, ArticleQuery, ImageUploads, LoginService};

/// Parameter object bundling all port implementations for HTTP handlers.
#[derive(Clone)]
pub struct HttpStatePorts {
    /// Admin login.
    pub login: Arc<dyn LoginService>,
    /// Article mutations.
    pub articles: Arc<dyn ArticleCommand>,
    /// Article reads.
    pub articles_query: Arc<dyn ArticleQuery>,
    /// Image uploads.
    pub uploads: Arc<dyn ImageUploads>,
}

/// Dependency bundle for HTTP handlers.
#[derive(Clone)]
pub struct HttpState {
    /// Admin login.
    pub login: Arc<dyn LoginService>,
    /// Article mutations.
    pub articles: Arc<dyn ArticleCommand>,
    /// Article reads.
    pub articles_query: Arc<dyn ArticleQuery>,
    /// Image uploads.
    pub uploads: Arc<dyn ImageUploads>,
}

impl From<HttpStatePorts> for HttpState {
    fn from(ports: HttpStatePorts) -> Self {
        Self::new(ports)
    }
}

impl HttpState {
    /// Construct state from the port bundle.
    ///
    /// # Examples
    /// ```
    /// use std::sync::Arc;
    ///
    /// use blog_backend::domain::ports::DisabledLoginService;
    /// use blog_backend::domain::{ArticleService, ImageUploadService};
    /// use blog_backend::inbound::http::state::{HttpState, HttpStatePorts};
    /// use blog_backend::outbound::memory::InMemoryArticleRepository;
    /// use blog_backend::outbound::storage::CapStdImageStore;
    /// use mockable::DefaultClock;
    ///
    /// let dir = tempfile::tempdir().unwrap();
    /// let clock = Arc::new(DefaultClock);
    /// let articles = Arc::new(ArticleService::new(
    ///     Arc::new(InMemoryArticleRepository::new()),
    ///     clock.clone(),
    /// ));
    /// let store = Arc::new(CapStdImageStore::open(dir.path()).unwrap());
    /// let state = HttpState::new(HttpStatePorts {
    ///     login: Arc::new(DisabledLoginService),
    ///     articles: articles.clone(),
    ///     articles_query: articles,
    ///     uploads: Arc::new(ImageUploadService::new(store, clock)),
    /// });
    /// let _ = state.articles_query.clone();
    /// ```
    pub fn new(ports: HttpStatePorts) -> Self {
        let HttpStatePorts {
            login,
            articles,
            articles_query,
            uploads,
        } = ports;
        Self {
            login,
            articles,
            articles_query,
            uploads,
        }
    }
}
