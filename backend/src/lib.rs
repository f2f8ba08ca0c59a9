//! Personal blog backend.
//!
//! Articles get URL slugs derived from their titles and excerpts derived
//! from their Markdown bodies; the HTTP layer adds admin sessions, image
//! uploads and an archive timeline on top.

pub mod doc;
pub mod domain;
pub mod inbound;
pub mod middleware;
pub mod outbound;
pub mod server;
pub mod settings;

/// Public OpenAPI surface used by Swagger UI and tooling.
pub use doc::ApiDoc;
pub use domain::TraceId;
pub use middleware::Trace;
