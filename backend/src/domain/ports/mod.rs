//! Domain ports and supporting types for the hexagonal boundary.
//!
//! Driven ports ([`ArticleRepository`], [`ImageStore`], [`SlugLookup`]) are
//! implemented by outbound adapters. Driving ports ([`ArticleCommand`],
//! [`ArticleQuery`], [`ImageUploads`], [`LoginService`]) are what inbound
//! adapters call.

mod macros;
pub(crate) use macros::define_port_error;

mod article_command;
mod article_query;
mod article_repository;
mod image_store;
mod image_uploads;
mod login_service;
mod slug_lookup;

#[cfg(test)]
pub use article_command::MockArticleCommand;
pub use article_command::{ArticleCommand, UpdateArticleRequest};
#[cfg(test)]
pub use article_query::MockArticleQuery;
pub use article_query::{ArticleListFilter, ArticleListFilterError, ArticleQuery};
#[cfg(test)]
pub use article_repository::MockArticleRepository;
pub use article_repository::{ArticleRepository, ArticleRepositoryError};
#[cfg(test)]
pub use image_store::MockImageStore;
pub use image_store::{ImageStore, ImageStoreError};
#[cfg(test)]
pub use image_uploads::MockImageUploads;
pub use image_uploads::ImageUploads;
#[cfg(test)]
pub use login_service::MockLoginService;
pub use login_service::{AdminLoginService, DisabledLoginService, LoginService};
pub use slug_lookup::{RepositorySlugLookup, SlugLookup};
