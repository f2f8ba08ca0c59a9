//! Process-local adapters for development and tests.

mod in_memory_article_repository;

pub use in_memory_article_repository::InMemoryArticleRepository;
