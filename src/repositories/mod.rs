pub mod article;
pub mod auth_provider;
pub mod errors;
pub mod user;

pub use article::{ArticleRepository, ArticleRepositoryTrait};
pub use auth_provider::{AuthProviderRepository, AuthProviderRepositoryTrait};
pub use errors::RepositoryError;
pub use user::{UserRepository, UserRepositoryTrait};
