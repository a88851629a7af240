mod auth;
mod error;
#[cfg(test)]
pub mod fake;
mod query;
mod session;
mod wire;

pub use auth::authenticate;
pub use error::ProviderError;
pub use query::Category;
pub use query::Query;
pub use query::QueryBuilder;
pub use session::GmailSession;
pub use session::ListPage;
pub use session::MailSession;
pub use session::Profile;
