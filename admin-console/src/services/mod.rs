pub mod api_client;
pub mod composers;
pub mod metrics;
pub mod queries;

pub use api_client::ApiClient;
pub use composers::ComposerRegistry;
pub use queries::{ConversationQuery, UsersQuery};
