pub mod context;

pub use context::{AuthContext, ACCESS_TOKEN_KEY};
