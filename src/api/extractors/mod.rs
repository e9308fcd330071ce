pub mod auth_ctx;
pub mod drink_id;
pub mod json_body;

pub use auth_ctx::{AuthCtx, AuthCtxExtractor};
pub use drink_id::DrinkId;
pub use json_body::JsonBody;
