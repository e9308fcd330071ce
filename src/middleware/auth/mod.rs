pub mod guard;

pub use guard::{PermissionGuard, require};
