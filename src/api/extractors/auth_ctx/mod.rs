/*!
 * Authentication context extractor
 *
 * Responsibility:
 * - Give handlers the context (AuthCtx) of an authenticated request
 * - axum-specific code lives in core, the type itself in types
 */

mod core;
mod types;

pub use self::core::AuthCtxExtractor;
pub use types::AuthCtx;
