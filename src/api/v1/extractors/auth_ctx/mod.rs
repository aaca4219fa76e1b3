/*!
 * Authentication context extractor
 *
 * Responsibility:
 * - hand the authenticated caller (AuthCtx) to handlers explicitly
 * - axum-specific code lives in core, the type lives in types
 *
 * Public API:
 * - AuthCtx
 * - AuthCtxExtractor
 */

mod core;
mod types;

pub use self::core::AuthCtxExtractor;
pub use self::types::AuthCtx;
