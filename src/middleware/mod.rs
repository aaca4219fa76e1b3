/*
 * Responsibility
 * - middleware public interface
 * - each module exposes `apply(router, ...)`
 */
pub mod auth;
pub mod cors;
pub mod http;
pub mod security_headers;
