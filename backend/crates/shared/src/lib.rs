//! Kernel - vocabulary shared by every crate of the service
//!
//! - `error`: HTTP-facing error value and its status classification
//! - `response`: the `{status, message, data?, token?}` JSON envelope
//! - `id`: the public user identifier
//!
//! Axum integration (`IntoResponse`) sits behind the `axum` feature so the
//! domain crates can depend on the kernel without pulling in a web stack.

pub mod error {
    pub mod app_error;
    #[cfg(feature = "axum")]
    pub mod conversions;
    pub mod kind;
}
pub mod id;
pub mod response;
