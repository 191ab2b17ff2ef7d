//! Bounds that differ between native and `wasm32` targets.
//!
//! Browser values (`JsValue` and friends) are neither `Send` nor `Sync`, so
//! code that must run in both places cannot require them unconditionally.

/// `Send + Sync` on native targets; no bound at all on `wasm32`.
#[cfg(not(target_arch = "wasm32"))]
pub trait MaybeSync: Send + Sync {}

#[cfg(not(target_arch = "wasm32"))]
impl<T> MaybeSync for T where T: Send + Sync + ?Sized {}

/// `Send + Sync` on native targets; no bound at all on `wasm32`.
#[cfg(target_arch = "wasm32")]
pub trait MaybeSync {}

#[cfg(target_arch = "wasm32")]
impl<T> MaybeSync for T where T: ?Sized {}
