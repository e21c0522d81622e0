//! Element type bounds.
//!
//! With the `parallel` feature, [`MaybeSend`] ≡ [`Send`], [`MaybeSync`] ≡ [`Sync`] and
//! [`MaybeSendSync`] ≡ [`Send`] + [`Sync`], because element-wise kernels may hand elements
//! and closures to the rayon pool. Without it they are blanket-implemented for every type,
//! so `Rc`-based elements work in single-threaded builds.

use std::ops::{Add, Mul, Sub};

// ---- parallel enabled: alias to real Send/Sync ----

#[cfg(feature = "parallel")]
pub trait MaybeSend: Send {}
#[cfg(feature = "parallel")]
impl<T: Send> MaybeSend for T {}

#[cfg(feature = "parallel")]
pub trait MaybeSync: Sync {}
#[cfg(feature = "parallel")]
impl<T: Sync> MaybeSync for T {}

#[cfg(feature = "parallel")]
pub trait MaybeSendSync: Send + Sync {}
#[cfg(feature = "parallel")]
impl<T: Send + Sync> MaybeSendSync for T {}

// ---- parallel disabled: blanket impl for all types ----

#[cfg(not(feature = "parallel"))]
pub trait MaybeSend {}
#[cfg(not(feature = "parallel"))]
impl<T> MaybeSend for T {}

#[cfg(not(feature = "parallel"))]
pub trait MaybeSync {}
#[cfg(not(feature = "parallel"))]
impl<T> MaybeSync for T {}

#[cfg(not(feature = "parallel"))]
pub trait MaybeSendSync {}
#[cfg(not(feature = "parallel"))]
impl<T> MaybeSendSync for T {}

/// Bounds for element types that go through the element-wise dispatcher.
///
/// Structural operations (copy, transpose, rotate, ...) only need `Clone`; anything that
/// may run on the rayon pool needs `Element`.
pub trait Element: Clone + MaybeSendSync {}

impl<T> Element for T where T: Clone + MaybeSendSync {}

/// Bounds for element types usable with `add`, `subtract` and `multiply`.
///
/// Arithmetic is the element type's own `+`, `-` and `*`; nothing is promoted or
/// saturated.
pub trait Scalar:
    Copy + MaybeSendSync + Add<Output = Self> + Sub<Output = Self> + Mul<Output = Self> + num_traits::Zero
{
}

impl<T> Scalar for T where
    T: Copy
        + MaybeSendSync
        + Add<Output = T>
        + Sub<Output = T>
        + Mul<Output = T>
        + num_traits::Zero
{
}
