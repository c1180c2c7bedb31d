//! Move-only, type-erased callable wrappers with inline small-object storage.
//!
//! [`UniqueFnMut`], [`UniqueFn`] and [`UniqueFnOnce`] each hold one callable
//! with a fixed signature. Unlike `Box<dyn FnMut(..)>`, a callable of at most
//! [`INLINE_SIZE`] bytes and pointer alignment is stored inside the wrapper
//! itself, so wrapping, moving and dropping it never touch the allocator.
//! Larger callables take exactly one heap allocation, which follows the
//! wrapper around when it is moved.
//!
//! The wrappers are never `Clone`, so callables capturing move-only state
//! (owned buffers, handles, other wrappers) are accepted.
//!
//! ```
//! use unique_function::{Placement, UniqueFnMut};
//!
//! let buffer = vec![1u32, 2, 3];
//! let mut sum = UniqueFnMut::<(u32,), u32>::new(move |scale: u32| {
//!     buffer.iter().map(|x| x * scale).sum::<u32>()
//! });
//!
//! assert_eq!(sum.placement(), Some(Placement::Inline));
//! assert_eq!(sum.call(2), 12);
//!
//! let mut moved = sum.take();
//! assert!(sum.is_none());
//! assert_eq!(moved.call(1), 6);
//! ```
//!
//! Signatures are written as an argument tuple plus a return type:
//! `UniqueFnMut<'a, (A, B), R>` holds an `FnMut(A, B) -> R`.
//!
//! Wrappers stay on their thread by default. Marked with
//! [`markers::Sendable`] they accept only `Send` callables and can be moved to
//! another thread.
//!
//! # Features
//!
//! * `tracing`: emits `trace`-level events through the `tracing` crate when a
//!   callable spills to the heap or is relocated.

#[macro_use]
mod macros;

mod behavior;
mod error;
mod function;
pub mod markers;
mod once;
mod raw;
mod signature;
mod storage;

pub use {
    error::BadFunctionCall,
    function::{swap, Empty, UniqueCallable, UniqueFn, UniqueFnMut},
    once::UniqueFnOnce,
    signature::{CallMut, CallOnce, CallRef},
    storage::{fits_inline, Placement, INLINE_ALIGN, INLINE_SIZE},
};
