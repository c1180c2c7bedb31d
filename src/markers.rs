//! Thread-safety markers for the wrappers.
//!
//! Every wrapper takes a marker as its last type parameter. It defaults to
//! [`Local`], which accepts any callable and keeps the wrapper on the thread
//! that created it. [`Sendable`] only accepts `Send` callables, and in return
//! the wrapper itself is `Send`, so it can be handed whole to another thread.
//!
//! The constraint is enforced wherever a callable is installed (`new` and
//! `set`), so a `UniqueFnMut<'_, _, _, Sendable>` never holds a callable that
//! is not `Send`. No wrapper is ever `Sync`: calls are never shared between
//! threads.
//!
//! ```
//! use std::thread;
//!
//! use unique_function::{markers::Sendable, UniqueFnOnce};
//!
//! let name = String::from("worker");
//! let job = UniqueFnOnce::<(), usize, Sendable>::new(move || name.len());
//!
//! let len = thread::spawn(move || job.call_once_with(())).join().unwrap();
//! assert_eq!(len, 6);
//! ```
//!
//! A callable that is not `Send` is rejected:
//!
//! ```compile_fail
//! use std::rc::Rc;
//!
//! use unique_function::{markers::Sendable, UniqueFnMut};
//!
//! let shared = Rc::new(5);
//! let f = UniqueFnMut::<(), i32, Sendable>::new(move || *shared);
//! ```

/// Marker for wrappers that stay on the thread that created them.
///
/// Any callable is accepted, including ones capturing `Rc` or `Cell`
/// references. This is the default marker.
#[derive(Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Debug, Default, Hash)]
pub struct Local;

/// Marker for wrappers that may be sent to another thread.
///
/// Only `Send` callables are accepted.
#[derive(Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Debug, Default, Hash)]
pub struct Sendable;

/// Implemented by callable types that may be stored in a wrapper with the
/// thread-safety marker `T`.
///
/// Every type is a `CallableMarkerFor<Local>`; only `Send` types are a
/// `CallableMarkerFor<Sendable>`.
pub trait CallableMarkerFor<T> {}

impl<F> CallableMarkerFor<Local> for F {}

impl<F: Send> CallableMarkerFor<Sendable> for F {}
