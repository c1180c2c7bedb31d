//! Reusable wrappers: [`UniqueFnMut`] for callables that mutate their state
//! and [`UniqueFn`] for callables invoked through a shared reference.
//!
//! ```
//! use unique_function::{UniqueFn, UniqueFnMut};
//!
//! let mut calls = 0;
//! let mut count = UniqueFnMut::<(u32,), u32>::new(move |step: u32| {
//!     calls += step;
//!     calls
//! });
//!
//! assert_eq!(count.call(2), 2);
//! assert_eq!(count.call(3), 5);
//!
//! let greet = UniqueFn::<(&str,), String>::new(|name: &str| format!("hello, {}", name));
//! assert_eq!(greet.call("world"), "hello, world");
//! ```

use {
    crate::{
        behavior::{dispatch_mut, dispatch_ref},
        error::BadFunctionCall,
        markers::{CallableMarkerFor, Local},
        raw::RawFunction,
        signature::{CallMut, CallRef},
        storage::Placement,
    },
    std::marker::PhantomData,
};

/// Sentinel compared against to test a wrapper for emptiness.
///
/// `f == Empty` is equivalent to `f.is_none()`.
#[derive(Clone, Copy, PartialEq, Eq, Debug, Default, Hash)]
pub struct Empty;

pub(crate) mod sealed {
    pub trait Sealed {}
}

/// Operations shared by every wrapper in this crate, for use in generic code.
pub trait UniqueCallable: sealed::Sealed + Sized {
    /// Returns `true` if the wrapper holds a callable.
    fn is_some(&self) -> bool;

    /// Returns where the held callable lives, or `None` if the wrapper is empty.
    fn placement(&self) -> Option<Placement>;

    /// Moves the held callable into a new wrapper, leaving `self` empty.
    fn take(&mut self) -> Self;

    /// Drops the held callable, if any.
    fn reset(&mut self);

    /// Exchanges the callables held by `self` and `other`.
    fn swap(&mut self, other: &mut Self);
}

/// Exchanges the callables held by `lhs` and `rhs`.
pub fn swap<T: UniqueCallable>(lhs: &mut T, rhs: &mut T) {
    lhs.swap(rhs)
}

/// Move-only wrapper for a callable invoked through a mutable reference.
///
/// `Args` is the tuple of argument types and `R` the return type, so
/// `UniqueFnMut<'a, (i32, i32), i32>` holds anything callable as
/// `FnMut(i32, i32) -> i32` that lives for `'a`.
///
/// Callables up to [`INLINE_SIZE`](crate::INLINE_SIZE) bytes with at most
/// pointer alignment are stored inside the wrapper; larger ones take exactly
/// one heap allocation, which moves along with the wrapper.
///
/// Reference arguments get a single lifetime chosen by the wrapper's type, not
/// one per call: a `UniqueFnMut<'_, (&str,), usize>` passed into a function
/// cannot be called with a borrow of that function's locals. Borrow from data
/// that outlives the wrapper's type, or pass owned values.
///
/// ```compile_fail
/// use unique_function::UniqueFnMut;
///
/// fn feed(f: &mut UniqueFnMut<'_, (&str,), usize>) -> usize {
///     let local = String::from("short-lived");
///     f.call(&local)
/// }
/// ```
///
/// `T` is the thread-safety marker; see [`markers`](crate::markers).
pub struct UniqueFnMut<'a, Args, R = (), T = Local> {
    raw: RawFunction<'a, Args, R>,
    _marker: PhantomData<T>,
}

impl_common!(UniqueFnMut);

impl<'a, Args, R, T> UniqueFnMut<'a, Args, R, T> {
    /// Creates a wrapper holding `f`.
    pub fn new<F>(f: F) -> Self
    where
        F: CallMut<Args, Output = R> + CallableMarkerFor<T> + 'a,
    {
        // SAFETY: the dispatcher is generated for `F`.
        Self::from_raw(unsafe { RawFunction::new(f, dispatch_mut::<F, Args, R>()) })
    }

    /// Drops the held callable, if any, then stores `f`.
    pub fn set<F>(&mut self, f: F)
    where
        F: CallMut<Args, Output = R> + CallableMarkerFor<T> + 'a,
    {
        self.reset();
        *self = Self::new(f);
    }

    /// Calls the held callable with the arguments packed in `args`.
    ///
    /// # Panics
    ///
    /// Panics if the wrapper is empty.
    #[inline]
    pub fn call_with(&mut self, args: Args) -> R {
        match self.try_call_with(args) {
            Ok(ret) => ret,
            Err(err) => panic!("{}", err),
        }
    }

    /// Calls the held callable with the arguments packed in `args`, or returns
    /// [`BadFunctionCall`] if the wrapper is empty.
    #[inline]
    pub fn try_call_with(&mut self, args: Args) -> Result<R, BadFunctionCall> {
        // SAFETY: `UniqueFnMut` only holds `dispatch_mut` or `dispatch_ref`
        // dispatchers, both valid through `&mut self`.
        unsafe { self.raw.try_invoke(args) }
    }

    /// Calls the held callable without checking for emptiness.
    ///
    /// # Safety
    ///
    /// The wrapper must not be empty (see [`is_some`](Self::is_some)).
    #[inline]
    pub unsafe fn call_unchecked_with(&mut self, args: Args) -> R {
        self.raw.invoke_unchecked(args)
    }
}

/// Move-only wrapper for a callable invoked through a shared reference.
///
/// The counterpart of [`UniqueFnMut`] for `Fn` callables: [`call`] takes
/// `&self`. Converts into a [`UniqueFnMut`] with the same signature; the
/// reverse conversion does not exist.
///
/// [`call`]: #method.call
pub struct UniqueFn<'a, Args, R = (), T = Local> {
    raw: RawFunction<'a, Args, R>,
    _marker: PhantomData<T>,
}

impl_common!(UniqueFn);

impl<'a, Args, R, T> UniqueFn<'a, Args, R, T> {
    /// Creates a wrapper holding `f`.
    pub fn new<F>(f: F) -> Self
    where
        F: CallRef<Args, Output = R> + CallableMarkerFor<T> + 'a,
    {
        // SAFETY: the dispatcher is generated for `F`.
        Self::from_raw(unsafe { RawFunction::new(f, dispatch_ref::<F, Args, R>()) })
    }

    /// Drops the held callable, if any, then stores `f`.
    pub fn set<F>(&mut self, f: F)
    where
        F: CallRef<Args, Output = R> + CallableMarkerFor<T> + 'a,
    {
        self.reset();
        *self = Self::new(f);
    }

    /// Calls the held callable with the arguments packed in `args`.
    ///
    /// # Panics
    ///
    /// Panics if the wrapper is empty.
    #[inline]
    pub fn call_with(&self, args: Args) -> R {
        match self.try_call_with(args) {
            Ok(ret) => ret,
            Err(err) => panic!("{}", err),
        }
    }

    /// Calls the held callable with the arguments packed in `args`, or returns
    /// [`BadFunctionCall`] if the wrapper is empty.
    #[inline]
    pub fn try_call_with(&self, args: Args) -> Result<R, BadFunctionCall> {
        // SAFETY: `UniqueFn` only holds `dispatch_ref` dispatchers.
        unsafe { self.raw.try_invoke(args) }
    }

    /// Calls the held callable without checking for emptiness.
    ///
    /// # Safety
    ///
    /// The wrapper must not be empty (see [`is_some`](Self::is_some)).
    #[inline]
    pub unsafe fn call_unchecked_with(&self, args: Args) -> R {
        self.raw.invoke_unchecked(args)
    }
}

impl<'a, Args, R, T> From<UniqueFn<'a, Args, R, T>> for UniqueFnMut<'a, Args, R, T> {
    fn from(f: UniqueFn<'a, Args, R, T>) -> Self {
        Self::from_raw(f.raw)
    }
}

macro_rules! impl_call {
    ($count:expr $(, $ty:ident $var:ident $num:tt)*) => {
        impl<'a, R, T, $($ty,)*> UniqueFnMut<'a, ($($ty,)*), R, T> {
            /// Calls the held callable.
            ///
            /// # Panics
            ///
            /// Panics if the wrapper is empty.
            #[inline]
            pub fn call(&mut self, $($var: $ty),*) -> R {
                self.call_with(($($var,)*))
            }

            /// Calls the held callable, or returns [`BadFunctionCall`] if the
            /// wrapper is empty.
            #[inline]
            pub fn try_call(&mut self, $($var: $ty),*) -> Result<R, BadFunctionCall> {
                self.try_call_with(($($var,)*))
            }
        }

        impl<'a, R, T, $($ty,)*> UniqueFn<'a, ($($ty,)*), R, T> {
            /// Calls the held callable.
            ///
            /// # Panics
            ///
            /// Panics if the wrapper is empty.
            #[inline]
            pub fn call(&self, $($var: $ty),*) -> R {
                self.call_with(($($var,)*))
            }

            /// Calls the held callable, or returns [`BadFunctionCall`] if the
            /// wrapper is empty.
            #[inline]
            pub fn try_call(&self, $($var: $ty),*) -> Result<R, BadFunctionCall> {
                self.try_call_with(($($var,)*))
            }
        }
    };
}

repeat_macro!(impl_call);

#[cfg(test)]
mod tests {
    use {
        super::*,
        crate::markers::Sendable,
        std::{
            cell::{Cell, RefCell},
            panic::{self, AssertUnwindSafe},
            rc::Rc,
            thread,
        },
    };

    /// Bumps the counter when called and when dropped.
    struct Small<'c> {
        counter: &'c Cell<i32>,
    }

    impl<'c> Small<'c> {
        fn call(&mut self) {
            self.counter.set(self.counter.get() + 1);
        }
    }

    impl<'c> Drop for Small<'c> {
        fn drop(&mut self) {
            self.counter.set(self.counter.get() + 1);
        }
    }

    /// Same as `Small`, but too big to be stored inline.
    struct Large<'c> {
        counter: &'c Cell<i32>,
        _padding: [u8; 128],
    }

    impl<'c> Large<'c> {
        fn call(&mut self) {
            self.counter.set(self.counter.get() + 1);
        }
    }

    impl<'c> Drop for Large<'c> {
        fn drop(&mut self) {
            self.counter.set(self.counter.get() + 1);
        }
    }

    #[test]
    fn default_is_empty() {
        let mut f = UniqueFnMut::<(), ()>::default();

        assert!(f.is_none());
        assert!(!f.is_some());
        assert!(f == Empty);
        assert!(Empty == f);
        assert_eq!(f.placement(), None);
        assert_eq!(f.try_call(), Err(BadFunctionCall));
    }

    #[test]
    #[should_panic(expected = "tried to call an empty function")]
    fn call_empty() {
        let mut f = UniqueFnMut::<(), ()>::empty();
        f.call();
    }

    #[test]
    #[should_panic(expected = "tried to call an empty function")]
    fn call_empty_const() {
        let f = UniqueFn::<(u8,), u8>::empty();
        f.call(1);
    }

    #[test]
    fn captureless() {
        let mut f = UniqueFnMut::<(), i32>::new(|| 1);

        assert!(f.is_some());
        assert!(f != Empty);
        assert_eq!(f.call(), 1);
        assert_eq!(f.placement(), Some(Placement::Inline));
    }

    #[test]
    fn captures_by_value_and_by_reference() {
        let x = Cell::new(1);

        let by_value = x.get();
        let mut f = UniqueFnMut::<(), i32>::new(move || by_value);
        let mut g = UniqueFnMut::<(), i32>::new(|| x.get());

        assert_eq!(f.call(), 1);

        x.set(2);
        assert_eq!(f.call(), 1);
        assert_eq!(g.call(), 2);
    }

    #[test]
    fn move_leaves_source_empty() {
        let x = 1;
        let mut f = UniqueFnMut::<(), i32>::new(|| x);
        let mut g = f.take();

        assert!(f.is_none());
        assert!(g.is_some());
        assert_eq!(g.call(), x);
        assert_eq!(f.try_call(), Err(BadFunctionCall));
    }

    #[test]
    fn assign_taken_value_back() {
        let counter = Cell::new(0);
        let mut small = Small { counter: &counter };
        let mut f = UniqueFnMut::<(), ()>::new(move || small.call());

        let taken = f.take();
        f.assign(taken);
        assert!(f.is_some());
        assert_eq!(counter.get(), 0);

        f = f.take();
        f.call();
        assert!(f.is_some());
        assert_eq!(counter.get(), 1);

        let mut moved = f.take();
        f.assign_from(&mut moved);
        drop(moved);
        assert_eq!(counter.get(), 1);

        drop(f);
        assert_eq!(counter.get(), 2);
    }

    #[test]
    fn cleanup_runs_once() {
        let counter = Cell::new(1);

        {
            let mut small = Small { counter: &counter };
            let mut f = UniqueFnMut::<(), ()>::new(move || small.call());
            assert_eq!(f.placement(), Some(Placement::Inline));
            f.call();
        }
        assert_eq!(counter.get(), 3);

        {
            let mut large = Large {
                counter: &counter,
                _padding: [0; 128],
            };
            let mut f = UniqueFnMut::<(), ()>::new(move || large.call());
            assert_eq!(f.placement(), Some(Placement::Heap));
            f.call();
        }
        assert_eq!(counter.get(), 5);
    }

    #[test]
    fn cleanup_skips_moved_from() {
        let counter = Cell::new(0);

        for round in 0..2 {
            let before = counter.get();
            assert_eq!(before, round * 2);

            let mut large = Large {
                counter: &counter,
                _padding: [0; 128],
            };
            let mut small = Small { counter: &counter };

            let mut a = UniqueFnMut::<(), ()>::new(move || large.call());
            let mut b = UniqueFnMut::<(), ()>::new(move || small.call());

            let mut moved = a.take();
            for _ in 0..8 {
                moved = moved.take();
            }
            let other = b.take();

            drop(a);
            drop(b);
            assert_eq!(counter.get(), before);

            drop(moved);
            assert_eq!(counter.get(), before + 1);

            drop(other);
            assert_eq!(counter.get(), before + 2);
        }
    }

    #[test]
    fn assignment_destroys_old_before_installing_new() {
        let log = Rc::new(RefCell::new(Vec::new()));

        struct Logged(&'static str, Rc<RefCell<Vec<&'static str>>>);

        impl Drop for Logged {
            fn drop(&mut self) {
                self.1.borrow_mut().push(self.0);
            }
        }

        let old = Logged("old", log.clone());
        let mut destination = UniqueFnMut::<(), &'static str>::new(move || {
            let old = &old;
            old.0
        });

        let new = Logged("new", log.clone());
        let mut source = UniqueFnMut::<(), &'static str>::new(move || {
            let new = &new;
            new.0
        });

        destination.assign_from(&mut source);
        assert_eq!(*log.borrow(), ["old"]);
        assert!(source.is_none());
        assert_eq!(destination.call(), "new");

        let replacement = Logged("replacement", log.clone());
        destination.assign(UniqueFnMut::new(move || {
            let replacement = &replacement;
            replacement.0
        }));
        assert_eq!(*log.borrow(), ["old", "new"]);
        assert_eq!(destination.call(), "replacement");

        let last = Logged("last", log.clone());
        destination.set(move || {
            let last = &last;
            last.0
        });
        assert_eq!(*log.borrow(), ["old", "new", "replacement"]);

        drop(destination);
        assert_eq!(*log.borrow(), ["old", "new", "replacement", "last"]);
    }

    #[test]
    fn assign_empty_source_empties_destination() {
        let mut destination = UniqueFnMut::<(), u8>::new(|| 3);
        destination.assign(UniqueFnMut::empty());

        assert!(destination.is_none());
    }

    #[test]
    fn swap_round_trip() {
        let mut a = UniqueFnMut::<(), i32>::new(|| 1);
        let padding = [2u8; 64];
        let mut b = UniqueFnMut::<(), i32>::new(move || i32::from(padding[0]));

        assert_eq!(a.call(), 1);
        assert_eq!(b.call(), 2);

        a.swap(&mut b);
        assert_eq!(a.call(), 2);
        assert_eq!(b.call(), 1);
        assert_eq!(a.placement(), Some(Placement::Heap));

        swap(&mut a, &mut b);
        assert_eq!(a.call(), 1);
        assert_eq!(b.call(), 2);
        assert_eq!(a.placement(), Some(Placement::Inline));
    }

    #[test]
    fn swap_with_empty() {
        let mut a = UniqueFn::<(), i32>::new(|| 1);
        let mut b = UniqueFn::<(), i32>::empty();

        a.swap(&mut b);
        assert!(a.is_none());
        assert_eq!(b.call(), 1);
    }

    #[test]
    fn mutable_state_survives_moves() {
        let mut total = 0;
        let mut f = UniqueFnMut::<(i32,), i32>::new(move |x: i32| {
            total += x;
            total
        });

        assert_eq!(f.call(1), 1);

        let mut g = f.take();
        assert_eq!(g.call(2), 3);

        f.assign_from(&mut g);
        assert_eq!(f.call(3), 6);
    }

    #[test]
    fn multiple_arguments() {
        let f = UniqueFn::<(i32, i32, i32), i32>::new(|a: i32, b: i32, c: i32| a * b + c);

        assert_eq!(f.call(2, 3, 4), 10);
        assert_eq!(f.call_with((1, 1, 1)), 2);
        assert_eq!(f.try_call(0, 0, 7), Ok(7));
        assert_eq!(unsafe { f.call_unchecked_with((5, 5, 0)) }, 25);
    }

    #[test]
    fn borrowed_arguments() {
        let mut lengths = Vec::new();
        let mut f = UniqueFnMut::<(&str,), usize>::new(|s: &str| {
            lengths.push(s.len());
            lengths.len()
        });

        assert_eq!(f.call("a"), 1);
        assert_eq!(f.call("bcd"), 2);
        drop(f);

        assert_eq!(lengths, [1, 3]);
    }

    #[test]
    fn const_callable_with_interior_mutability() {
        let hits = Cell::new(0);
        let f = UniqueFn::<(), u32>::new(|| {
            hits.set(hits.get() + 1);
            hits.get()
        });

        assert_eq!(f.call(), 1);
        assert_eq!(f.call(), 2);
    }

    #[test]
    fn const_converts_into_mutable() {
        let offset = 40;
        let f = UniqueFn::<(i32,), i32>::new(move |x: i32| x + offset);
        let mut g: UniqueFnMut<(i32,), i32> = f.into();

        assert!(g.is_some());
        assert_eq!(g.call(2), 42);
    }

    #[test]
    fn panics_propagate_and_keep_the_wrapper_engaged() {
        let mut calls = 0;
        let mut f = UniqueFnMut::<(bool,), u32>::new(move |fail: bool| {
            calls += 1;
            if fail {
                panic!("callable failed");
            }
            calls
        });

        let result = panic::catch_unwind(AssertUnwindSafe(|| f.call(true)));
        let payload = result.expect_err("the call should panic");
        assert_eq!(payload.downcast_ref::<&str>(), Some(&"callable failed"));

        assert!(f.is_some());
        assert_eq!(f.call(false), 2);
    }

    #[test]
    fn debug_output() {
        let f = UniqueFnMut::<(), ()>::new(|| ());
        let g = UniqueFn::<(), ()>::empty();

        assert_eq!(format!("{:?}", f), "UniqueFnMut { placement: Some(Inline) }");
        assert_eq!(format!("{:?}", g), "UniqueFn { placement: None }");
    }

    #[test]
    fn sendable_round_trips_through_a_thread() {
        let mut total = 0u64;
        let mut f = UniqueFnMut::<(u64,), u64, Sendable>::new(move |x: u64| {
            total += x;
            total
        });
        assert_eq!(f.call(1), 1);

        let mut f = thread::spawn(move || {
            assert_eq!(f.call(2), 3);
            f
        })
        .join()
        .unwrap();
        assert_eq!(f.call(3), 6);

        let mut local: UniqueFnMut<(u64,), u64> = f.into_local();
        assert_eq!(local.call(4), 10);

        let shared = Rc::new(5u64);
        local.set(move |x: u64| x + *shared);
        assert_eq!(local.call(1), 6);
    }

    #[test]
    fn sendable_heap_callable_moves_between_threads() {
        let table = vec![2u32; 4];
        let padding = [0u8; 64];
        let f = UniqueFn::<(usize,), u32, Sendable>::new(move |i: usize| {
            table[i] + u32::from(padding[i])
        });
        assert_eq!(f.placement(), Some(Placement::Heap));

        let f: UniqueFnMut<(usize,), u32, Sendable> = f.into();
        let result = thread::spawn(move || {
            let mut f = f;
            f.call(3)
        })
        .join()
        .unwrap();

        assert_eq!(result, 2);
    }

    static_assertions::assert_not_impl_any!(UniqueFnMut<'static, (), ()>: Clone, Copy, Send, Sync);
    static_assertions::assert_not_impl_any!(UniqueFn<'static, (), ()>: Clone, Copy, Send, Sync);
    static_assertions::assert_impl_all!(UniqueFnMut<'static, (), (), Sendable>: Send);
    static_assertions::assert_impl_all!(UniqueFn<'static, (), (), Sendable>: Send);
    static_assertions::assert_not_impl_any!(UniqueFnMut<'static, (), (), Sendable>: Clone, Sync);
    static_assertions::assert_not_impl_any!(UniqueFn<'static, (), (), Sendable>: Clone, Sync);
}
