use {
    crate::{
        behavior::dispatch_once,
        error::BadFunctionCall,
        markers::{CallableMarkerFor, Local},
        raw::RawFunction,
        signature::CallOnce,
    },
    std::marker::PhantomData,
};

/// Move-only wrapper for a callable that may only be called once.
///
/// Calling consumes the held callable and leaves the wrapper empty; a second
/// call fails like a call on any empty wrapper. The callable is dropped by
/// its own invocation, so it is never dropped twice, even if it panics.
///
/// ```
/// use unique_function::UniqueFnOnce;
///
/// let name = String::from("once");
/// let mut f = UniqueFnOnce::<(), String>::new(move || name);
///
/// assert_eq!(f.call(), "once");
/// assert!(f.is_none());
/// assert!(f.try_call().is_err());
/// ```
pub struct UniqueFnOnce<'a, Args, R = (), T = Local> {
    raw: RawFunction<'a, Args, R>,
    _marker: PhantomData<T>,
}

impl_common!(UniqueFnOnce);

impl<'a, Args, R, T> UniqueFnOnce<'a, Args, R, T> {
    /// Creates a wrapper holding `f`.
    pub fn new<F>(f: F) -> Self
    where
        F: CallOnce<Args, Output = R> + CallableMarkerFor<T> + 'a,
    {
        // SAFETY: the dispatcher is generated for `F`.
        Self::from_raw(unsafe { RawFunction::new(f, dispatch_once::<F, Args, R>()) })
    }

    /// Drops the held callable, if any, then stores `f`.
    pub fn set<F>(&mut self, f: F)
    where
        F: CallOnce<Args, Output = R> + CallableMarkerFor<T> + 'a,
    {
        self.reset();
        *self = Self::new(f);
    }

    /// Calls the held callable with the arguments packed in `args`, consuming it.
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

    /// Calls the held callable with the arguments packed in `args`, consuming
    /// it, or returns [`BadFunctionCall`] if the wrapper is empty.
    #[inline]
    pub fn try_call_with(&mut self, args: Args) -> Result<R, BadFunctionCall> {
        // SAFETY: `UniqueFnOnce` only holds `dispatch_once` dispatchers.
        unsafe { self.raw.try_invoke_once(args) }
    }

    /// Calls the held callable, consuming the wrapper.
    ///
    /// # Panics
    ///
    /// Panics if the wrapper is empty.
    #[inline]
    pub fn call_once_with(mut self, args: Args) -> R {
        self.call_with(args)
    }
}

macro_rules! impl_call {
    ($count:expr $(, $ty:ident $var:ident $num:tt)*) => {
        impl<'a, R, T, $($ty,)*> UniqueFnOnce<'a, ($($ty,)*), R, T> {
            /// Calls the held callable, consuming it.
            ///
            /// # Panics
            ///
            /// Panics if the wrapper is empty.
            #[inline]
            pub fn call(&mut self, $($var: $ty),*) -> R {
                self.call_with(($($var,)*))
            }

            /// Calls the held callable, consuming it, or returns
            /// [`BadFunctionCall`] if the wrapper is empty.
            #[inline]
            pub fn try_call(&mut self, $($var: $ty),*) -> Result<R, BadFunctionCall> {
                self.try_call_with(($($var,)*))
            }
        }
    };
}

repeat_macro!(impl_call);
