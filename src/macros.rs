/// Calls the given macro once per supported arity, with the argument type,
/// binding name and tuple index of every argument.
macro_rules! repeat_macro {
    ($macro:ident) => {
        $macro!(0);
        $macro!(1, A a 0);
        $macro!(2, A a 0, B b 1);
        $macro!(3, A a 0, B b 1, C c 2);
        $macro!(4, A a 0, B b 1, C c 2, D d 3);
        $macro!(5, A a 0, B b 1, C c 2, D d 3, E e 4);
        $macro!(6, A a 0, B b 1, C c 2, D d 3, E e 4, F f 5);
        $macro!(7, A a 0, B b 1, C c 2, D d 3, E e 4, F f 5, G g 6);
        $macro!(8, A a 0, B b 1, C c 2, D d 3, E e 4, F f 5, G g 6, H h 7);
    };
}

/// Emits a `tracing` event at trace level when the `tracing` feature is enabled.
macro_rules! trace {
    ($($tt:tt)*) => {
        #[cfg(feature = "tracing")]
        {
            tracing::trace!($($tt)*);
        }
    };
}

/// Inherent and trait impls shared by the wrapper types, which all hold a
/// single `raw: RawFunction<'a, Args, R>` field plus a `PhantomData` of their
/// thread-safety marker.
macro_rules! impl_common {
    ($name:ident) => {
        impl<'a, Args, R, T> $name<'a, Args, R, T> {
            const fn from_raw(raw: $crate::raw::RawFunction<'a, Args, R>) -> Self {
                Self {
                    raw,
                    _marker: ::std::marker::PhantomData,
                }
            }

            /// Creates an empty wrapper.
            pub const fn empty() -> Self {
                Self::from_raw($crate::raw::RawFunction::empty())
            }

            /// Returns `true` if the wrapper holds a callable.
            pub fn is_some(&self) -> bool {
                self.raw.is_some()
            }

            /// Returns `true` if the wrapper is empty.
            pub fn is_none(&self) -> bool {
                !self.raw.is_some()
            }

            /// Returns where the held callable lives, or `None` if the wrapper is empty.
            pub fn placement(&self) -> Option<$crate::Placement> {
                self.raw.placement()
            }

            /// Moves the held callable into a new wrapper, leaving `self` empty.
            ///
            /// The callable is not dropped, and a heap-stored callable is not
            /// reallocated.
            pub fn take(&mut self) -> Self {
                Self::from_raw(self.raw.take())
            }

            /// Replaces the held callable with the one held by `other`.
            ///
            /// The current callable, if any, is dropped before the new one is
            /// moved in.
            pub fn assign(&mut self, mut other: Self) {
                self.raw.assign_from(&mut other.raw);
            }

            /// Like [`assign`](Self::assign), but leaves `source` empty instead
            /// of consuming it.
            pub fn assign_from(&mut self, source: &mut Self) {
                self.raw.assign_from(&mut source.raw);
            }

            /// Drops the held callable, if any.
            pub fn reset(&mut self) {
                self.raw.reset();
            }

            /// Exchanges the callables held by `self` and `other`.
            pub fn swap(&mut self, other: &mut Self) {
                self.raw.swap(&mut other.raw);
            }
        }

        impl<'a, Args, R> $name<'a, Args, R, $crate::markers::Sendable> {
            /// Gives up the ability to be sent to another thread.
            pub fn into_local(self) -> $name<'a, Args, R, $crate::markers::Local> {
                $name::from_raw(self.raw)
            }
        }

        // SAFETY: a wrapper marked `Sendable` only ever holds callables that
        // are `Send`; `new` and `set` require `F: CallableMarkerFor<Sendable>`.
        // Arguments and results are never stored, so `Args` and `R` do not
        // cross threads through the wrapper.
        unsafe impl<'a, Args, R> Send for $name<'a, Args, R, $crate::markers::Sendable> {}

        impl<'a, Args, R, T> Default for $name<'a, Args, R, T> {
            fn default() -> Self {
                Self::empty()
            }
        }

        impl<'a, Args, R, T> ::std::fmt::Debug for $name<'a, Args, R, T> {
            fn fmt(&self, f: &mut ::std::fmt::Formatter<'_>) -> ::std::fmt::Result {
                f.debug_struct(stringify!($name))
                    .field("placement", &self.placement())
                    .finish()
            }
        }

        impl<'a, Args, R, T> PartialEq<$crate::Empty> for $name<'a, Args, R, T> {
            fn eq(&self, _: &$crate::Empty) -> bool {
                self.is_none()
            }
        }

        impl<'a, Args, R, T> PartialEq<$name<'a, Args, R, T>> for $crate::Empty {
            fn eq(&self, other: &$name<'a, Args, R, T>) -> bool {
                other.is_none()
            }
        }

        impl<'a, Args, R, T> $crate::function::sealed::Sealed for $name<'a, Args, R, T> {}

        impl<'a, Args, R, T> $crate::UniqueCallable for $name<'a, Args, R, T> {
            fn is_some(&self) -> bool {
                $name::is_some(self)
            }

            fn placement(&self) -> Option<$crate::Placement> {
                $name::placement(self)
            }

            fn take(&mut self) -> Self {
                $name::take(self)
            }

            fn reset(&mut self) {
                $name::reset(self)
            }

            fn swap(&mut self, other: &mut Self) {
                $name::swap(self, other)
            }
        }
    };
}
