//! Call signatures of the stored callables.
//!
//! Rust has no variadic generics, so the wrappers name their argument list as
//! a tuple: a `UniqueFnMut<'_, (i32, &str), bool>` stores something callable
//! as `FnMut(i32, &str) -> bool`. The traits below connect the tuple form to
//! the closure traits for every arity up to eight.
//!
//! A tuple names one concrete type, so a reference argument carries one
//! lifetime fixed by the wrapper's type, where `FnMut(&str) -> bool` would be
//! callable with any lifetime. Arguments borrowed from a shorter-lived local
//! are rejected at the call site.
//!
//! They are implemented for all `Fn`, `FnMut` and `FnOnce` types and are not
//! meant to be implemented by hand.

/// A callable that can be invoked through a shared reference.
pub trait CallRef<Args> {
    /// The value returned by the call.
    type Output;

    /// Calls `self` with the arguments unpacked from the `args` tuple.
    fn call_ref(&self, args: Args) -> Self::Output;
}

/// A callable that can be invoked through a mutable reference.
pub trait CallMut<Args> {
    /// The value returned by the call.
    type Output;

    /// Calls `self` with the arguments unpacked from the `args` tuple.
    fn call_mut(&mut self, args: Args) -> Self::Output;
}

/// A callable that can be invoked once, by value.
pub trait CallOnce<Args> {
    /// The value returned by the call.
    type Output;

    /// Calls `self` with the arguments unpacked from the `args` tuple.
    fn call_once(self, args: Args) -> Self::Output;
}

macro_rules! impl_call {
    ($count:expr $(, $ty:ident $var:ident $num:tt)*) => {
        impl<Func, Return, $($ty,)*> CallRef<($($ty,)*)> for Func
        where
            Func: Fn($($ty,)*) -> Return,
        {
            type Output = Return;

            #[inline]
            fn call_ref(&self, ($($var,)*): ($($ty,)*)) -> Return {
                self($($var,)*)
            }
        }

        impl<Func, Return, $($ty,)*> CallMut<($($ty,)*)> for Func
        where
            Func: FnMut($($ty,)*) -> Return,
        {
            type Output = Return;

            #[inline]
            fn call_mut(&mut self, ($($var,)*): ($($ty,)*)) -> Return {
                self($($var,)*)
            }
        }

        impl<Func, Return, $($ty,)*> CallOnce<($($ty,)*)> for Func
        where
            Func: FnOnce($($ty,)*) -> Return,
        {
            type Output = Return;

            #[inline]
            fn call_once(self, ($($var,)*): ($($ty,)*)) -> Return {
                self($($var,)*)
            }
        }
    };
}

repeat_macro!(impl_call);
