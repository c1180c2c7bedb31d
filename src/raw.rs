use {
    crate::{
        behavior::{CallFrame, Dispatch, Operation},
        error::BadFunctionCall,
        storage::{Placement, Storage, INLINE_WORDS},
    },
    static_assertions::assert_eq_size,
    std::{
        cell::UnsafeCell,
        marker::PhantomData,
        mem::{self, MaybeUninit},
        ptr::{self, NonNull},
    },
};

/// Storage plus the dispatcher of the callable it holds.
///
/// Shared core of the public wrappers, which decide how the callable is
/// invoked by choosing the dispatcher and the receiver of their `call`.
///
/// # Safety Invariant
///
/// `dispatch` is `None` iff `storage` holds no live value. When it is `Some`,
/// it was generated for the type emplaced into `storage`.
pub(crate) struct RawFunction<'a, Args, R> {
    storage: UnsafeCell<Storage>,
    dispatch: Option<Dispatch>,
    _marker: PhantomData<(&'a (), fn(Args) -> R)>,
}

assert_eq_size!(RawFunction<'static, (), ()>, [*mut (); INLINE_WORDS + 1]);

impl<'a, Args, R> RawFunction<'a, Args, R> {
    pub(crate) const fn empty() -> Self {
        Self {
            storage: UnsafeCell::new(Storage::uninit()),
            dispatch: None,
            _marker: PhantomData,
        }
    }

    /// # Safety
    ///
    /// `dispatch` must have been generated for `F`, with the same `Args` and `R`.
    pub(crate) unsafe fn new<F: 'a>(f: F, dispatch: Dispatch) -> Self {
        let mut result = Self::empty();
        result.storage.get_mut().emplace(f);
        result.dispatch = Some(dispatch);
        result
    }

    pub(crate) fn is_some(&self) -> bool {
        self.dispatch.is_some()
    }

    pub(crate) fn placement(&self) -> Option<Placement> {
        let dispatch = self.dispatch?;
        let mut placement = MaybeUninit::<Placement>::uninit();

        // SAFETY: `dispatch` matches the stored value and `Locate` writes a `Placement`.
        unsafe {
            dispatch(
                Operation::Locate,
                self.storage_ptr(),
                placement.as_mut_ptr() as *mut (),
            );

            Some(placement.assume_init())
        }
    }

    /// Destroys the held value, if any. The wrapper is empty afterwards.
    pub(crate) fn reset(&mut self) {
        // Cleared first: a panicking destructor must not be run again by `Drop`.
        if let Some(dispatch) = self.dispatch.take() {
            // SAFETY: `dispatch` matches the stored value, which is dead afterwards.
            unsafe {
                dispatch(Operation::Destroy, self.storage_ptr(), ptr::null_mut());
            }
        }
    }

    /// Move-assignment. Destroys the held value, then moves `source`'s value
    /// in. `source` is empty afterwards.
    pub(crate) fn assign_from(&mut self, source: &mut Self) {
        self.reset();

        if let Some(dispatch) = source.dispatch.take() {
            // SAFETY: `dispatch` matches the value in `source`, which is
            // logically empty afterwards; `self` was emptied above and the two
            // storages are distinct objects.
            unsafe {
                dispatch(
                    Operation::Relocate,
                    source.storage_ptr(),
                    self.storage_ptr().as_ptr() as *mut (),
                );
            }

            self.dispatch = Some(dispatch);
        }
    }

    /// Move-construction. `self` is empty afterwards.
    pub(crate) fn take(&mut self) -> Self {
        let mut result = Self::empty();
        result.assign_from(self);
        result
    }

    pub(crate) fn swap(&mut self, other: &mut Self) {
        mem::swap(self, other);
    }

    /// Calls the held value.
    ///
    /// # Safety
    ///
    /// The wrapper must not be empty. The dispatcher must be valid to invoke
    /// through the receiver the calling wrapper exposes: `&self` callers must
    /// hold a dispatcher from `dispatch_ref`.
    pub(crate) unsafe fn invoke_unchecked(&self, args: Args) -> R {
        debug_assert!(self.is_some(), "tried to call an empty function");

        let dispatch = match self.dispatch {
            Some(dispatch) => dispatch,
            None => std::hint::unreachable_unchecked(),
        };

        let mut frame = CallFrame::new(args);

        dispatch(
            Operation::Invoke,
            self.storage_ptr(),
            &mut frame as *mut CallFrame<Args, R> as *mut (),
        );

        frame.into_ret()
    }

    /// Calls the held value, or fails if there is none.
    ///
    /// # Safety
    ///
    /// As for [`invoke_unchecked`](Self::invoke_unchecked), minus emptiness.
    pub(crate) unsafe fn try_invoke(&self, args: Args) -> Result<R, BadFunctionCall> {
        if self.is_some() {
            Ok(self.invoke_unchecked(args))
        } else {
            Err(BadFunctionCall)
        }
    }

    /// Calls the held value, consuming it. The wrapper is empty afterwards,
    /// even if the call panics.
    ///
    /// # Safety
    ///
    /// The dispatcher must come from `dispatch_once`.
    pub(crate) unsafe fn try_invoke_once(&mut self, args: Args) -> Result<R, BadFunctionCall> {
        let dispatch = self.dispatch.take().ok_or(BadFunctionCall)?;
        let mut frame = CallFrame::new(args);

        dispatch(
            Operation::Invoke,
            self.storage_ptr(),
            &mut frame as *mut CallFrame<Args, R> as *mut (),
        );

        Ok(frame.into_ret())
    }

    fn storage_ptr(&self) -> NonNull<Storage> {
        // SAFETY: `UnsafeCell::get` never returns null.
        unsafe { NonNull::new_unchecked(self.storage.get()) }
    }
}

impl<'a, Args, R> Drop for RawFunction<'a, Args, R> {
    fn drop(&mut self) {
        self.reset();
    }
}
