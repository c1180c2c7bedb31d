//! Type-erased dispatch for stored callables.
//!
//! Every engaged wrapper carries a single [`Dispatch`] function pointer next to
//! its [`Storage`]. The pointer is obtained by instantiating one of
//! [`dispatch_ref`], [`dispatch_mut`] or [`dispatch_once`] with the concrete
//! callable type, so the concrete type is known inside the dispatcher and
//! nowhere else. Callers select the operation with an [`Operation`] and pass
//! its operand through an opaque pointer.
//!
//! # Safety Invariant
//!
//! A wrapper only ever pairs a dispatcher with the storage the same callable
//! type was emplaced into, and only ever passes the operand type documented
//! on the [`Operation`] variant.

use {
    crate::{
        signature::{CallMut, CallOnce, CallRef},
        storage::{Placement, Storage},
    },
    std::{
        marker::PhantomData,
        mem::{ManuallyDrop, MaybeUninit},
        ptr::{self, NonNull},
    },
};

/// Type-erased dispatcher of a stored callable.
///
/// The second argument is the storage holding the callable; the meaning of
/// the third one depends on the [`Operation`].
pub(crate) type Dispatch = unsafe fn(Operation, NonNull<Storage>, *mut ());

/// Operations supported by every dispatcher.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub(crate) enum Operation {
    /// Calls the stored value.
    /// Operand: `*mut CallFrame<Args, R>` with the arguments filled in.
    /// Dispatchers made by [`dispatch_once`] also destroy the value.
    Invoke,
    /// Drops the stored value and frees its heap allocation, if any.
    /// Operand: unused.
    Destroy,
    /// Moves the stored value into another, empty storage.
    /// Operand: `*mut Storage`, the destination.
    Relocate,
    /// Reports where the stored value lives.
    /// Operand: `*mut Placement`.
    Locate,
}

/// Arguments in, result out.
pub(crate) struct CallFrame<Args, R> {
    args: ManuallyDrop<Args>,
    ret: MaybeUninit<R>,
}

impl<Args, R> CallFrame<Args, R> {
    pub(crate) fn new(args: Args) -> Self {
        Self {
            args: ManuallyDrop::new(args),
            ret: MaybeUninit::uninit(),
        }
    }

    /// # Safety
    ///
    /// Must be called at most once, and only by a dispatcher.
    unsafe fn take_args(&mut self) -> Args {
        ManuallyDrop::take(&mut self.args)
    }

    fn set_ret(&mut self, ret: R) {
        self.ret.write(ret);
    }

    /// # Safety
    ///
    /// The frame must have been passed to a successful [`Operation::Invoke`].
    pub(crate) unsafe fn into_ret(self) -> R {
        self.ret.assume_init()
    }
}

/// How [`Operation::Invoke`] reaches the stored value.
trait Invoke<F, Args, R> {
    /// # Safety
    ///
    /// `storage` holds a live `F`; `frame` points to a filled [`CallFrame`].
    unsafe fn invoke(storage: NonNull<Storage>, frame: *mut CallFrame<Args, R>);
}

struct ByRef<F>(PhantomData<F>);
struct ByMut<F>(PhantomData<F>);
struct ByValue<F>(PhantomData<F>);

impl<F: CallRef<Args, Output = R>, Args, R> Invoke<F, Args, R> for ByRef<F> {
    #[inline]
    unsafe fn invoke(storage: NonNull<Storage>, frame: *mut CallFrame<Args, R>) {
        let frame = &mut *frame;
        let f = &*Storage::locate::<F>(storage);

        let args = frame.take_args();
        frame.set_ret(f.call_ref(args));
    }
}

impl<F: CallMut<Args, Output = R>, Args, R> Invoke<F, Args, R> for ByMut<F> {
    #[inline]
    unsafe fn invoke(storage: NonNull<Storage>, frame: *mut CallFrame<Args, R>) {
        let frame = &mut *frame;
        let f = &mut *Storage::locate::<F>(storage);

        let args = frame.take_args();
        frame.set_ret(f.call_mut(args));
    }
}

impl<F: CallOnce<Args, Output = R>, Args, R> Invoke<F, Args, R> for ByValue<F> {
    #[inline]
    unsafe fn invoke(storage: NonNull<Storage>, frame: *mut CallFrame<Args, R>) {
        let frame = &mut *frame;
        // Storage is logically empty from here on, even if the call panics.
        let f = Storage::take::<F>(storage);

        let args = frame.take_args();
        frame.set_ret(f.call_once(args));
    }
}

#[inline]
unsafe fn dispatch<F, Args, R, I: Invoke<F, Args, R>>(
    operation: Operation,
    storage: NonNull<Storage>,
    operand: *mut (),
) {
    match operation {
        Operation::Invoke => I::invoke(storage, operand as *mut CallFrame<Args, R>),
        Operation::Destroy => Storage::destroy::<F>(storage),
        Operation::Relocate => {
            trace!(placement = ?Storage::placement_of::<F>(), "relocating callable");

            Storage::relocate::<F>(storage, NonNull::new_unchecked(operand as *mut Storage))
        }
        Operation::Locate => ptr::write(operand as *mut Placement, Storage::placement_of::<F>()),
    }
}

/// Dispatcher for a callable invoked through `&F`.
pub(crate) fn dispatch_ref<F: CallRef<Args, Output = R>, Args, R>() -> Dispatch {
    dispatch::<F, Args, R, ByRef<F>>
}

/// Dispatcher for a callable invoked through `&mut F`.
pub(crate) fn dispatch_mut<F: CallMut<Args, Output = R>, Args, R>() -> Dispatch {
    dispatch::<F, Args, R, ByMut<F>>
}

/// Dispatcher for a callable consumed by its only invocation.
pub(crate) fn dispatch_once<F: CallOnce<Args, Output = R>, Args, R>() -> Dispatch {
    dispatch::<F, Args, R, ByValue<F>>
}
