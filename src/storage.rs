use {
    static_assertions::{assert_eq_align, assert_eq_size, const_assert},
    std::{
        mem::{self, MaybeUninit},
        ptr::{self, NonNull},
    },
};

/// Number of bytes available for storing a callable inside the wrapper itself.
///
/// Callables larger than this are stored on the heap.
pub const INLINE_SIZE: usize = 32;

/// Maximum alignment of a callable stored inside the wrapper itself.
///
/// Equal to the alignment of a pointer. Callables with stricter alignment
/// requirements are stored on the heap.
pub const INLINE_ALIGN: usize = mem::align_of::<*mut ()>();

pub(crate) const INLINE_WORDS: usize = INLINE_SIZE / mem::size_of::<*mut ()>();

const_assert!(INLINE_SIZE % mem::size_of::<*mut ()>() == 0);

/// Where a stored callable lives.
#[derive(Clone, Copy, PartialEq, Eq, Debug, Hash)]
pub enum Placement {
    /// In the wrapper's inline buffer; no heap allocation.
    Inline,
    /// In a single heap allocation owned by the wrapper.
    Heap,
}

/// Returns `true` if a callable of type `T` is stored inline.
///
/// Every Rust move is a bitwise copy that cannot fail, so size and alignment
/// are the only criteria.
pub const fn fits_inline<T>() -> bool {
    mem::size_of::<T>() <= INLINE_SIZE && mem::align_of::<T>() <= INLINE_ALIGN
}

/// Inline buffer, pointer-aligned.
#[repr(C)]
#[derive(Clone, Copy)] // `Copy` needed for union storage.
struct InlineStorage([MaybeUninit<*mut ()>; INLINE_WORDS]);

/// Callable storage. Inline or heap.
///
/// The tag is never stored: which field is active is a property of the stored
/// type, known only to the dispatcher generated for it.
#[repr(C)]
pub(crate) union Storage {
    inline: InlineStorage,
    heap: *mut (),
}

assert_eq_size!(Storage, [*mut (); INLINE_WORDS]);
assert_eq_align!(Storage, *mut ());

impl Storage {
    pub(crate) const fn uninit() -> Self {
        Self {
            inline: InlineStorage([MaybeUninit::uninit(); INLINE_WORDS]),
        }
    }

    pub(crate) const fn placement_of<T>() -> Placement {
        if fits_inline::<T>() {
            Placement::Inline
        } else {
            Placement::Heap
        }
    }

    /// Moves `value` into the storage, allocating if it does not fit inline.
    ///
    /// # Safety
    ///
    /// The storage must not hold a live value.
    pub(crate) unsafe fn emplace<T>(&mut self, value: T) {
        if fits_inline::<T>() {
            ptr::write(self.inline.0.as_mut_ptr() as *mut T, value);
        } else {
            trace!(
                size = mem::size_of::<T>(),
                align = mem::align_of::<T>(),
                "callable does not fit inline, moving it to the heap"
            );

            self.heap = Box::into_raw(Box::new(value)) as *mut ();
        }
    }

    /// Returns a pointer to the stored `T`.
    ///
    /// # Safety
    ///
    /// `this` must point to a storage holding a live `T`.
    pub(crate) unsafe fn locate<T>(this: NonNull<Self>) -> *mut T {
        if fits_inline::<T>() {
            ptr::addr_of_mut!((*this.as_ptr()).inline) as *mut T
        } else {
            (*this.as_ptr()).heap as *mut T
        }
    }

    /// Drops the stored `T`, freeing its heap allocation if it has one.
    ///
    /// # Safety
    ///
    /// `this` must point to a storage holding a live `T`, which is dead
    /// afterwards.
    pub(crate) unsafe fn destroy<T>(this: NonNull<Self>) {
        let value = Self::locate::<T>(this);

        if fits_inline::<T>() {
            ptr::drop_in_place(value);
        } else {
            drop(Box::from_raw(value));
        }
    }

    /// Moves the stored `T` out, freeing its heap allocation if it has one.
    ///
    /// # Safety
    ///
    /// `this` must point to a storage holding a live `T`, which is dead
    /// afterwards.
    pub(crate) unsafe fn take<T>(this: NonNull<Self>) -> T {
        let value = Self::locate::<T>(this);

        if fits_inline::<T>() {
            ptr::read(value)
        } else {
            *Box::from_raw(value)
        }
    }

    /// Moves the stored `T` from `from` to `to`.
    ///
    /// Inline values are copied byte-wise; heap values only hand over the
    /// pointer.
    ///
    /// # Safety
    ///
    /// `from` must hold a live `T` and is logically empty afterwards. `to`
    /// must not hold a live value and must not overlap `from`.
    pub(crate) unsafe fn relocate<T>(from: NonNull<Self>, to: NonNull<Self>) {
        if fits_inline::<T>() {
            ptr::copy_nonoverlapping(Self::locate::<T>(from), Self::locate::<T>(to), 1);
        } else {
            (*to.as_ptr()).heap = (*from.as_ptr()).heap;
            (*from.as_ptr()).heap = ptr::null_mut();
        }
    }
}
