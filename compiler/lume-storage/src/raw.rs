//! The unchecked pointer facility. A [RawPtr] has the same element
//! typing and address-space tagging as a checked [Ref], but carries no
//! lifetime and no mutability capability, which is exactly what makes
//! it usable as the vehicle for reinterpreting casts: there is no
//! tracking left at this level that a bitcast or a region retag could
//! violate.
//!
//! All conversions on a [RawPtr] preserve the numeric address of the
//! referent exactly, and none of them can fail. Only dereferencing is
//! `unsafe`, because at that point the caller is asserting liveness and
//! aliasing facts that this type does not track.
//!
//! [Ref]: crate::reference::Ref

use std::{fmt, ptr::NonNull};

use lume_target::address_space::AddressSpace;

use crate::reference::Ref;

/// An unchecked, address-space tagged pointer to a value of type `T`.
///
/// The `SPACE` parameter is the integral code of the [AddressSpace]
/// that the pointee lives in; it defaults to the generic space. The
/// pointer is non-null, trivially copyable and has no drop glue.
#[repr(transparent)]
pub struct RawPtr<T, const SPACE: u32 = 0> {
    ptr: NonNull<T>,
}

impl<T, const SPACE: u32> RawPtr<T, SPACE> {
    /// Create a [RawPtr] from a non-null pointer value.
    ///
    /// The caller is responsible for `ptr` actually pointing into the
    /// region denoted by `SPACE`; no runtime check is possible.
    #[inline]
    pub const fn new(ptr: NonNull<T>) -> Self {
        Self { ptr }
    }

    /// Create a [RawPtr] from a checked [Ref], dropping its lifetime
    /// and mutability tracking.
    #[inline]
    pub fn from_ref<const MUTABLE: bool>(reference: Ref<'_, T, MUTABLE, SPACE>) -> Self {
        Self { ptr: reference.as_non_null() }
    }

    /// Get the underlying non-null pointer value.
    #[inline]
    pub const fn as_non_null(self) -> NonNull<T> {
        self.ptr
    }

    /// Get the numeric address of the pointee.
    #[inline]
    pub fn addr(self) -> usize {
        self.ptr.as_ptr() as usize
    }

    /// Get the [AddressSpace] that this pointer is tagged with.
    #[inline]
    pub const fn space(self) -> AddressSpace {
        AddressSpace::from_code(SPACE)
    }

    /// Reinterpret the pointee as a value of type `U`, preserving the
    /// address exactly.
    ///
    /// This is a no-op at runtime. It is safe at the pointer level; the
    /// safety obligation (layout compatibility of `U` with the actual
    /// storage) only bites once the result is dereferenced.
    #[inline]
    pub const fn bitcast<U>(self) -> RawPtr<U, SPACE> {
        RawPtr { ptr: self.ptr.cast() }
    }

    /// Retag the pointer as pointing into a different address space,
    /// preserving the address exactly.
    ///
    /// This is a no-op at runtime. The caller is responsible for the
    /// new region being physically correct for the pointee.
    #[inline]
    pub const fn address_space_cast<const NEW_SPACE: u32>(self) -> RawPtr<T, NEW_SPACE> {
        RawPtr { ptr: self.ptr }
    }

    /// Dereference the pointer into a shared reference with an
    /// arbitrary caller-chosen lifetime.
    ///
    /// # Safety
    ///
    /// The pointee must be live, properly initialised and valid for
    /// reads for the whole of `'a`, and no mutable access to it may
    /// occur during `'a`.
    #[inline]
    pub unsafe fn as_ref<'a>(self) -> &'a T {
        // ##Safety: deferred to the caller, as per the contract above.
        unsafe { self.ptr.as_ref() }
    }

    /// Dereference the pointer into a mutable reference with an
    /// arbitrary caller-chosen lifetime.
    ///
    /// # Safety
    ///
    /// As [RawPtr::as_ref], and additionally no other reference to the
    /// pointee (shared or mutable) may exist during `'a`.
    #[inline]
    pub unsafe fn as_mut<'a>(self) -> &'a mut T {
        // ##Safety: deferred to the caller, as per the contract above.
        unsafe { &mut *self.ptr.as_ptr() }
    }

    /// Read the pointee by value.
    ///
    /// # Safety
    ///
    /// The pointee must be live, properly initialised and valid for
    /// reads; `T` must not be read out twice unless it is `Copy`.
    #[inline]
    pub unsafe fn read(self) -> T {
        // ##Safety: deferred to the caller, as per the contract above.
        unsafe { self.ptr.as_ptr().read() }
    }

    /// Overwrite the pointee with `value`, dropping nothing.
    ///
    /// # Safety
    ///
    /// The pointee must be live and valid for writes, and no other
    /// access to it may be in progress.
    #[inline]
    pub unsafe fn write(self, value: T) {
        // ##Safety: deferred to the caller, as per the contract above.
        unsafe { self.ptr.as_ptr().write(value) }
    }
}

// Manual implementations, since deriving them would spuriously require
// `T: Copy`/`T: Clone`.
impl<T, const SPACE: u32> Clone for RawPtr<T, SPACE> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<T, const SPACE: u32> Copy for RawPtr<T, SPACE> {}

impl<T, const SPACE: u32> PartialEq for RawPtr<T, SPACE> {
    /// Pointers compare by address, not by pointee.
    fn eq(&self, other: &Self) -> bool {
        self.ptr == other.ptr
    }
}

impl<T, const SPACE: u32> Eq for RawPtr<T, SPACE> {}

impl<T, const SPACE: u32> fmt::Debug for RawPtr<T, SPACE> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "rawptr[addr={:p}, space={}]", self.ptr, self.space())
    }
}

impl<T, const SPACE: u32> fmt::Pointer for RawPtr<T, SPACE> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Pointer::fmt(&self.ptr, f)
    }
}
