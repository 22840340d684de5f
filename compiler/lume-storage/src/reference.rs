//! The checked reference type. A [Ref] is a non-null handle to a
//! storage location which tracks, entirely at the type level:
//!
//! - the element type `T` of the storage,
//! - whether the handle is allowed to write through (`MUTABLE`),
//! - the lifetime `'a` for which the referent is guaranteed live,
//! - the address space that the storage lives in (`SPACE`).
//!
//! None of this has a runtime representation: a [Ref] is a single
//! machine pointer, trivially copyable, with no drop glue. The
//! mutability and aliasing *discipline* is enforced by the surrounding
//! type checker, not here; this type only guarantees that the
//! capability and lifetime it was created with are carried faithfully
//! through every derived reference.
//!
//! Reinterpreting casts ([Ref::bitcast] and [Ref::address_space_cast])
//! cannot be expressed within the checked type, because the checked
//! type carries tracking that the cast would have to forge. They route
//! through the unchecked [RawPtr] facility instead, where no such
//! tracking exists, and rebuild a checked reference at a single
//! audited point ([Ref::wrap]). Every safety-relevant reinterpretation
//! in the compiler therefore passes through that one narrow bridge.

use std::{fmt, marker::PhantomData, ops::Deref, ptr::NonNull};

use lume_target::address_space::AddressSpace;

use crate::{legacy::LegacyPtr, raw::RawPtr};

/// A non-null, zero-cost reference to a value of type `T`, with a
/// compile-time mutability capability, lifetime bound and address
/// space tag.
///
/// `SPACE` is the integral code of the [AddressSpace] the referent
/// lives in, defaulting to the generic space. See the module docs for
/// the overall contract.
pub struct Ref<'a, T, const MUTABLE: bool, const SPACE: u32 = 0> {
    ptr: NonNull<T>,

    /// Ties the handle to the lifetime of the referent. Zero-sized.
    _life: PhantomData<&'a T>,
}

/// A [Ref] without the capability to write through it.
pub type ImmutRef<'a, T, const SPACE: u32 = 0> = Ref<'a, T, false, SPACE>;

/// A [Ref] that permits writing through it.
pub type MutRef<'a, T, const SPACE: u32 = 0> = Ref<'a, T, true, SPACE>;

impl<'a, T, const MUTABLE: bool, const SPACE: u32> Ref<'a, T, MUTABLE, SPACE> {
    /// Wrap a raw pointer value into a checked reference. This is the
    /// trusted boundary between unchecked storage and the checked
    /// reference abstraction, and the single point at which the cast
    /// operations rebuild their results.
    ///
    /// # Safety
    ///
    /// The caller must guarantee that:
    ///
    /// - the pointee is live, initialised, and remains valid for the
    ///   whole of `'a`,
    /// - the storage really lives in the address space denoted by
    ///   `SPACE`,
    /// - if `MUTABLE` is `true`, the underlying storage is genuinely
    ///   writable and the surrounding checker has established that the
    ///   handle has exclusive access for writes.
    ///
    /// None of these are checked at runtime; violating them is
    /// undefined behaviour, not a reported error.
    #[inline]
    pub unsafe fn wrap(ptr: NonNull<T>) -> Self {
        debug_assert!(ptr.as_ptr().is_aligned(), "wrapped a misaligned pointer");

        Self { ptr, _life: PhantomData }
    }

    /// Get the underlying raw reference value, for consumption by
    /// lower-level facilities (e.g. subscript resolution during
    /// lowering). Always succeeds.
    #[inline]
    pub fn get(self) -> &'a T {
        // ##Safety: `wrap`'s caller asserted that the referent is live
        // and readable for the whole of `'a`.
        unsafe { self.ptr.as_ref() }
    }

    /// Get the underlying non-null pointer value.
    #[inline]
    pub const fn as_non_null(self) -> NonNull<T> {
        self.ptr
    }

    /// Get the numeric address of the referent.
    #[inline]
    pub fn addr(self) -> usize {
        self.ptr.as_ptr() as usize
    }

    /// Get the [AddressSpace] that the referent lives in.
    #[inline]
    pub const fn space(self) -> AddressSpace {
        AddressSpace::from_code(SPACE)
    }

    /// Whether this handle carries the capability to write through.
    #[inline]
    pub const fn is_mutable(self) -> bool {
        MUTABLE
    }

    /// Convert this reference into the modern unchecked pointer,
    /// dropping lifetime and mutability tracking.
    ///
    /// This is a documented escape hatch: from here on, liveness and
    /// aliasing are the caller's responsibility.
    #[inline]
    pub fn to_raw_ptr(self) -> RawPtr<T, SPACE> {
        RawPtr::from_ref(self)
    }

    /// Convert this reference into the legacy unchecked pointer, with
    /// the same drop-of-tracking contract as [Ref::to_raw_ptr]. Kept
    /// for backward interop only.
    #[inline]
    pub fn to_legacy_ptr(self) -> LegacyPtr<T, SPACE> {
        LegacyPtr::from_ref(self)
    }

    /// Reinterpret the referenced storage as holding a value of type
    /// `U` instead of `T`. The address, mutability capability,
    /// lifetime and address space are all unchanged.
    ///
    /// The reinterpretation is routed through [RawPtr], where no
    /// lifetime or mutability tracking exists to violate, and the
    /// result is rebuilt through [Ref::wrap].
    ///
    /// # Safety
    ///
    /// `U` must be layout-compatible with the actual storage at this
    /// location; no layout check is performed here.
    #[inline]
    pub unsafe fn bitcast<U>(self) -> Ref<'a, U, MUTABLE, SPACE> {
        // ##Safety: the address is unchanged, so liveness for `'a`, the
        // region and the mutability capability all carry over from
        // `self`; layout compatibility is the caller's obligation.
        unsafe { Ref::wrap(self.to_raw_ptr().bitcast::<U>().as_non_null()) }
    }

    /// Reinterpret this reference as pointing into a different address
    /// space. The address, element type, mutability capability and
    /// lifetime are all unchanged.
    ///
    /// Typically used to widen a region-specific reference (e.g. one
    /// into shared memory) to the generic space before passing it to
    /// region-agnostic code, or to narrow a generic reference when the
    /// caller knows out-of-band which region it actually lives in.
    ///
    /// # Safety
    ///
    /// The storage must physically live in the region denoted by
    /// `NEW_SPACE`; no runtime check is possible.
    #[inline]
    pub unsafe fn address_space_cast<const NEW_SPACE: u32>(self) -> Ref<'a, T, MUTABLE, NEW_SPACE> {
        // ##Safety: the address is unchanged, so liveness for `'a` and
        // the mutability capability carry over from `self`; the new
        // region tag is the caller's obligation.
        unsafe { Ref::wrap(self.to_raw_ptr().address_space_cast::<NEW_SPACE>().as_non_null()) }
    }
}

impl<'a, T, const SPACE: u32> Ref<'a, T, true, SPACE> {
    /// Get the underlying raw reference value mutably. Only available
    /// on handles that carry the write capability.
    ///
    /// # Safety
    ///
    /// [Ref] is trivially copyable, so the type system alone cannot
    /// rule out another live reference derived from a copy of this
    /// handle. The caller (normally the surrounding checker) must
    /// guarantee that no other reference to the referent is alive
    /// while the returned borrow is.
    #[inline]
    pub unsafe fn get_mut(self) -> &'a mut T {
        // ##Safety: exclusivity is asserted by the caller; liveness for
        // `'a` was asserted at the wrap boundary.
        unsafe { &mut *self.ptr.as_ptr() }
    }

    /// Overwrite the referent with `value`.
    ///
    /// # Safety
    ///
    /// As [Ref::get_mut]: the caller asserts that no other access to
    /// the referent overlaps this write.
    #[inline]
    pub unsafe fn set(self, value: T) {
        // ##Safety: exclusivity is asserted by the caller.
        unsafe { *self.ptr.as_ptr() = value }
    }
}

impl<'a, T> From<&'a T> for Ref<'a, T, false> {
    /// Wrap a borrow into an immutable, generic-space reference. The
    /// wrap preconditions are discharged by the borrow itself, so this
    /// needs no `unsafe`.
    fn from(value: &'a T) -> Self {
        // ##Safety: a live shared borrow guarantees liveness for `'a`,
        // host borrows live in the generic space, and no write
        // capability is claimed.
        unsafe { Self::wrap(NonNull::from(value)) }
    }
}

impl<'a, T> From<&'a mut T> for Ref<'a, T, true> {
    /// Wrap an exclusive borrow into a mutable, generic-space
    /// reference. Exclusivity for `'a` is established by the borrow
    /// checker at this point; it is the caller's job not to copy the
    /// resulting handle into overlapping use.
    fn from(value: &'a mut T) -> Self {
        // ##Safety: a live exclusive borrow guarantees liveness and
        // writability for `'a`, and host borrows live in the generic
        // space.
        unsafe { Self::wrap(NonNull::from(value)) }
    }
}

// Manual implementations, since deriving them would spuriously require
// `T: Copy`/`T: Clone`.
impl<T, const MUTABLE: bool, const SPACE: u32> Clone for Ref<'_, T, MUTABLE, SPACE> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<T, const MUTABLE: bool, const SPACE: u32> Copy for Ref<'_, T, MUTABLE, SPACE> {}

impl<T, const MUTABLE: bool, const SPACE: u32> Deref for Ref<'_, T, MUTABLE, SPACE> {
    type Target = T;

    fn deref(&self) -> &Self::Target {
        // ##Safety: as in `get`, liveness was asserted at the wrap
        // boundary.
        unsafe { self.ptr.as_ref() }
    }
}

impl<T, const MUTABLE: bool, const SPACE: u32> fmt::Debug for Ref<'_, T, MUTABLE, SPACE> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "ref[addr={:p}, mutable={}, space={}]", self.ptr, MUTABLE, self.space())
    }
}

impl<T, const MUTABLE: bool, const SPACE: u32> fmt::Pointer for Ref<'_, T, MUTABLE, SPACE> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Pointer::fmt(&self.ptr, f)
    }
}
