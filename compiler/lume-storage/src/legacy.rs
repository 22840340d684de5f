//! The legacy unchecked pointer. This predates [RawPtr] and offers a
//! strictly narrower surface: it can be constructed from a raw value or
//! from a checked reference, and dereferenced, and nothing else. It is
//! kept only so that older lowering code keeps compiling.
//!
//! @@Future: remove once the remaining consumers migrate to [RawPtr].
//!
//! [RawPtr]: crate::raw::RawPtr

use std::{fmt, ptr::NonNull};

use lume_target::address_space::AddressSpace;

use crate::reference::Ref;

/// A legacy, address-space tagged pointer to a value of type `T`, with
/// no lifetime or mutability tracking.
#[repr(transparent)]
pub struct LegacyPtr<T, const SPACE: u32 = 0> {
    ptr: NonNull<T>,
}

impl<T, const SPACE: u32> LegacyPtr<T, SPACE> {
    /// Create a [LegacyPtr] from a non-null pointer value. The caller
    /// is responsible for the region of the pointee matching `SPACE`.
    #[inline]
    pub const fn from_raw(ptr: NonNull<T>) -> Self {
        Self { ptr }
    }

    /// Create a [LegacyPtr] from a checked [Ref], dropping its
    /// lifetime and mutability tracking.
    #[inline]
    pub fn from_ref<const MUTABLE: bool>(reference: Ref<'_, T, MUTABLE, SPACE>) -> Self {
        Self { ptr: reference.as_non_null() }
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

    /// Dereference the pointer into a shared reference with an
    /// arbitrary caller-chosen lifetime.
    ///
    /// # Safety
    ///
    /// The pointee must be live, properly initialised and valid for
    /// reads for the whole of `'a`, with no overlapping mutable access.
    #[inline]
    pub unsafe fn as_ref<'a>(self) -> &'a T {
        // ##Safety: deferred to the caller, as per the contract above.
        unsafe { self.ptr.as_ref() }
    }
}

// Manual implementations, since deriving them would spuriously require
// `T: Copy`/`T: Clone`.
impl<T, const SPACE: u32> Clone for LegacyPtr<T, SPACE> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<T, const SPACE: u32> Copy for LegacyPtr<T, SPACE> {}

impl<T, const SPACE: u32> fmt::Debug for LegacyPtr<T, SPACE> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "legacyptr[addr={:p}, space={}]", self.ptr, self.space())
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;
    use crate::reference::ImmutRef;

    #[test]
    fn test_construction_preserves_address() {
        let cell: u32 = 13;
        let reference = ImmutRef::from(&cell);

        let legacy = LegacyPtr::from_ref(reference);
        assert_eq!(legacy.addr(), reference.addr());
        assert_eq!(legacy.space(), AddressSpace::GENERIC);

        // ##Safety: `cell` is live for the whole test.
        assert_eq!(unsafe { *legacy.as_ref() }, 13);
    }

    #[test]
    fn test_from_raw() {
        let mut cell: u32 = 99;
        let legacy = LegacyPtr::<u32>::from_raw(NonNull::from(&mut cell));

        // ##Safety: `cell` is live and not otherwise accessed.
        assert_eq!(unsafe { *legacy.as_ref() }, 99);
    }
}
