//! This module defines the core data structures that deal with address
//! spaces, i.e. the distinct memory regions that a compilation target
//! may expose. Host targets only have the generic region, whilst
//! accelerator targets (GPUs and similar) additionally distinguish
//! global, constant, shared, parameter and thread-local memory. The
//! address space that some storage lives in is tracked on every
//! reference and pointer that the compiler hands out, so that code
//! generation can emit accesses into the correct region.

use std::fmt;

use num_enum::{IntoPrimitive, TryFromPrimitive};

/// An identifier that specifies the address space that some memory
/// operation should operate on. Special address spaces have an effect on
/// code generation, depending on the target and the address spaces it
/// implements.
///
/// The tag is a plain integral code with structural equality: two
/// [AddressSpace]s are equal iff their codes are equal, and nothing
/// beyond the code is stored. Codes that do not correspond to any of
/// the named constants are permitted and preserved verbatim, so that
/// targets which define additional regions can still be represented.
#[derive(Copy, Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct AddressSpace(u32);

impl AddressSpace {
    /// The default address space, i.e. ordinary data on the host. All
    /// regions can be addressed through the generic space.
    pub const GENERIC: Self = AddressSpace(0);

    /// Device-wide memory on accelerator targets.
    pub const GLOBAL: Self = AddressSpace(1);

    /// Read-only memory initialised before kernel launch.
    pub const CONSTANT: Self = AddressSpace(2);

    /// Memory shared between the threads of a single work-group.
    pub const SHARED: Self = AddressSpace(3);

    /// Kernel parameter memory.
    pub const PARAM: Self = AddressSpace(4);

    /// Per-thread private memory.
    pub const LOCAL: Self = AddressSpace(5);

    /// Create an [AddressSpace] from an arbitrary integral code.
    ///
    /// No validation is performed, unknown codes are kept as-is so that
    /// future regions can be introduced without touching this type.
    #[inline]
    pub const fn from_code(code: u32) -> Self {
        AddressSpace(code)
    }

    /// Get the integral code of the [AddressSpace].
    #[inline]
    pub const fn code(self) -> u32 {
        self.0
    }

    /// Check whether this is the generic (host data) address space.
    #[inline]
    pub const fn is_generic(self) -> bool {
        self.0 == Self::GENERIC.0
    }
}

impl Default for AddressSpace {
    fn default() -> Self {
        Self::GENERIC
    }
}

impl From<GpuAddressSpace> for AddressSpace {
    /// The only bridge between the accelerator-specific enumeration and
    /// the generic tag: the integral code is copied over, after which
    /// the origin of the tag is indistinguishable.
    fn from(space: GpuAddressSpace) -> Self {
        AddressSpace(space.into())
    }
}

impl fmt::Display for AddressSpace {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match *self {
            Self::GENERIC => write!(f, "generic"),
            Self::GLOBAL => write!(f, "global"),
            Self::CONSTANT => write!(f, "constant"),
            Self::SHARED => write!(f, "shared"),
            Self::PARAM => write!(f, "param"),
            Self::LOCAL => write!(f, "local"),
            Self(code) => write!(f, "addrspace({code})"),
        }
    }
}

/// The address spaces that GPU-like accelerator targets expose, with
/// the discriminants fixed to the codes that the backends expect.
///
/// [GpuAddressSpace::Generic] exists so that region-agnostic device
/// code can still name the default space; it carries the same code as
/// [AddressSpace::GENERIC].
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, IntoPrimitive, TryFromPrimitive)]
#[repr(u32)]
pub enum GpuAddressSpace {
    Generic = 0,
    Global = 1,
    Constant = 2,
    Shared = 3,
    Param = 4,
    Local = 5,
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn test_tag_equality_follows_code() {
        let codes = [0u32, 1, 2, 3, 4, 5, 17, u32::MAX];

        for a in codes {
            for b in codes {
                assert_eq!(
                    AddressSpace::from_code(a) == AddressSpace::from_code(b),
                    a == b,
                    "equality of tags must mirror equality of codes ({a}, {b})"
                );
            }
        }
    }

    #[test]
    fn test_code_round_trip() {
        for code in [0u32, 3, 42, 1000, u32::MAX] {
            assert_eq!(AddressSpace::from_code(code).code(), code);
        }
    }

    #[test]
    fn test_named_constants_have_fixed_codes() {
        assert_eq!(AddressSpace::GENERIC.code(), 0);
        assert_eq!(AddressSpace::GLOBAL.code(), 1);
        assert_eq!(AddressSpace::CONSTANT.code(), 2);
        assert_eq!(AddressSpace::SHARED.code(), 3);
        assert_eq!(AddressSpace::PARAM.code(), 4);
        assert_eq!(AddressSpace::LOCAL.code(), 5);
    }

    #[test]
    fn test_unknown_codes_are_preserved() {
        // Codes beyond the named constants are valid tags in their own
        // right, and must survive a round-trip untouched.
        let space = AddressSpace::from_code(93);
        assert_eq!(space.code(), 93);
        assert!(!space.is_generic());
        assert_eq!(format!("{space}"), "addrspace(93)");
    }

    #[test]
    fn test_gpu_bridge_is_structural() {
        assert_eq!(AddressSpace::from(GpuAddressSpace::Generic), AddressSpace::GENERIC);
        assert_eq!(AddressSpace::from(GpuAddressSpace::Global), AddressSpace::GLOBAL);
        assert_eq!(AddressSpace::from(GpuAddressSpace::Constant), AddressSpace::CONSTANT);
        assert_eq!(AddressSpace::from(GpuAddressSpace::Shared), AddressSpace::SHARED);
        assert_eq!(AddressSpace::from(GpuAddressSpace::Param), AddressSpace::PARAM);
        assert_eq!(AddressSpace::from(GpuAddressSpace::Local), AddressSpace::LOCAL);

        // After conversion, tags from either origin are indistinguishable.
        assert_eq!(AddressSpace::from(GpuAddressSpace::Shared), AddressSpace::from_code(3));
    }

    #[test]
    fn test_shared_scenario() {
        let space = AddressSpace::from_code(3);

        assert_eq!(space, AddressSpace::SHARED);
        assert_ne!(space, AddressSpace::GENERIC);
    }

    #[test]
    fn test_gpu_enum_primitive_conversions() {
        assert_eq!(u32::from(GpuAddressSpace::Shared), 3);
        assert_eq!(GpuAddressSpace::try_from(5u32), Ok(GpuAddressSpace::Local));
        assert!(GpuAddressSpace::try_from(6u32).is_err());
    }

    #[test]
    fn test_display_names() {
        assert_eq!(format!("{}", AddressSpace::GENERIC), "generic");
        assert_eq!(format!("{}", AddressSpace::SHARED), "shared");
        assert_eq!(format!("{}", AddressSpace::LOCAL), "local");
    }
}
