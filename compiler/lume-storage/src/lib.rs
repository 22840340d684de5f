//! Typed storage handles for the Lume compiler. The central type is
//! [Ref], a non-null, zero-cost reference to a storage location which
//! tracks the mutability capability, the lifetime of the referent and
//! the address space that the storage lives in, all at the type level.
//!
//! [Ref] deliberately carries more static information than the machine
//! representation does, so reinterpreting casts cannot be expressed
//! within the checked type itself. They instead drop down to [RawPtr],
//! the unchecked pointer facility, perform the reinterpretation there
//! and rebuild a checked reference. [LegacyPtr] is an older interop
//! handle kept only until its remaining consumers migrate.
//!
//! [Ref]: reference::Ref
//! [RawPtr]: raw::RawPtr
//! [LegacyPtr]: legacy::LegacyPtr

pub mod legacy;
pub mod raw;
pub mod reference;

pub use legacy::LegacyPtr;
pub use raw::RawPtr;
pub use reference::{ImmutRef, MutRef, Ref};
