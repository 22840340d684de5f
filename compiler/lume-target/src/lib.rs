//! Definitions to describe the memory model of the target that Lume
//! compiles for. Currently this only covers address spaces, i.e. the
//! distinct memory regions that a target may expose.

pub mod address_space;
