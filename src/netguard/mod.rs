//! The netguard.sgroups.io API group: versioned types, internal types and
//! their conversions and validation.

pub mod internal;
pub mod v1beta1;
