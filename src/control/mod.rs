//! Control rules: the manual-override state machine and the automatic
//! threshold policy.

pub mod override_state;
pub mod policy;
