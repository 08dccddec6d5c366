//! TUI screen drawing functions.

pub(crate) mod dialog;
pub(crate) mod home;
