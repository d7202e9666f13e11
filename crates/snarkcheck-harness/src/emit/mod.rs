//! Per-target emitters turning a [`crate::ir::HarnessIr`] into program text.

pub mod rust;
