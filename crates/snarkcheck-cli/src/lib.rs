pub mod codegen;
pub mod commands;
pub mod config;
pub mod runner;
pub mod toolchain;
