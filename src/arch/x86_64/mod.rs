//! Implementação x86_64 (bare-metal)

pub mod cpu;
pub mod ports;

pub use cpu::X64Cpu as Cpu;
