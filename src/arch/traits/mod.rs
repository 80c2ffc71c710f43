//! Traits do Hardware Abstraction Layer (HAL).
//! Interfaces que o gerenciador de worker tasks usa para falar com a CPU.

pub mod cpu;

// Re-exportar para facilitar uso: `use crate::arch::traits::CpuOps;`
pub use cpu::CpuOps;
