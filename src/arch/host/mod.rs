//! Plataforma hospedada (Linux, macOS, ...).
//!
//! Não há hardware para controlar: a HAL é emulada sobre a std para que o
//! gerenciador de worker tasks rode e seja testado fora do kernel.

pub mod cpu;

pub use cpu::{in_interrupt, simulate_interrupt, HostCpu as Cpu};
