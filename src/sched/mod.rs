//! # Scheduler Interface
//!
//! O scheduler é um colaborador externo: este módulo só define o que o
//! gerenciador de worker tasks consome dele.
//!
//! - `ops`: trait `ThreadOps` (spawn, park, wake, current, exit) e as
//!   funções livres que encaminham para a implementação instalada no boot.
//! - `config`: faixa de prioridades e tamanho de stack.
//! - `host`: implementação sobre threads da std (alvos hospedados e testes).

pub mod config;
pub mod ops;

#[cfg(not(target_os = "none"))]
pub mod host;

pub use ops::{
    current, exit_current, install, is_installed, park, spawn, wake, ThreadEntry, ThreadOps,
};
