//! Core Module
//!
//! Lógica central independente de arquitetura: logging do kernel e o
//! subsistema de trabalho diferido.

pub mod logging;
pub mod work;
