//! # Kernel Driver Layer
//!
//! O gerenciador de worker tasks só precisa de um driver: a serial, que é o
//! sink dos logs de diagnóstico.
//!
//! | Driver   | Arquivo      | Uso                               |
//! |----------|--------------|-----------------------------------|
//! | Serial   | `serial.rs`  | COM1 (bare-metal) / stderr (host) |

pub mod serial; // UART 16550 - Logs
