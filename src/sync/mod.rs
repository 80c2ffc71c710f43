//! # Synchronization Primitives
//!
//! Primitivas de sincronização usadas pelas filas de worker tasks.
//!
//! ```text
//! Spinlock   → Seções críticas curtas com IRQs off (splice da fila)
//! AtomicFlag → Flag "enfileirada" de cada task
//! ```
//!
//! ## Regras
//!
//! - **Spinlock**: Usar apenas quando NÃO pode dormir (IRQ handlers)
//! - Nunca chamar o scheduler (park/spawn) com um Spinlock tomado

/// Operações atômicas
pub mod atomic;

/// Spinlock (busy-wait, não dorme, IRQ-safe)
pub mod spinlock;

pub use atomic::{AtomicCounter, AtomicFlag};
pub use spinlock::{Spinlock, SpinlockGuard};
