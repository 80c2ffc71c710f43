//! Forge Worker Tasks.
//!
//! Gerenciador de trabalho diferido do kernel: uma fila FIFO intrusiva por
//! categoria, cada uma drenada por exatamente uma thread de kernel dedicada,
//! criada no boot com prioridade fixa.
//!
//! ```text
//! IRQ / finalização / destruição de objeto
//!        │  add_task(wt, task)       (nunca bloqueia, sem alocação)
//!        ▼
//! ┌──────────────────────┐   wake(tid)   ┌──────────────────────────┐
//! │ WorkerTaskManager[wt]│ ────────────▶ │ kworker/<wt> (prioridade)│
//! │ head ─▶ t1 ─▶ t2     │ ◀──────────── │ get_task → do_worker_task│
//! └──────────────────────┘   get_task    └──────────────────────────┘
//! ```
//!
//! Em alvos bare-metal (`target_os = "none"`) a crate é `no_std`. Em alvos
//! hospedados o backend `host` emula interrupções e o scheduler com threads
//! da std.

#![cfg_attr(target_os = "none", no_std)]

// --- Módulos de Baixo Nível (Hardware) ---
pub mod arch; // HAL (controle de interrupções)
pub mod drivers; // Serial (sink dos logs)

// --- Módulos Centrais ---
pub mod core; // Logging, Worker Tasks
pub mod klib; // Framework de self-test
pub mod sched; // Interface com o scheduler (spawn/park/wake)
pub mod sync; // Spinlock IRQ-safe, flags atômicas
pub mod sys; // Tipos e códigos de erro

// Re-exportar a API de trabalho diferido na raiz
pub use crate::core::work::{
    add_task, add_task_raw, init_workers, initialize, manager, FnTask, TaskLinks, WorkerKind,
    WorkerStatus, WorkerTask, WorkerTaskManager, WorkerType,
};
