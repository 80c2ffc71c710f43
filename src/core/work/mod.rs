//! Trabalho diferido do kernel.
//!
//! Uma fila FIFO intrusiva por categoria (`WorkerType`), cada uma esvaziada
//! por uma thread de kernel dedicada com prioridade fixa. Submeter trabalho
//! não aloca e é seguro em contexto de interrupção.
//!
//! ```ignore
//! work::init_workers(DEFAULT_WORKER_PRIORITY);
//! work::add_task(WorkerType::Ordinary(WorkerKind::Irq), &DISK_BOTTOM_HALF);
//! ```

pub mod config;
pub mod manager;
pub mod queue;
pub mod task;
pub mod worker_type;


#[cfg(test)]
mod tests;

use core::ptr::NonNull;

pub use config::{DEFAULT_WORKER_PRIORITY, EXIT_WORKER_PRIORITY};
pub use manager::{WorkerStatus, WorkerTaskManager};
pub use task::{FnTask, TaskLinks, TaskRef, WorkerTask};
pub use worker_type::{WorkerKind, WorkerType};

use crate::sys::Priority;

/// Slots globais, indexados por `WorkerType::index()`.
static WORKER_TASK_MANAGERS: [WorkerTaskManager; WorkerType::COUNT] = [
    WorkerTaskManager::new(WorkerType::ALL[0]),
    WorkerTaskManager::new(WorkerType::ALL[1]),
    WorkerTaskManager::new(WorkerType::ALL[2]),
    WorkerTaskManager::new(WorkerType::ALL[3]),
];

/// Slot global da categoria.
pub fn manager(wt: WorkerType) -> &'static WorkerTaskManager {
    &WORKER_TASK_MANAGERS[wt.index()]
}

/// Inicializa o worker de uma categoria. Ver `WorkerTaskManager::initialize`.
pub fn initialize(wt: WorkerType, priority: Priority) {
    manager(wt).initialize(priority);
}

/// Enfileira `task` na categoria `wt`.
pub fn add_task(wt: WorkerType, task: &'static dyn WorkerTask) {
    manager(wt).add_task(task);
}

/// Enfileira uma task embutida num objeto do kernel.
///
/// # Safety
/// Ver `WorkerTaskManager::add_task_raw`.
pub unsafe fn add_task_raw(wt: WorkerType, task: NonNull<dyn WorkerTask>) {
    manager(wt).add_task_raw(task);
}

/// Inicializa todos os slots no boot: os comuns com `priority`, o de saída
/// com `EXIT_WORKER_PRIORITY`.
pub fn init_workers(priority: Priority) {
    crate::kinfo!("(Work) Inicializando workers...");

    for wt in WorkerType::ALL {
        let priority = if wt.is_exit() {
            EXIT_WORKER_PRIORITY
        } else {
            priority
        };
        initialize(wt, priority);
    }

    crate::kok!("(Work) Workers prontos");
}
