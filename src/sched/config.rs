//! Constantes de configuração do Scheduler

use crate::sys::Priority;

/// Prioridade mais urgente que uma thread de kernel pode pedir
pub const PRIORITY_HIGHEST: Priority = Priority::new(0);

/// Prioridade menos urgente (Idle)
pub const PRIORITY_LOWEST: Priority = Priority::new(63);

/// Prioridade padrão para threads de usuário
pub const PRIORITY_DEFAULT: Priority = Priority::new(44);

/// Tamanho padrão da Stack de Kernel (em bytes)
pub const KERNEL_STACK_SIZE: usize = 65536; // 64KB

/// A prioridade está dentro da faixa aceita pelo scheduler?
pub const fn is_valid_priority(priority: Priority) -> bool {
    !priority.is_more_urgent_than(PRIORITY_HIGHEST) && !PRIORITY_LOWEST.is_more_urgent_than(priority)
}
