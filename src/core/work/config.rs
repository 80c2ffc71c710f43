//! Constantes de configuração dos workers

use crate::sys::Priority;

/// Prioridade fixa do worker de saída.
///
/// Mais urgente que os workers comuns: o encerramento é atendido antes do
/// trabalho que o disparou.
pub const EXIT_WORKER_PRIORITY: Priority = Priority::new(11);

/// Prioridade usada por `init_workers` para os workers comuns.
pub const DEFAULT_WORKER_PRIORITY: Priority = Priority::new(16);

const _: () = assert!(EXIT_WORKER_PRIORITY.is_more_urgent_than(DEFAULT_WORKER_PRIORITY));
