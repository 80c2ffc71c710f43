//! Categorias de worker.
//!
//! Cada categoria tem exatamente um slot no gerenciador e uma thread
//! dedicada. A categoria de saída é uma variante própria, e não "o valor
//! zero do enum": o loop do worker decide se termina olhando `is_exit()`.

/// Domínios de trabalho diferido comuns (workers que nunca terminam).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum WorkerKind {
    /// Metade inferior de handlers de interrupção.
    Irq,
    /// Finalização de primitivas de sincronização.
    Finalize,
    /// Limpeza na destruição de objetos do kernel.
    Cleanup,
}

impl WorkerKind {
    pub const COUNT: usize = 3;

    pub const ALL: [WorkerKind; Self::COUNT] =
        [WorkerKind::Irq, WorkerKind::Finalize, WorkerKind::Cleanup];

    const fn index(self) -> usize {
        match self {
            WorkerKind::Irq => 0,
            WorkerKind::Finalize => 1,
            WorkerKind::Cleanup => 2,
        }
    }
}

/// Identidade de um slot do gerenciador.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum WorkerType {
    /// Categoria reservada: o worker executa a task e encerra o contexto
    /// que o hospeda.
    Exit,
    /// Categorias comuns.
    Ordinary(WorkerKind),
}

impl WorkerType {
    pub const COUNT: usize = 1 + WorkerKind::COUNT;

    /// Todas as categorias, na ordem dos slots.
    pub const ALL: [WorkerType; Self::COUNT] = [
        WorkerType::Exit,
        WorkerType::Ordinary(WorkerKind::Irq),
        WorkerType::Ordinary(WorkerKind::Finalize),
        WorkerType::Ordinary(WorkerKind::Cleanup),
    ];

    /// Índice do slot no gerenciador global.
    pub const fn index(self) -> usize {
        match self {
            WorkerType::Exit => 0,
            WorkerType::Ordinary(kind) => 1 + kind.index(),
        }
    }

    pub const fn is_exit(self) -> bool {
        matches!(self, WorkerType::Exit)
    }

    /// Nome da thread dedicada.
    pub const fn thread_name(self) -> &'static str {
        match self {
            WorkerType::Exit => "kworker/exit",
            WorkerType::Ordinary(WorkerKind::Irq) => "kworker/irq",
            WorkerType::Ordinary(WorkerKind::Finalize) => "kworker/finalize",
            WorkerType::Ordinary(WorkerKind::Cleanup) => "kworker/cleanup",
        }
    }
}
