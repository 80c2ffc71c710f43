//! Worker Tasks: a unidade de trabalho diferido.
//!
//! Uma task é qualquer objeto do kernel que embute um `TaskLinks` e sabe se
//! executar. O gerenciador só *empresta* o link enquanto a task está na
//! fila: quem submete continua dono da memória, e a task pode inclusive se
//! destruir dentro de `do_worker_task` (o worker não a toca depois).

use core::cell::UnsafeCell;
use core::fmt;
use core::ptr::NonNull;

use crate::sync::AtomicFlag;

/// Trabalho diferido executável por um worker.
pub trait WorkerTask: Send + Sync {
    /// Link intrusivo embutido no objeto.
    fn links(&self) -> &TaskLinks;

    /// Executa o trabalho. Roda na thread do worker da categoria, com
    /// interrupções habilitadas, e pode submeter novas tasks (inclusive a
    /// própria).
    fn do_worker_task(&self);
}

/// Campos intrusivos de uma task: o próximo elemento da fila e a flag de
/// "enfileirada".
pub struct TaskLinks {
    /// Protegido pelo Spinlock da fila em que a task está.
    next: UnsafeCell<Option<TaskRef>>,
    queued: AtomicFlag,
}

// SAFETY: `next` só é acessado por quem tem `&mut TaskQueue` da fila dona da
// task (isto é, com o Spinlock do slot tomado); `queued` é atômico.
unsafe impl Send for TaskLinks {}
unsafe impl Sync for TaskLinks {}

impl TaskLinks {
    pub const fn new() -> Self {
        Self {
            next: UnsafeCell::new(None),
            queued: AtomicFlag::new(false),
        }
    }

    /// A task está em alguma fila agora?
    pub fn is_queued(&self) -> bool {
        self.queued.get()
    }

    /// Marca como enfileirada. Retorna o estado anterior.
    pub(crate) fn mark_queued(&self) -> bool {
        self.queued.test_and_set()
    }

    pub(crate) fn mark_dequeued(&self) {
        self.queued.clear();
    }

    /// # Safety
    /// Acesso exclusivo à fila que contém a task.
    pub(crate) unsafe fn next(&self) -> Option<TaskRef> {
        *self.next.get()
    }

    /// # Safety
    /// Acesso exclusivo à fila que contém (ou vai conter) a task.
    pub(crate) unsafe fn set_next(&self, next: Option<TaskRef>) {
        *self.next.get() = next;
    }
}

impl Default for TaskLinks {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for TaskLinks {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TaskLinks")
            .field("queued", &self.is_queued())
            .finish()
    }
}

/// Referência não-dona para uma task enfileirada.
#[derive(Clone, Copy)]
pub struct TaskRef(NonNull<dyn WorkerTask>);

// SAFETY: WorkerTask exige Send + Sync; TaskRef só carrega o endereço.
unsafe impl Send for TaskRef {}

impl TaskRef {
    /// Task que vive para sempre: sempre válida.
    pub fn from_static(task: &'static dyn WorkerTask) -> Self {
        Self(NonNull::from(task))
    }

    /// # Safety
    /// A task precisa continuar válida até seu `do_worker_task` ser chamado.
    pub unsafe fn from_raw(task: NonNull<dyn WorkerTask>) -> Self {
        Self(task)
    }

    /// # Safety
    /// Mesmo contrato de `from_raw`.
    pub unsafe fn from_ref(task: &(dyn WorkerTask + 'static)) -> Self {
        Self(NonNull::from(task))
    }

    /// # Safety
    /// A task ainda não foi liberada por quem a possui.
    pub(crate) unsafe fn as_task<'a>(self) -> &'a dyn WorkerTask {
        &*self.0.as_ptr()
    }

    /// Endereço do objeto (sem a vtable).
    pub fn addr(self) -> usize {
        self.0.as_ptr() as *const () as usize
    }
}

impl fmt::Debug for TaskRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "TaskRef({:#x})", self.addr())
    }
}

/// Task sem estado que chama uma função.
///
/// Permite declarar trabalho diferido em `static`, sem alocação:
///
/// ```ignore
/// static FLUSH: FnTask = FnTask::new(flush_caches);
/// work::add_task(WorkerType::Ordinary(WorkerKind::Cleanup), &FLUSH);
/// ```
pub struct FnTask {
    links: TaskLinks,
    func: fn(),
}

impl FnTask {
    pub const fn new(func: fn()) -> Self {
        Self {
            links: TaskLinks::new(),
            func,
        }
    }
}

impl WorkerTask for FnTask {
    fn links(&self) -> &TaskLinks {
        &self.links
    }

    fn do_worker_task(&self) {
        (self.func)();
    }
}
