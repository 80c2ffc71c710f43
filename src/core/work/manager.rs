//! Gerenciador de worker tasks.
//!
//! Um `WorkerTaskManager` é o slot de uma categoria: a fila FIFO intrusiva,
//! a thread dedicada que a esvazia e o estado observável do worker.
//!
//! # Protocolo de wake
//!
//! `add_task` acorda a thread apenas quando a fila estava vazia; o wake é
//! dirigido ao tid do worker e emitido depois de soltar o lock. O worker só
//! dorme depois de encontrar a fila vazia sob o lock, e `ThreadOps` guarda um
//! wake que chegue antes do `park`. Logo, fila não-vazia implica worker
//! acordado ou com wake pendente.
//!
//! # Contexto
//!
//! `add_task` pode ser chamado de qualquer contexto, inclusive de handlers de
//! interrupção: a seção crítica é um `Spinlock` que mascara IRQs, e nada
//! aqui aloca.

use core::ptr::NonNull;
use core::sync::atomic::{AtomicU8, Ordering};

use bitflags::bitflags;
use spin::Once;

use super::config::EXIT_WORKER_PRIORITY;
use super::queue::TaskQueue;
use super::task::{TaskRef, WorkerTask};
use super::worker_type::WorkerType;
use crate::sched;
use crate::sync::{AtomicCounter, Spinlock};
use crate::sys::{Priority, Tid};

bitflags! {
    /// Estado observável da thread do worker.
    ///
    /// Vazio = slot ainda não inicializado.
    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    pub struct WorkerStatus: u8 {
        /// Fila vazia, thread dormindo (ou prestes a dormir).
        const WAITING   = 1 << 0;
        /// Executando uma task.
        const EXECUTING = 1 << 1;
        /// Worker de saída já encerrou sua thread.
        const EXITED    = 1 << 2;
    }
}

/// Slot de uma categoria de worker.
pub struct WorkerTaskManager {
    queue: Spinlock<TaskQueue>,
    /// Preenchido uma única vez por `initialize`: é o flag de "ativo".
    thread: Once<Tid>,
    wt: WorkerType,
    status: AtomicU8,
    executed: AtomicCounter,
}

impl WorkerTaskManager {
    pub const fn new(wt: WorkerType) -> Self {
        Self {
            queue: Spinlock::new(TaskQueue::new()),
            thread: Once::new(),
            wt,
            status: AtomicU8::new(0),
            executed: AtomicCounter::new(0),
        }
    }

    // =========================================================================
    // INICIALIZAÇÃO
    // =========================================================================

    /// Cria a thread dedicada com a prioridade dada e ativa o slot.
    ///
    /// Chamado uma vez por slot, no boot. O worker de saída exige
    /// `EXIT_WORKER_PRIORITY`.
    ///
    /// # Panics
    /// Se o slot já foi inicializado, se a prioridade do worker de saída for
    /// outra ou se o scheduler não conseguir criar a thread.
    pub fn initialize(&'static self, priority: Priority) {
        if self.wt.is_exit() && priority != EXIT_WORKER_PRIORITY {
            crate::kerror!("(Work) Prioridade recebida=", priority.as_u8());
            contract_violation(self.wt, "worker de saída exige EXIT_WORKER_PRIORITY");
        }

        let mut first = false;
        let tid = *self.thread.call_once(|| {
            first = true;
            self.spawn_thread(priority)
        });

        if !first {
            contract_violation(self.wt, "initialize chamado duas vezes");
        }

        crate::kdebug!("(Work) Worker ativo, tid=", tid.as_u32());
    }

    fn spawn_thread(&'static self, priority: Priority) -> Tid {
        let arg = self as *const Self as usize;

        match sched::spawn(self.wt.thread_name(), priority, Self::thread_function, arg) {
            Ok(tid) => tid,
            Err(err) => {
                crate::kerror!("(Work) Falha ao criar thread do worker:");
                crate::kerror!(err.as_str());
                panic!("work: falha ao criar {}: {}", self.wt.thread_name(), err);
            }
        }
    }

    // =========================================================================
    // SUBMISSÃO
    // =========================================================================

    /// Enfileira uma task com tempo de vida estático.
    pub fn add_task(&self, task: &'static dyn WorkerTask) {
        // SAFETY: 'static nunca é liberada.
        unsafe { self.submit(TaskRef::from_static(task)) }
    }

    /// Enfileira uma task embutida num objeto do kernel.
    ///
    /// # Safety
    /// O objeto precisa continuar válido até seu `do_worker_task` começar.
    pub unsafe fn add_task_raw(&self, task: NonNull<dyn WorkerTask>) {
        self.submit(TaskRef::from_raw(task))
    }

    unsafe fn submit(&self, task: TaskRef) {
        let tid = match self.thread.get() {
            Some(tid) => *tid,
            None => contract_violation(self.wt, "add_task em worker inativo"),
        };
        if self.status().contains(WorkerStatus::EXITED) {
            contract_violation(self.wt, "add_task em worker de saída já encerrado");
        }
        if task.as_task().links().mark_queued() {
            crate::kerror!("(Work) Task=", task.addr());
            contract_violation(self.wt, "task submetida enquanto ainda enfileirada");
        }

        let was_empty = self.queue.lock().push(task);

        if was_empty {
            sched::wake(tid);
        }
    }

    /// Retira a próxima task, já desligada da fila.
    ///
    /// O status muda sob o lock da fila: `is_idle` nunca vê WAITING com uma
    /// task retirada e ainda não executada.
    fn get_task(&self) -> Option<TaskRef> {
        let mut queue = self.queue.lock();
        match queue.pop() {
            Some(task) => {
                self.set_status(WorkerStatus::EXECUTING);
                // SAFETY: acabou de sair da fila; quem submeteu garante a
                // validade até a execução.
                unsafe { task.as_task().links().mark_dequeued() };
                Some(task)
            }
            None => {
                self.set_status(WorkerStatus::WAITING);
                None
            }
        }
    }

    // =========================================================================
    // THREAD DO WORKER
    // =========================================================================

    fn thread_function(arg: usize) {
        // SAFETY: `arg` veio de `spawn_thread`, que só aceita `&'static Self`.
        let manager = unsafe { &*(arg as *const Self) };
        manager.thread_function_impl();
    }

    fn thread_function_impl(&self) {
        crate::ktrace!("(Work) Worker iniciado, slot=", self.wt.index());

        loop {
            let task = match self.get_task() {
                Some(task) => task,
                None => {
                    sched::park();
                    continue;
                }
            };

            // SAFETY: validade garantida por quem submeteu até este ponto.
            // Depois da chamada a task não é mais tocada.
            unsafe { task.as_task().do_worker_task() };
            self.executed.inc();

            if self.wt.is_exit() {
                self.set_status(WorkerStatus::EXITED);
                crate::kinfo!("(Work) Worker de saída encerrando thread");
                sched::exit_current();
            }
        }
    }

    // =========================================================================
    // DIAGNÓSTICO
    // =========================================================================

    pub fn worker_type(&self) -> WorkerType {
        self.wt
    }

    /// O slot já foi inicializado?
    pub fn is_active(&self) -> bool {
        self.thread.is_completed()
    }

    pub fn thread_id(&self) -> Option<Tid> {
        self.thread.get().copied()
    }

    pub fn status(&self) -> WorkerStatus {
        WorkerStatus::from_bits_truncate(self.status.load(Ordering::Acquire))
    }

    /// Tasks executadas até agora.
    pub fn executed(&self) -> u64 {
        self.executed.get()
    }

    /// Tasks na fila (não conta a que está executando).
    pub fn pending(&self) -> usize {
        self.queue.lock().len()
    }

    /// Worker dormindo com a fila vazia.
    pub fn is_idle(&self) -> bool {
        let queue = self.queue.lock();
        queue.is_empty() && self.status() == WorkerStatus::WAITING
    }

    fn set_status(&self, status: WorkerStatus) {
        self.status.store(status.bits(), Ordering::Release);
    }
}

/// Violação de contrato do chamador: loga e entra em pânico.
#[cold]
#[inline(never)]
#[track_caller]
fn contract_violation(wt: WorkerType, what: &'static str) -> ! {
    crate::kerror!("(Work) Violação de contrato, slot=", wt.index());
    crate::kerror!(what);
    panic!("work: {}: {}", wt.thread_name(), what);
}
