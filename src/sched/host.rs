//! Backend hospedado do scheduler: threads da std.
//!
//! Cada thread de kernel vira uma `std::thread` registrada numa tabela
//! global. `park`/`wake` usam `thread::park`/`Thread::unpark`, que já têm a
//! semântica de token exigida por `ThreadOps` (um unpark antes do park não
//! se perde). A prioridade não existe na std: é validada e guardada na
//! tabela para diagnóstico.
//!
//! `exit_current` encerra a thread desenrolando a pilha com um payload
//! privado (sem passar pelo panic hook). Com `panic = "abort"` o processo
//! inteiro termina, o que também é uma forma válida de "encerrar o contexto".

use std::boxed::Box;
use std::cell::Cell;
use std::thread::{self, Thread};
use std::vec::Vec;

use spin::Mutex;

use super::config::{is_valid_priority, KERNEL_STACK_SIZE};
use super::ops::{ThreadEntry, ThreadOps};
use crate::sync::AtomicCounter;
use crate::sys::{Errno, Priority, Tid};

/// A std em debug consome bem mais stack que o kernel real.
const HOST_STACK_SIZE: usize = KERNEL_STACK_SIZE * 4;

std::thread_local! {
    static CURRENT_TID: Cell<Tid> = const { Cell::new(Tid::KERNEL) };
}

/// Payload do unwind de `exit_current`.
struct ThreadExit;

struct HostThread {
    tid: Tid,
    name: &'static str,
    priority: Priority,
    handle: Thread,
    exited: bool,
}

/// Tabela de threads de kernel emuladas.
pub struct HostThreads {
    threads: Mutex<Vec<HostThread>>,
    next_tid: AtomicCounter,
}

/// Instância global usada por `install()`.
pub static HOST_THREADS: HostThreads = HostThreads::new();

/// Instala `HOST_THREADS` como scheduler do processo (idempotente).
pub fn install() {
    super::ops::install(&HOST_THREADS);
}

impl HostThreads {
    pub const fn new() -> Self {
        Self {
            threads: Mutex::new(Vec::new()),
            next_tid: AtomicCounter::new(1),
        }
    }

    fn with_thread<R>(&self, tid: Tid, f: impl FnOnce(&mut HostThread) -> R) -> Option<R> {
        self.threads
            .lock()
            .iter_mut()
            .find(|thread| thread.tid == tid)
            .map(f)
    }

    /// Prioridade com que `tid` foi criada.
    pub fn priority_of(&self, tid: Tid) -> Option<Priority> {
        self.with_thread(tid, |thread| thread.priority)
    }

    /// Nome com que `tid` foi criada.
    pub fn name_of(&self, tid: Tid) -> Option<&'static str> {
        self.with_thread(tid, |thread| thread.name)
    }

    /// `tid` já chamou `exit_current`?
    pub fn has_exited(&self, tid: Tid) -> bool {
        self.with_thread(tid, |thread| thread.exited)
            .unwrap_or(false)
    }
}

impl Default for HostThreads {
    fn default() -> Self {
        Self::new()
    }
}

impl ThreadOps for HostThreads {
    fn spawn(
        &self,
        name: &'static str,
        priority: Priority,
        entry: ThreadEntry,
        arg: usize,
    ) -> Result<Tid, Errno> {
        if !is_valid_priority(priority) {
            crate::kwarn!("(Sched) Prioridade inválida=", priority.as_u8());
            return Err(Errno::EINVAL);
        }

        let tid = Tid::new(self.next_tid.inc() as u32);

        // Registro e criação sob o mesmo lock: quando alguém puder dar wake
        // neste tid, ele já está na tabela.
        let mut threads = self.threads.lock();
        let handle = thread::Builder::new()
            .name(name.into())
            .stack_size(HOST_STACK_SIZE)
            .spawn(move || {
                CURRENT_TID.with(|current| current.set(tid));
                entry(arg);
            })
            .map_err(|_| Errno::EAGAIN)?;

        threads.push(HostThread {
            tid,
            name,
            priority,
            handle: handle.thread().clone(),
            exited: false,
        });

        crate::ktrace!("(Sched) Thread criada tid=", tid.as_u32());
        Ok(tid)
    }

    fn current(&self) -> Tid {
        CURRENT_TID.with(Cell::get)
    }

    fn park(&self) {
        thread::park();
    }

    fn wake(&self, tid: Tid) {
        match self.with_thread(tid, |thread| thread.handle.clone()) {
            Some(handle) => handle.unpark(),
            None => crate::kwarn!("(Sched) wake para tid desconhecido=", tid.as_u32()),
        }
    }

    fn exit_current(&self) -> ! {
        let tid = self.current();
        self.with_thread(tid, |thread| thread.exited = true);
        crate::ktrace!("(Sched) Thread encerrada tid=", tid.as_u32());
        std::panic::resume_unwind(Box::new(ThreadExit));
    }
}
