//! Interface com o scheduler do kernel.
//!
//! O gerenciador de worker tasks não cria threads nem mexe em runqueues
//! diretamente: ele consome estas cinco operações, instaladas uma única vez
//! no boot pelo scheduler real (ou pelo backend `host` fora do kernel).
//!
//! # Contrato de `park`/`wake`
//!
//! `wake(tid)` acorda exatamente a thread `tid`, nunca outra. Se `tid` ainda
//! não estiver dormindo, o wake fica registrado e o próximo `park()` dela
//! retorna imediatamente. Um `park()` também pode retornar espuriamente:
//! quem dorme sempre revalida sua condição ao acordar.

use spin::Once;

use crate::sys::{Errno, Priority, Tid};

/// Ponto de entrada de uma thread de kernel. Recebe o argumento opaco
/// passado em `spawn`.
pub type ThreadEntry = fn(arg: usize);

/// Operações de thread que o scheduler oferece ao resto do kernel.
pub trait ThreadOps: Sync {
    /// Cria e inicia uma thread de kernel executando `entry(arg)` com a
    /// prioridade dada.
    fn spawn(
        &self,
        name: &'static str,
        priority: Priority,
        entry: ThreadEntry,
        arg: usize,
    ) -> Result<Tid, Errno>;

    /// Thread corrente (`Tid::KERNEL` fora de threads do scheduler).
    fn current(&self) -> Tid;

    /// Bloqueia a thread corrente até um `wake` dirigido a ela.
    fn park(&self);

    /// Torna `tid` executável. Seguro em contexto de interrupção.
    fn wake(&self, tid: Tid);

    /// Termina a thread corrente. Nunca retorna.
    fn exit_current(&self) -> !;
}

static THREAD_OPS: Once<&'static dyn ThreadOps> = Once::new();

/// Instala o scheduler. Chamadas seguintes são ignoradas.
///
/// Retorna `true` se esta chamada fez a instalação.
pub fn install(ops: &'static dyn ThreadOps) -> bool {
    let mut installed = false;
    THREAD_OPS.call_once(|| {
        installed = true;
        ops
    });
    if installed {
        crate::kdebug!("(Sched) ThreadOps instalado");
    }
    installed
}

/// Já existe um scheduler instalado?
pub fn is_installed() -> bool {
    THREAD_OPS.is_completed()
}

#[inline]
fn ops() -> &'static dyn ThreadOps {
    match THREAD_OPS.get() {
        Some(ops) => *ops,
        None => {
            crate::kerror!("(Sched) Operação de thread antes de sched::install()");
            panic!("sched: ThreadOps não instalado");
        }
    }
}

pub fn spawn(
    name: &'static str,
    priority: Priority,
    entry: ThreadEntry,
    arg: usize,
) -> Result<Tid, Errno> {
    ops().spawn(name, priority, entry, arg)
}

pub fn current() -> Tid {
    ops().current()
}

pub fn park() {
    ops().park()
}

pub fn wake(tid: Tid) {
    ops().wake(tid)
}

pub fn exit_current() -> ! {
    ops().exit_current()
}
