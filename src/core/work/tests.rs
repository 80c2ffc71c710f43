use core::ptr::NonNull;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::Mutex;
use std::thread;
use std::time::{Duration, Instant};

use super::config::{DEFAULT_WORKER_PRIORITY, EXIT_WORKER_PRIORITY};
use super::manager::{WorkerStatus, WorkerTaskManager};
use super::task::{FnTask, TaskLinks, WorkerTask};
use super::worker_type::{WorkerKind, WorkerType};
use crate::arch::platform::{in_interrupt, simulate_interrupt};
use crate::arch::{Cpu, CpuOps};
use crate::sched::host::{self, HOST_THREADS};
use crate::sys::Priority;

const IRQ: WorkerType = WorkerType::Ordinary(WorkerKind::Irq);
const FINALIZE: WorkerType = WorkerType::Ordinary(WorkerKind::Finalize);
const CLEANUP: WorkerType = WorkerType::Ordinary(WorkerKind::Cleanup);

fn wait_for(what: &str, cond: impl Fn() -> bool) {
    let deadline = Instant::now() + Duration::from_secs(10);
    while !cond() {
        assert!(Instant::now() < deadline, "timeout esperando: {what}");
        thread::sleep(Duration::from_millis(1));
    }
}

/// Slot próprio do teste, fora da tabela global.
fn new_manager(wt: WorkerType) -> &'static WorkerTaskManager {
    host::install();
    Box::leak(Box::new(WorkerTaskManager::new(wt)))
}

fn active_manager(wt: WorkerType) -> &'static WorkerTaskManager {
    let manager = new_manager(wt);
    manager.initialize(DEFAULT_WORKER_PRIORITY);
    manager
}

type Log = Mutex<Vec<usize>>;

fn new_log() -> &'static Log {
    Box::leak(Box::new(Mutex::new(Vec::new())))
}

/// Task que registra seu id num log compartilhado.
struct RecordingTask {
    links: TaskLinks,
    id: usize,
    log: &'static Log,
    runs: AtomicUsize,
    irqs_enabled: AtomicBool,
}

impl RecordingTask {
    fn leak(id: usize, log: &'static Log) -> &'static Self {
        Box::leak(Box::new(Self {
            links: TaskLinks::new(),
            id,
            log,
            runs: AtomicUsize::new(0),
            irqs_enabled: AtomicBool::new(false),
        }))
    }

    fn runs(&self) -> usize {
        self.runs.load(Ordering::Acquire)
    }
}

impl WorkerTask for RecordingTask {
    fn links(&self) -> &TaskLinks {
        &self.links
    }

    fn do_worker_task(&self) {
        self.irqs_enabled
            .store(Cpu::are_interrupts_enabled(), Ordering::Release);
        self.log.lock().unwrap().push(self.id);
        self.runs.fetch_add(1, Ordering::AcqRel);
    }
}

/// Task que segura o worker até `open` virar true.
struct GateTask {
    links: TaskLinks,
    open: AtomicBool,
    entered: AtomicBool,
}

impl GateTask {
    fn leak() -> &'static Self {
        Box::leak(Box::new(Self {
            links: TaskLinks::new(),
            open: AtomicBool::new(false),
            entered: AtomicBool::new(false),
        }))
    }

    fn open(&self) {
        self.open.store(true, Ordering::Release);
    }

    fn has_entered(&self) -> bool {
        self.entered.load(Ordering::Acquire)
    }
}

impl WorkerTask for GateTask {
    fn links(&self) -> &TaskLinks {
        &self.links
    }

    fn do_worker_task(&self) {
        self.entered.store(true, Ordering::Release);
        while !self.open.load(Ordering::Acquire) {
            thread::sleep(Duration::from_millis(1));
        }
    }
}

fn logged(log: &Log) -> Vec<usize> {
    log.lock().unwrap().clone()
}

// =============================================================================
// Inicialização
// =============================================================================

#[test]
fn test_initialize_spawns_named_thread_with_priority() {
    let manager = new_manager(FINALIZE);
    assert!(!manager.is_active());
    assert_eq!(manager.thread_id(), None);
    assert_eq!(manager.status(), WorkerStatus::empty());

    manager.initialize(Priority::new(20));

    assert!(manager.is_active());
    let tid = manager.thread_id().unwrap();
    assert_eq!(HOST_THREADS.priority_of(tid), Some(Priority::new(20)));
    assert_eq!(HOST_THREADS.name_of(tid), Some("kworker/finalize"));
    wait_for("worker dormir", || manager.is_idle());
}

#[test]
#[should_panic(expected = "initialize chamado duas vezes")]
fn test_double_initialize_panics() {
    let manager = active_manager(IRQ);
    manager.initialize(DEFAULT_WORKER_PRIORITY);
}

#[test]
#[should_panic(expected = "EXIT_WORKER_PRIORITY")]
fn test_exit_worker_rejects_other_priority() {
    let manager = new_manager(WorkerType::Exit);
    manager.initialize(DEFAULT_WORKER_PRIORITY);
}

#[test]
#[should_panic(expected = "falha ao criar")]
fn test_spawn_failure_panics() {
    let manager = new_manager(CLEANUP);
    manager.initialize(Priority::new(u8::MAX));
}

// =============================================================================
// Submissão e execução
// =============================================================================

#[test]
fn test_tasks_run_in_submission_order() {
    let manager = active_manager(IRQ);
    let log = new_log();
    let tasks: Vec<_> = (0..100).map(|id| RecordingTask::leak(id, log)).collect();

    for task in &tasks {
        manager.add_task(*task);
    }

    wait_for("100 tasks", || manager.executed() == 100);
    assert_eq!(logged(log), (0..100).collect::<Vec<_>>());
    assert!(tasks.iter().all(|task| task.runs() == 1));
    assert!(tasks.iter().all(|task| !task.links().is_queued()));
    wait_for("worker dormir", || manager.is_idle());
    assert_eq!(manager.pending(), 0);
}

#[test]
fn test_three_contexts_while_parked() {
    let manager = active_manager(IRQ);
    wait_for("worker dormir", || manager.is_idle());

    let log = new_log();
    let t1 = RecordingTask::leak(1, log);
    let t2 = RecordingTask::leak(2, log);
    let t3 = RecordingTask::leak(3, log);

    // t1: handler de interrupção na CPU "0"
    simulate_interrupt(|| {
        assert!(in_interrupt());
        manager.add_task(t1);
    });
    // t2: outra thread
    thread::spawn(move || manager.add_task(t2)).join().unwrap();
    // t3: contexto de thread comum
    manager.add_task(t3);

    wait_for("três tasks", || manager.executed() == 3);
    assert_eq!(logged(log), [1, 2, 3]);
    for task in [t1, t2, t3] {
        assert_eq!(task.runs(), 1);
        assert!(task.irqs_enabled.load(Ordering::Acquire));
    }
    wait_for("worker dormir", || manager.is_idle());
}

#[test]
fn test_idle_worker_wakes_on_each_submit() {
    let manager = active_manager(CLEANUP);
    let log = new_log();

    for round in 0..5 {
        wait_for("worker dormir", || manager.is_idle());
        assert_eq!(manager.status(), WorkerStatus::WAITING);

        manager.add_task(RecordingTask::leak(round, log));
        wait_for("task da rodada", || manager.executed() == round as u64 + 1);
    }

    assert_eq!(logged(log), [0, 1, 2, 3, 4]);
}

#[test]
fn test_concurrent_producers_each_task_runs_once() {
    const PRODUCERS: usize = 6;
    const PER_PRODUCER: usize = 500;

    let manager = active_manager(FINALIZE);
    let log = new_log();

    let handles: Vec<_> = (0..PRODUCERS)
        .map(|producer| {
            let tasks: Vec<_> = (0..PER_PRODUCER)
                .map(|seq| RecordingTask::leak(producer * PER_PRODUCER + seq, log))
                .collect();
            thread::spawn(move || {
                for task in tasks {
                    // Metade dos produtores submete de dentro de um "handler".
                    if producer % 2 == 0 {
                        simulate_interrupt(|| manager.add_task(task));
                    } else {
                        manager.add_task(task);
                    }
                }
            })
        })
        .collect();

    for handle in handles {
        handle.join().unwrap();
    }

    let total = PRODUCERS * PER_PRODUCER;
    wait_for("todas as tasks", || manager.executed() == total as u64);

    let log = logged(log);
    assert_eq!(log.len(), total);

    let mut seen = vec![false; total];
    for &id in &log {
        assert!(!seen[id], "task {id} executada duas vezes");
        seen[id] = true;
    }

    // FIFO por produtor: a ordem relativa de cada um se mantém.
    let mut last = [None::<usize>; PRODUCERS];
    for &id in &log {
        let producer = id / PER_PRODUCER;
        if let Some(prev) = last[producer] {
            assert!(id > prev, "produtor {producer}: {id} depois de {prev}");
        }
        last[producer] = Some(id);
    }

    wait_for("worker dormir", || manager.is_idle());
}

/// Task que se reenfileira enquanto executa.
struct RequeueTask {
    links: TaskLinks,
    manager: &'static WorkerTaskManager,
    remaining: AtomicUsize,
}

impl WorkerTask for RequeueTask {
    fn links(&self) -> &TaskLinks {
        &self.links
    }

    fn do_worker_task(&self) {
        assert!(!self.links.is_queued());
        if self.remaining.fetch_sub(1, Ordering::AcqRel) > 1 {
            // SAFETY: a task é vazada pelo teste.
            unsafe {
                let this: &(dyn WorkerTask + 'static) = self;
                self.manager.add_task_raw(NonNull::from(this));
            }
        }
    }
}

#[test]
fn test_task_can_resubmit_itself_while_running() {
    let manager = active_manager(CLEANUP);
    let task: &'static RequeueTask = Box::leak(Box::new(RequeueTask {
        links: TaskLinks::new(),
        manager,
        remaining: AtomicUsize::new(10),
    }));

    manager.add_task(task);

    wait_for("dez execuções", || manager.executed() == 10);
    wait_for("worker dormir", || manager.is_idle());
    assert_eq!(task.remaining.load(Ordering::Acquire), 0);
}

#[test]
fn test_stalled_category_does_not_block_others() {
    let stalled = active_manager(IRQ);
    let other = active_manager(CLEANUP);

    let gate = GateTask::leak();
    let stalled_log = new_log();
    let other_log = new_log();

    stalled.add_task(gate);
    let behind_gate = RecordingTask::leak(99, stalled_log);
    stalled.add_task(behind_gate);
    wait_for("gate começar", || gate.has_entered());

    for id in 0..10 {
        other.add_task(RecordingTask::leak(id, other_log));
    }
    wait_for("outra categoria esvaziar", || other.executed() == 10);

    assert_eq!(logged(&other_log), (0..10).collect::<Vec<_>>());
    assert!(logged(stalled_log).is_empty());
    assert_eq!(stalled.status(), WorkerStatus::EXECUTING);
    assert_eq!(stalled.pending(), 1);
    assert!(behind_gate.links().is_queued());

    gate.open();
    wait_for("categoria travada terminar", || stalled.executed() == 2);
    assert_eq!(logged(stalled_log), [99]);
}

#[test]
fn test_fn_task_runs_function() {
    static CALLS: AtomicUsize = AtomicUsize::new(0);
    static BUMP: FnTask = FnTask::new(bump);

    fn bump() {
        CALLS.fetch_add(1, Ordering::AcqRel);
    }

    let manager = active_manager(FINALIZE);
    manager.add_task(&BUMP);
    wait_for("primeira chamada", || CALLS.load(Ordering::Acquire) == 1);
    wait_for("task liberada", || !BUMP.links().is_queued());

    // Depois de executar, a mesma task estática pode ser submetida de novo.
    manager.add_task(&BUMP);
    wait_for("segunda chamada", || CALLS.load(Ordering::Acquire) == 2);
}

// =============================================================================
// Worker de saída
// =============================================================================

#[test]
fn test_exit_worker_terminates_after_one_task() {
    let manager = new_manager(WorkerType::Exit);
    manager.initialize(EXIT_WORKER_PRIORITY);
    let tid = manager.thread_id().unwrap();
    assert_eq!(HOST_THREADS.priority_of(tid), Some(EXIT_WORKER_PRIORITY));

    let log = new_log();
    let task = RecordingTask::leak(7, log);
    manager.add_task(task);

    wait_for("thread encerrar", || HOST_THREADS.has_exited(tid));
    assert_eq!(manager.status(), WorkerStatus::EXITED);
    assert_eq!(manager.executed(), 1);
    assert_eq!(task.runs(), 1);
    assert_eq!(logged(log), [7]);
}

#[test]
#[should_panic(expected = "já encerrado")]
fn test_submit_after_exit_panics() {
    let manager = new_manager(WorkerType::Exit);
    manager.initialize(EXIT_WORKER_PRIORITY);
    let tid = manager.thread_id().unwrap();

    let log = new_log();
    manager.add_task(RecordingTask::leak(0, log));
    wait_for("thread encerrar", || HOST_THREADS.has_exited(tid));

    manager.add_task(RecordingTask::leak(1, log));
}

// =============================================================================
// Violações de contrato
// =============================================================================

#[test]
#[should_panic(expected = "worker inativo")]
fn test_submit_to_inactive_slot_panics() {
    let manager = new_manager(IRQ);
    manager.add_task(RecordingTask::leak(0, new_log()));
}

#[test]
#[should_panic(expected = "ainda enfileirada")]
fn test_double_submission_panics() {
    let manager = active_manager(IRQ);
    let gate = GateTask::leak();
    manager.add_task(gate);
    wait_for("gate começar", || gate.has_entered());

    let task = RecordingTask::leak(0, new_log());
    manager.add_task(task);
    manager.add_task(task);
}

// =============================================================================
// Tabela global e autotestes
// =============================================================================

#[test]
fn test_global_slots_match_worker_types() {
    for wt in WorkerType::ALL {
        assert_eq!(super::manager(wt).worker_type(), wt);
    }
    assert_eq!(WorkerType::ALL.len(), WorkerType::COUNT);
    assert_eq!(IRQ.thread_name(), "kworker/irq");
    assert_eq!(WorkerType::Exit.thread_name(), "kworker/exit");
}

static IRQ_CALLS: AtomicUsize = AtomicUsize::new(0);
static FINALIZE_CALLS: AtomicUsize = AtomicUsize::new(0);
static CLEANUP_CALLS: AtomicUsize = AtomicUsize::new(0);
static EXIT_CALLS: AtomicUsize = AtomicUsize::new(0);

fn count_irq() {
    IRQ_CALLS.fetch_add(1, Ordering::AcqRel);
}

fn count_finalize() {
    FINALIZE_CALLS.fetch_add(1, Ordering::AcqRel);
}

fn count_cleanup() {
    CLEANUP_CALLS.fetch_add(1, Ordering::AcqRel);
}

fn count_exit() {
    EXIT_CALLS.fetch_add(1, Ordering::AcqRel);
}

static IRQ_TASK: FnTask = FnTask::new(count_irq);
static FINALIZE_TASK: FnTask = FnTask::new(count_finalize);
static CLEANUP_TASK: FnTask = FnTask::new(count_cleanup);
static EXIT_TASK: FnTask = FnTask::new(count_exit);

/// Único teste que toca a tabela global.
#[test]
fn test_init_workers_boots_every_slot() {
    host::install();
    super::init_workers(DEFAULT_WORKER_PRIORITY);

    for wt in WorkerType::ALL {
        let manager = super::manager(wt);
        assert!(manager.is_active());
        let expected = if wt.is_exit() {
            EXIT_WORKER_PRIORITY
        } else {
            DEFAULT_WORKER_PRIORITY
        };
        let tid = manager.thread_id().unwrap();
        assert_eq!(HOST_THREADS.priority_of(tid), Some(expected));
    }

    super::add_task(IRQ, &IRQ_TASK);
    super::add_task(FINALIZE, &FINALIZE_TASK);
    // SAFETY: task estática.
    unsafe {
        let task: &'static dyn WorkerTask = &CLEANUP_TASK;
        super::add_task_raw(CLEANUP, NonNull::from(task))
    };

    wait_for("workers comuns", || {
        IRQ_CALLS.load(Ordering::Acquire) == 1
            && FINALIZE_CALLS.load(Ordering::Acquire) == 1
            && CLEANUP_CALLS.load(Ordering::Acquire) == 1
    });

    let exit = super::manager(WorkerType::Exit);
    super::add_task(WorkerType::Exit, &EXIT_TASK);
    wait_for("worker de saída", || exit.status() == WorkerStatus::EXITED);
    assert_eq!(EXIT_CALLS.load(Ordering::Acquire), 1);

    // Os comuns continuam servindo depois do encerramento do de saída.
    super::add_task(IRQ, &IRQ_TASK);
    wait_for("segunda rodada irq", || IRQ_CALLS.load(Ordering::Acquire) == 2);
}

#[cfg(feature = "self_test")]
#[test]
fn test_self_test_suite_passes() {
    let report = super::test::run_work_tests();
    assert!(report.all_passed(), "{report:?}");
    assert_eq!(report.passed, 6);
}
