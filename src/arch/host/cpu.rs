//! CPU emulada para alvos hospedados.
//!
//! Cada thread da std faz o papel de uma CPU lógica: a flag IF é um
//! `thread_local`, e `simulate_interrupt` reproduz a entrada num handler
//! de IRQ (IF=0 durante o handler, restaurada no retorno).

use crate::arch::traits::cpu::CpuOps;
use crate::arch::InterruptGuard;
use std::cell::Cell;

std::thread_local! {
    static INTERRUPTS_ENABLED: Cell<bool> = const { Cell::new(true) };
    static IRQ_DEPTH: Cell<u32> = const { Cell::new(0) };
}

pub struct HostCpu;

impl CpuOps for HostCpu {
    #[inline]
    fn relax() {
        std::thread::yield_now();
    }

    #[inline]
    unsafe fn disable_interrupts() {
        INTERRUPTS_ENABLED.with(|flag| flag.set(false));
    }

    #[inline]
    unsafe fn enable_interrupts() {
        INTERRUPTS_ENABLED.with(|flag| flag.set(true));
    }

    #[inline]
    fn are_interrupts_enabled() -> bool {
        INTERRUPTS_ENABLED.with(|flag| flag.get())
    }
}

struct IrqFrame;

impl IrqFrame {
    fn enter() -> Self {
        IRQ_DEPTH.with(|depth| depth.set(depth.get() + 1));
        IrqFrame
    }
}

impl Drop for IrqFrame {
    fn drop(&mut self) {
        IRQ_DEPTH.with(|depth| depth.set(depth.get() - 1));
    }
}

/// Executa `f` como se fosse um handler de interrupção da CPU corrente.
pub fn simulate_interrupt<R>(f: impl FnOnce() -> R) -> R {
    let _irq_off = InterruptGuard::new();
    let _frame = IrqFrame::enter();
    f()
}

/// A thread corrente está dentro de um handler simulado?
pub fn in_interrupt() -> bool {
    IRQ_DEPTH.with(|depth| depth.get() > 0)
}
