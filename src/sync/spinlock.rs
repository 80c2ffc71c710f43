//! Spinlock - bloqueio com busy-wait e IRQs desabilitadas

use core::cell::UnsafeCell;
use core::ops::{Deref, DerefMut};
use core::sync::atomic::{AtomicBool, Ordering};

use crate::arch::{Cpu, CpuOps, InterruptGuard};

/// Spinlock - usa busy-wait, NÃO pode dormir
///
/// Interrupções da CPU local ficam desabilitadas enquanto o guard existir,
/// então o lock pode ser tomado tanto em contexto de thread quanto dentro de
/// um handler de IRQ sem risco de deadlock na mesma CPU.
///
/// # Quando usar
///
/// - Seções críticas MUITO curtas (ex: splice de ponteiros de uma fila)
/// - Dentro de handlers de interrupção
/// - Quando não pode chamar scheduler
///
/// # Quando NÃO usar
///
/// - Seções que podem demorar
/// - Quando pode chamar funções que dormem
pub struct Spinlock<T> {
    locked: AtomicBool,
    data: UnsafeCell<T>,
}

// SAFETY: Spinlock protege acesso com lock atômico
unsafe impl<T: Send> Send for Spinlock<T> {}
unsafe impl<T: Send> Sync for Spinlock<T> {}

impl<T> Spinlock<T> {
    /// Cria novo spinlock
    pub const fn new(data: T) -> Self {
        Self {
            locked: AtomicBool::new(false),
            data: UnsafeCell::new(data),
        }
    }

    /// Adquire o lock
    pub fn lock(&self) -> SpinlockGuard<'_, T> {
        // Desabilitar interrupções antes de adquirir
        let irq = InterruptGuard::new();

        while self
            .locked
            .compare_exchange_weak(false, true, Ordering::Acquire, Ordering::Relaxed)
            .is_err()
        {
            // Spin só com leitura até parecer livre (menos tráfego de cache)
            while self.locked.load(Ordering::Relaxed) {
                Cpu::relax();
            }
        }

        SpinlockGuard { lock: self, _irq: irq }
    }

    /// Tenta adquirir sem bloquear
    pub fn try_lock(&self) -> Option<SpinlockGuard<'_, T>> {
        let irq = InterruptGuard::new();

        if self
            .locked
            .compare_exchange(false, true, Ordering::Acquire, Ordering::Relaxed)
            .is_ok()
        {
            Some(SpinlockGuard { lock: self, _irq: irq })
        } else {
            // Não conseguiu: o drop de `irq` restaura as interrupções
            None
        }
    }

    /// O lock está tomado neste instante? (apenas diagnóstico)
    pub fn is_locked(&self) -> bool {
        self.locked.load(Ordering::Relaxed)
    }
}

/// Guard do spinlock - libera ao sair do escopo
pub struct SpinlockGuard<'a, T> {
    lock: &'a Spinlock<T>,
    // Dropado DEPOIS de Drop::drop liberar o lock: IRQs voltam por último.
    _irq: InterruptGuard,
}

impl<T> Deref for SpinlockGuard<'_, T> {
    type Target = T;

    fn deref(&self) -> &T {
        // SAFETY: Lock está adquirido
        unsafe { &*self.lock.data.get() }
    }
}

impl<T> DerefMut for SpinlockGuard<'_, T> {
    fn deref_mut(&mut self) -> &mut T {
        // SAFETY: Lock está adquirido
        unsafe { &mut *self.lock.data.get() }
    }
}

impl<T> Drop for SpinlockGuard<'_, T> {
    fn drop(&mut self) {
        self.lock.locked.store(false, Ordering::Release);
    }
}
