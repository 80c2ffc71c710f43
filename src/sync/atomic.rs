//! Operações atômicas
//!
//! Dois usos no gerenciador: a flag "enfileirada" de cada task (detecção de
//! submissão dupla) e contadores monotônicos (tids do backend host, tasks
//! executadas por worker).

use core::fmt;
use core::sync::atomic::{AtomicBool, AtomicU64, Ordering};

/// Flag booleana com acquire/release.
///
/// `test_and_set` é o único ponto de disputa: entre dois produtores
/// submetendo a mesma task, exatamente um vê `false`.
pub struct AtomicFlag(AtomicBool);

impl AtomicFlag {
    pub const fn new(raised: bool) -> Self {
        Self(AtomicBool::new(raised))
    }

    #[inline]
    pub fn get(&self) -> bool {
        self.0.load(Ordering::Acquire)
    }

    /// Levanta a flag. Retorna o estado anterior.
    #[inline]
    pub fn test_and_set(&self) -> bool {
        self.0.swap(true, Ordering::AcqRel)
    }

    #[inline]
    pub fn clear(&self) {
        self.0.store(false, Ordering::Release);
    }
}

impl fmt::Debug for AtomicFlag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("AtomicFlag").field(&self.get()).finish()
    }
}

/// Contador que só cresce.
pub struct AtomicCounter(AtomicU64);

impl AtomicCounter {
    pub const fn new(start: u64) -> Self {
        Self(AtomicU64::new(start))
    }

    #[inline]
    pub fn get(&self) -> u64 {
        self.0.load(Ordering::Acquire)
    }

    /// Soma um e devolve o valor de antes (serve como gerador de ids).
    #[inline]
    pub fn inc(&self) -> u64 {
        self.0.fetch_add(1, Ordering::AcqRel)
    }
}

impl fmt::Debug for AtomicCounter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("AtomicCounter").field(&self.get()).finish()
    }
}
