//! Implementação x86_64 das operações de CPU (HAL).
//!
//! Usa Assembly inline para o controle de interrupções da CPU local.
//!
//! # Segurança
//! Esta implementação assume que o código está rodando em modo longo (64-bit)
//! e nível de privilégio de kernel (Ring 0).

use crate::arch::traits::cpu::CpuOps;
use core::arch::asm;

/// Bit 9 de RFLAGS: IF (Interrupt Flag)
const RFLAGS_IF: u64 = 1 << 9;

pub struct X64Cpu;

impl CpuOps for X64Cpu {
    /// Dica para a CPU que estamos em um spinloop (PAUSE).
    #[inline]
    fn relax() {
        unsafe {
            asm!("pause", options(nomem, nostack, preserves_flags));
        }
    }

    /// Desabilita interrupções (CLI).
    ///
    /// # Safety
    /// Requer privilégios de Ring 0.
    #[inline]
    unsafe fn disable_interrupts() {
        asm!("cli", options(nomem, nostack));
    }

    /// Habilita interrupções (STI).
    ///
    /// # Safety
    /// Requer privilégios de Ring 0. Pode causar preempção imediata.
    #[inline]
    unsafe fn enable_interrupts() {
        asm!("sti", options(nomem, nostack));
    }

    /// Verifica se as interrupções estão habilitadas (RFLAGS.IF).
    #[inline]
    fn are_interrupts_enabled() -> bool {
        let rflags: u64;
        unsafe {
            // PUSHFQ empilha RFLAGS, POP retira para registrador.
            asm!("pushfq; pop {}", out(reg) rflags, options(nomem, preserves_flags));
        }
        (rflags & RFLAGS_IF) != 0
    }
}
