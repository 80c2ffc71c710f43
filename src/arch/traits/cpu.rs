//! Interface Abstrata de CPU (HAL).
//! Define as operações que qualquer arquitetura (x86, ARM, RISC-V) ou o
//! backend hospedado deve implementar.

pub trait CpuOps {
    /// Dica para a CPU de que estamos em spin loop (PAUSE).
    #[inline]
    fn relax() {
        core::hint::spin_loop();
    }

    /// Desabilita interrupções na CPU local (CLI).
    ///
    /// # Safety
    /// Requer privilégios de kernel. Quem desabilita é responsável por
    /// restaurar o estado anterior (ver `InterruptGuard`).
    unsafe fn disable_interrupts();

    /// Habilita interrupções na CPU local (STI).
    ///
    /// # Safety
    /// Pode causar preempção imediata.
    unsafe fn enable_interrupts();

    /// Verifica se as interrupções estão habilitadas.
    fn are_interrupts_enabled() -> bool;
}
