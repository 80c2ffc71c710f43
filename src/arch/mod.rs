//! # Hardware Abstraction Layer (HAL)
//!
//! O módulo `arch` é a **única** ponte entre a lógica do gerenciador de
//! worker tasks e o hardware real. O que interessa aqui é uma única
//! capacidade: mascarar interrupções na CPU local pelo menor tempo possível.
//!
//! ## 🏗️ Seleção de Plataforma
//! 1. O código agnóstico importa `crate::arch::Cpu`.
//! 2. `Cpu` é um *type alias* para a implementação concreta:
//!    - `x86_64::X64Cpu` em alvos bare-metal (`cli`, `sti`, `pushfq`, `pause`);
//!    - `host::HostCpu` em alvos hospedados, que emula a flag IF por thread
//!      e permite simular contexto de interrupção nos testes.
//! 3. `InterruptGuard` é o equivalente RAII de "desabilitar interrupções e
//!    restaurar o estado anterior ao sair do escopo".

pub mod traits;

// Seleção de Arquitetura: x86_64 bare-metal
#[cfg(all(target_os = "none", target_arch = "x86_64"))]
pub mod x86_64;

#[cfg(all(target_os = "none", target_arch = "x86_64"))]
pub use self::x86_64 as platform;

// Alvos hospedados: emulação sobre a std
#[cfg(not(target_os = "none"))]
pub mod host;

#[cfg(not(target_os = "none"))]
pub use self::host as platform;

pub use platform::Cpu;
pub use traits::*;

/// Seção crítica local: interrupções ficam desabilitadas enquanto o guard
/// existir, e o estado anterior é restaurado no `drop`.
///
/// Guards aninhados são seguros: só o mais externo reabilita.
pub struct InterruptGuard {
    were_enabled: bool,
}

impl InterruptGuard {
    /// Desabilita interrupções na CPU local.
    #[inline]
    pub fn new() -> Self {
        let were_enabled = Cpu::are_interrupts_enabled();
        // SAFETY: o estado anterior é restaurado no Drop.
        unsafe { Cpu::disable_interrupts() };
        Self { were_enabled }
    }

    /// As interrupções estavam habilitadas antes deste guard?
    #[inline]
    pub fn were_enabled(&self) -> bool {
        self.were_enabled
    }
}

impl Default for InterruptGuard {
    fn default() -> Self {
        Self::new()
    }
}

impl Drop for InterruptGuard {
    #[inline]
    fn drop(&mut self) {
        if self.were_enabled {
            // SAFETY: estavam habilitadas quando o guard foi criado.
            unsafe { Cpu::enable_interrupts() };
        }
    }
}
