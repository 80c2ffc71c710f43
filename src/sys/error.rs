//! # Standard Error Codes (Errno)
//!
//! Códigos de erro na fronteira com o scheduler. Segue a numeração
//! POSIX/Linux para facilitar o entendimento.
//!
//! O gerenciador de worker tasks em si não tem erros recuperáveis: violações
//! de contrato são pânicos. `Errno` só aparece onde o ambiente pode falhar de
//! verdade, isto é, na criação de threads (`ThreadOps::spawn`).

#[repr(i32)]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Errno {
    EAGAIN = 11, // Try again (sem slots de thread)
    ENOMEM = 12, // Out of memory (stack de kernel)
    EINVAL = 22, // Invalid argument (prioridade fora da faixa)
}

impl Errno {
    /// Nome curto para os logs (que não usam core::fmt).
    pub const fn as_str(self) -> &'static str {
        match self {
            Errno::EAGAIN => "EAGAIN",
            Errno::ENOMEM => "ENOMEM",
            Errno::EINVAL => "EINVAL",
        }
    }
}

impl core::fmt::Display for Errno {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.as_str())
    }
}
