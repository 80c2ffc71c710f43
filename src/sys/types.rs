//! Tipos fundamentais do sistema

/// Thread ID
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(transparent)]
pub struct Tid(pub u32);

impl Tid {
    /// Contexto sem thread de kernel associada (boot, IRQ, threads externas).
    pub const KERNEL: Tid = Tid(0);

    pub const fn new(id: u32) -> Self {
        Self(id)
    }

    pub const fn as_u32(self) -> u32 {
        self.0
    }
}

/// Prioridade de escalonamento.
///
/// Valor numérico MENOR = mais urgente (0 é a prioridade mais alta).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[repr(transparent)]
pub struct Priority(pub u8);

impl Priority {
    pub const fn new(value: u8) -> Self {
        Self(value)
    }

    pub const fn as_u8(self) -> u8 {
        self.0
    }

    /// `self` é escalonada antes de `other`?
    pub const fn is_more_urgent_than(self, other: Priority) -> bool {
        self.0 < other.0
    }
}
