// =============================================================================
// SERIAL DRIVER - ZERO OVERHEAD
// =============================================================================
//
// Sink dos macros de log (kinfo!, kerror!, ...).
//
// ARQUITETURA:
// - SEM Mutex/Spinlock - Escrita direta, seguro de chamar com IRQs off
// - SEM core::fmt - Apenas strings literais e valores imediatos
// - SEM alocação no bare-metal
// - A COM1 já chega configurada pelo bootloader; aqui só se transmite
//
// BACKENDS:
// - Bare-metal x86_64: UART 16550 em COM1 (0x3F8) via port I/O.
// - Hospedado: stderr (eprintln!). Cada thread acumula a linha corrente e
//   a emite inteira no emit_nl(), para que linhas de workers diferentes não
//   se misturem no meio.
//
// FUNÇÕES DISPONÍVEIS:
// - emit(byte)       : Envia um byte
// - emit_str(s)      : Envia string literal
// - emit_hex(v)      : Envia u64 em hexadecimal
// - emit_nl()        : Envia newline
//
// =============================================================================

#[cfg(all(target_os = "none", target_arch = "x86_64"))]
mod backend {
    use crate::arch::x86_64::ports::{inb, outb};

    // Porta de dados da COM1
    const COM1_DATA: u16 = 0x3F8;

    // Porta de status da COM1 (Line Status Register)
    const COM1_STATUS: u16 = COM1_DATA + 5;

    /// Bit 5 do LSR: buffer de transmissão vazio
    const LSR_THR_EMPTY: u8 = 0x20;

    #[inline(always)]
    pub fn emit(byte: u8) {
        while inb(COM1_STATUS) & LSR_THR_EMPTY == 0 {
            core::hint::spin_loop();
        }
        outb(COM1_DATA, byte);
    }

    pub fn emit_nl() {
        emit(b'\r');
        emit(b'\n');
    }
}

#[cfg(not(target_os = "none"))]
mod backend {
    use std::cell::RefCell;
    use std::string::String;
    use std::vec::Vec;

    std::thread_local! {
        static LINE: RefCell<Vec<u8>> = const { RefCell::new(Vec::new()) };
    }

    #[inline]
    pub fn emit(byte: u8) {
        LINE.with(|line| line.borrow_mut().push(byte));
    }

    pub fn emit_nl() {
        LINE.with(|line| {
            let mut line = line.borrow_mut();
            // eprint! passa pela captura do harness de testes.
            std::eprintln!("{}", String::from_utf8_lossy(&line));
            line.clear();
        });
    }
}

/// Envia um único byte.
#[inline(always)]
pub fn emit(byte: u8) {
    backend::emit(byte);
}

/// Envia uma string.
#[inline(never)]
pub fn emit_str(s: &str) {
    for byte in s.bytes() {
        emit(byte);
    }
}

/// Envia uma nova linha.
#[inline(never)]
pub fn emit_nl() {
    backend::emit_nl();
}

/// Envia um valor u64 em formato hexadecimal.
///
/// Formato de saída: 0x0123456789ABCDEF (sempre 18 caracteres)
#[inline(never)]
pub fn emit_hex(value: u64) {
    emit(b'0');
    emit(b'x');
    for shift in (0..16).rev() {
        emit(nibble_to_ascii(((value >> (shift * 4)) & 0xF) as u8));
    }
}

#[inline(always)]
const fn nibble_to_ascii(nibble: u8) -> u8 {
    if nibble < 10 {
        b'0' + nibble
    } else {
        b'A' + nibble - 10
    }
}
