// =============================================================================
// KERNEL LOGGING SYSTEM - ZERO OVERHEAD
// =============================================================================
//
// Logging do kernel com custo ZERO quando desabilitado.
//
// ARQUITETURA:
// - Features do Cargo fazem o filtro em compile-time
// - Com feature "no_logs", TODOS os macros viram expressões vazias
// - SEM core::fmt - seguro em contexto de interrupção e com IRQs off
// - SEM alocação - Apenas strings literais + um valor em hex
// - Escreve APENAS na serial (drivers::serial)
//
// NÍVEIS DE LOG (do mais crítico ao menos):
// - ERROR: Erros fatais ou violações de contrato
// - WARN:  Situações suspeitas mas recuperáveis
// - INFO:  Fluxo normal (init de workers, encerramento do worker de saída)
// - DEBUG: Informações de debugging
// - TRACE: Detalhes extremos
//
// FEATURES:
// - no_logs:   Remove 100% dos logs
// - log_error: ERROR, WARN, [OK]
// - log_info:  + INFO
// - log_debug: + DEBUG
// - log_trace: Todos os níveis (padrão)
//
// COMO USAR:
//   kinfo!("(Work) Inicializando workers...");   // Apenas string
//   kdebug!("(Work) Worker tid=", tid.as_u32()); // String + hex
//
// =============================================================================

// =============================================================================
// PREFIXOS COM CORES ANSI
// =============================================================================

pub const P_ERROR: &str = "\x1b[1;31m[ERRO]\x1b[0m ";
pub const P_WARN: &str = "\x1b[1;33m[WARN]\x1b[0m ";
pub const P_INFO: &str = "\x1b[32m[INFO]\x1b[0m ";
pub const P_DEBUG: &str = "\x1b[36m[DEBG]\x1b[0m ";
pub const P_TRACE: &str = "\x1b[35m[TRAC]\x1b[0m ";
pub const P_OK: &str = "\x1b[32m[OK]\x1b[0m ";

/// Emite uma linha com prefixo. Usado pelos macros, não chamar direto.
#[doc(hidden)]
#[inline(never)]
pub fn emit_line(prefix: &str, msg: &str) {
    crate::drivers::serial::emit_str(prefix);
    crate::drivers::serial::emit_str(msg);
    crate::drivers::serial::emit_nl();
}

/// Emite uma linha com prefixo e um valor em hex. Usado pelos macros.
#[doc(hidden)]
#[inline(never)]
pub fn emit_line_hex(prefix: &str, msg: &str, value: u64) {
    crate::drivers::serial::emit_str(prefix);
    crate::drivers::serial::emit_str(msg);
    crate::drivers::serial::emit_hex(value);
    crate::drivers::serial::emit_nl();
}

// =============================================================================
// MACROS DE LOG - NÍVEL ERROR
// =============================================================================

#[cfg(not(feature = "no_logs"))]
#[macro_export]
macro_rules! kerror {
    ($msg:expr) => {{
        $crate::core::logging::emit_line($crate::core::logging::P_ERROR, $msg);
    }};
    ($msg:expr, $val:expr) => {{
        $crate::core::logging::emit_line_hex($crate::core::logging::P_ERROR, $msg, $val as u64);
    }};
}

#[cfg(feature = "no_logs")]
#[macro_export]
macro_rules! kerror {
    ($($t:tt)*) => {{}};
}

// =============================================================================
// MACROS DE LOG - NÍVEL WARN
// =============================================================================

#[cfg(not(feature = "no_logs"))]
#[macro_export]
macro_rules! kwarn {
    ($msg:expr) => {{
        $crate::core::logging::emit_line($crate::core::logging::P_WARN, $msg);
    }};
    ($msg:expr, $val:expr) => {{
        $crate::core::logging::emit_line_hex($crate::core::logging::P_WARN, $msg, $val as u64);
    }};
}

#[cfg(feature = "no_logs")]
#[macro_export]
macro_rules! kwarn {
    ($($t:tt)*) => {{}};
}

// =============================================================================
// MACROS DE LOG - NÍVEL INFO
// =============================================================================

#[cfg(not(any(feature = "no_logs", feature = "log_error")))]
#[macro_export]
macro_rules! kinfo {
    ($msg:expr) => {{
        $crate::core::logging::emit_line($crate::core::logging::P_INFO, $msg);
    }};
    ($msg:expr, $val:expr) => {{
        $crate::core::logging::emit_line_hex($crate::core::logging::P_INFO, $msg, $val as u64);
    }};
}

#[cfg(any(feature = "no_logs", feature = "log_error"))]
#[macro_export]
macro_rules! kinfo {
    ($($t:tt)*) => {{}};
}

// =============================================================================
// MACROS DE LOG - NÍVEL DEBUG
// =============================================================================

#[cfg(all(
    any(feature = "log_debug", feature = "log_trace"),
    not(feature = "no_logs")
))]
#[macro_export]
macro_rules! kdebug {
    ($msg:expr) => {{
        $crate::core::logging::emit_line($crate::core::logging::P_DEBUG, $msg);
    }};
    ($msg:expr, $val:expr) => {{
        $crate::core::logging::emit_line_hex($crate::core::logging::P_DEBUG, $msg, $val as u64);
    }};
}

#[cfg(not(all(
    any(feature = "log_debug", feature = "log_trace"),
    not(feature = "no_logs")
)))]
#[macro_export]
macro_rules! kdebug {
    ($($t:tt)*) => {{}};
}

// =============================================================================
// MACROS DE LOG - NÍVEL TRACE
// =============================================================================

#[cfg(all(feature = "log_trace", not(feature = "no_logs")))]
#[macro_export]
macro_rules! ktrace {
    ($msg:expr) => {{
        $crate::core::logging::emit_line($crate::core::logging::P_TRACE, $msg);
    }};
    ($msg:expr, $val:expr) => {{
        $crate::core::logging::emit_line_hex($crate::core::logging::P_TRACE, $msg, $val as u64);
    }};
}

#[cfg(not(all(feature = "log_trace", not(feature = "no_logs"))))]
#[macro_export]
macro_rules! ktrace {
    ($($t:tt)*) => {{}};
}

// =============================================================================
// MACROS DE STATUS (OK)
// =============================================================================

/// kok! - Log de sucesso (prefixo verde [OK]).
#[cfg(not(feature = "no_logs"))]
#[macro_export]
macro_rules! kok {
    ($msg:expr) => {{
        $crate::core::logging::emit_line($crate::core::logging::P_OK, $msg);
    }};
}

#[cfg(feature = "no_logs")]
#[macro_export]
macro_rules! kok {
    ($($t:tt)*) => {{}};
}
