//! Diagnostics for denied attaches
//!
//! `PTRACE_ATTACH` answers `EPERM` for several unrelated reasons. This module
//! inspects the system to turn that into an actionable message.

#![allow(unsafe_code)] // geteuid() requires unsafe

use std::fs;

const PTRACE_SCOPE_PATH: &str = "/proc/sys/kernel/yama/ptrace_scope";

/// Yama LSM restriction level for ptrace
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PtraceScope {
    /// 0: any process with the same uid may be traced
    Classic,
    /// 1: only descendants may be traced without `CAP_SYS_PTRACE`
    Restricted,
    /// 2: only processes with `CAP_SYS_PTRACE` may trace
    AdminOnly,
    /// 3: tracing is disabled until reboot
    Disabled,
}

impl PtraceScope {
    fn parse(content: &str) -> Option<Self> {
        match content.trim() {
            "0" => Some(Self::Classic),
            "1" => Some(Self::Restricted),
            "2" => Some(Self::AdminOnly),
            "3" => Some(Self::Disabled),
            _ => None,
        }
    }
}

/// Current Yama ptrace scope, `None` if Yama is not enabled.
#[must_use]
pub fn ptrace_scope() -> Option<PtraceScope> {
    let content = fs::read_to_string(PTRACE_SCOPE_PATH).ok()?;
    PtraceScope::parse(&content)
}

#[must_use]
pub fn is_root() -> bool {
    // SAFETY: geteuid() has no preconditions and cannot fail
    unsafe { libc::geteuid() == 0 }
}

/// Explain why an attach was probably denied.
#[must_use]
pub fn ptrace_denied_hint() -> Option<String> {
    hint_for(ptrace_scope(), is_root())
}

fn hint_for(scope: Option<PtraceScope>, root: bool) -> Option<String> {
    match (scope, root) {
        (Some(PtraceScope::Disabled), _) => Some(format!(
            "ptrace is disabled on this system ({PTRACE_SCOPE_PATH} = 3) until the next reboot"
        )),
        (Some(PtraceScope::AdminOnly), false) => Some(format!(
            "{PTRACE_SCOPE_PATH} = 2 allows only CAP_SYS_PTRACE to attach.\n\
             Run with: sudo pstrings ..."
        )),
        (Some(PtraceScope::Restricted), false) => Some(format!(
            "{PTRACE_SCOPE_PATH} = 1 only allows attaching to your own descendants.\n\
             Run with: sudo pstrings ...  (or set the sysctl kernel.yama.ptrace_scope=0)"
        )),
        (_, false) => Some(
            "Only processes of your own user can be inspected.\n\
             Run with: sudo pstrings ..."
                .to_string(),
        ),
        (_, true) => None,
    }
}
