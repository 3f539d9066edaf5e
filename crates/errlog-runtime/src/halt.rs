//! Fatal-error halt path
//!
//! After a fatal record is stored and the hook has run, the reporter prints
//! the error report and hands the record to the halt handler, which must
//! never return. The default handler aborts the process; tests install one
//! that panics so the fatal path can be observed with `catch_unwind`.

use std::io::Write;

use errlog_core::record::ErrorRecord;
use errlog_core::{kerror, kprintln};

/// Called with the fatal record as the last act of `log_fatal`.
pub type HaltHandler = fn(&ErrorRecord) -> !;

/// Default handler: abort without unwinding.
pub fn abort_handler(record: &ErrorRecord) -> ! {
    kerror!("halting on fatal error #{} ({})", record.sequence, record.status);
    let _ = std::io::stderr().flush();
    std::process::abort()
}

/// Print the multi-line error report and flush, whatever the flush setting.
pub fn print_report(record: &ErrorRecord) {
    kprintln!();
    kprintln!("{}", record);
    kprintln!("-- Error Info --");
    let _ = std::io::stderr().flush();
}
