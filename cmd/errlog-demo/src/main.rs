//! errlog walkthrough
//!
//! Logs warnings, reads them back through the first/last latches and the
//! history ring, saves the history to an in-memory volume and prints the
//! file, registers a hook, logs from a signal handler, and finally reports
//! a fatal error, which halts the process.
//!
//! # Environment Variables
//!
//! - `ERRLOG_LOG_LEVEL=info` - Show persister and hook diagnostics
//! - `ERRLOG_FLUSH_EPRINT=1` - Flush stderr after every line
//! - `ERRLOG_DEMO_HALT=0` - Stop before the fatal error instead of aborting

use std::time::Duration;

use errlog::{
    fatal, kinfo, status, warning, ErrorCode, ErrorRecord, FileSystem, HeapFileSystem, Module,
    OpenMode, Semaphore, Status, WaitSignal,
};

type StepResult = Result<(), String>;

static HOOK_FIRED: Semaphore = Semaphore::new(0);

fn my_error_hook(_record: &ErrorRecord) {
    HOOK_FIRED.signal();
}

// ERRLOG_LOG_LEVEL=info cargo run -p errlog-demo
fn main() {
    println!("=== errlog demo ===");
    let config = match errlog::init() {
        Ok(c) => c,
        Err(e) => {
            eprintln!("{}", e);
            std::process::exit(2);
        }
    };

    // Start from an empty log
    errlog::clear_all();

    run("logging and retrieving warnings", log_warnings);
    run("retrieving error history", get_history);
    run("saving error history", || save_history(&config.history_path));
    run("error hook", set_error_hook);
    #[cfg(unix)]
    run("logging from a signal handler", signal_context::log_from_handler);

    if !errlog::env_get_bool("ERRLOG_DEMO_HALT", true) {
        println!("\n{} errors logged; skipping the fatal error", errlog::error_count());
        return;
    }
    log_error();
}

fn run(name: &str, step: impl FnOnce() -> StepResult) {
    if let Err(e) = step() {
        println!("ERROR: {} failed: {}", name, e);
    }
}

fn expect_eq<T: PartialEq + std::fmt::Debug>(what: &str, got: T, want: T) -> StepResult {
    if got == want {
        Ok(())
    } else {
        Err(format!("{}: expected {:?}, got {:?}", what, want, got))
    }
}

fn log_warnings() -> StepResult {
    let invalid_arg = Status::system(Module::APPLICATION, ErrorCode::INVALID_ARGUMENT);
    let in_use = Status::system(Module::PLATFORM, ErrorCode::ALREADY_IN_USE);

    println!("\nReporting the following warnings:");
    for (s, v) in [(invalid_arg, 0x1234), (invalid_arg, 0x4567), (in_use, 0xABCD)] {
        warning!(s, "demo warning", v);
        println!("   {:<18} Status: {} Value: {:#X}", format!("{}", s.code()), s, v);
    }

    print!("Retrieving first error info logged... ");
    let first = errlog::first_error().map_err(|e| e.to_string())?;
    expect_eq("value", first.value, 0x1234)?;
    expect_eq("module", first.status.module(), Module::APPLICATION)?;
    expect_eq("code", first.status.code(), ErrorCode::INVALID_ARGUMENT)?;
    println!("successful");

    print!("Retrieving last error info logged...  ");
    let last = errlog::last_error().map_err(|e| e.to_string())?;
    expect_eq("value", last.value, 0xABCD)?;
    expect_eq("module", last.status.module(), Module::PLATFORM)?;
    expect_eq("code", last.status.code(), ErrorCode::ALREADY_IN_USE)?;
    println!("successful");
    Ok(())
}

fn get_history() -> StepResult {
    let logged = [
        (status::TIME_OUT, "Timeout error"),
        (status::FAILED_OPERATION, "Operation failed"),
        (status::UNSUPPORTED, "Not supported"),
        (status::ACCESS_DENIED, "Access denied"),
    ];

    println!("\nReporting the following warnings:");
    for (i, (s, msg)) in logged.iter().enumerate() {
        warning!(*s, *msg, 100 + i);
        println!("   {:<18} Status: {} Value: {:#x}", format!("{}", s.code()), s, 100 + i);
    }

    // Only the most recent HIST_SIZE survive
    let keep = logged.len().min(errlog::HIST_SIZE);
    let skipped = logged.len() - keep;
    println!("Retrieving the error history:");
    for (i, (s, _)) in logged.iter().skip(skipped).enumerate() {
        let rec = errlog::history_entry(errlog::history_len() - keep + i).map_err(|e| e.to_string())?;
        expect_eq("status", rec.status, *s)?;
        println!("   Status: {} Value: {:#x}", rec.status, rec.value);
    }
    println!("Retrieving error history... successful");
    Ok(())
}

fn save_history(path: &str) -> StepResult {
    println!("\nReporting the following warnings:");
    let logged = [
        (status::TIME_OUT, "Timeout error"),
        (status::ALREADY_IN_USE, "Already in use error"),
        (status::UNSUPPORTED, "Not supported error"),
        (status::ACCESS_DENIED, "Access denied error"),
        (status::ITEM_NOT_FOUND, "Not found error"),
    ];
    for (i, (s, msg)) in logged.iter().enumerate() {
        warning!(*s, *msg, i + 1);
        println!("   {:<18} Status: {} Value: {:#x}", format!("{}", s.code()), s, i + 1);
    }

    // An unformatted volume; the persister formats it on first save
    let mut fs = HeapFileSystem::new("fs");
    println!("Saving the error history to {}", path);
    errlog::save_history(&mut fs).map_err(|e| e.to_string())?;

    println!("Retrieving error history by reading from file:");
    let handle = fs.open(path, OpenMode::Read).map_err(|e| e.to_string())?;
    let mut buf = [0u8; 15];
    let mut text = Vec::new();
    loop {
        let n = fs.read(handle, &mut buf).map_err(|e| e.to_string())?;
        if n == 0 {
            break;
        }
        text.extend_from_slice(&buf[..n]);
    }
    fs.close(handle).map_err(|e| e.to_string())?;
    print!("{}", String::from_utf8_lossy(&text));

    let parsed = errlog::read_history(&mut fs, path).map_err(|e| e.to_string())?;
    expect_eq("records", parsed.len(), errlog::history_len())?;
    fs.unmount().map_err(|e| e.to_string())?;
    kinfo!("volume after save: {:?}", fs);
    println!("Retrieving error history by reading from file... successful");
    Ok(())
}

fn set_error_hook() -> StepResult {
    print!("\nRegistering my_error_hook...");
    errlog::set_hook(my_error_hook).map_err(|e| e.to_string())?;
    warning!(status::INVALID_ARGUMENT, "Test for error hook", 1234);
    if !HOOK_FIRED.wait(Some(Duration::from_secs(5))) {
        return Err("semaphore timed out".into());
    }
    println!(" successful");
    Ok(())
}

#[cfg(unix)]
mod signal_context {
    use super::*;
    use nix::sys::signal::{self, SaFlags, SigAction, SigHandler, SigSet, Signal};

    extern "C" fn on_sigusr1(_: std::os::raw::c_int) {
        warning!(Status::system(Module::PLATFORM, ErrorCode::PROHIBITED_IN_ISR_CONTEXT), "from handler", 0x515);
    }

    pub fn log_from_handler() -> StepResult {
        print!("\nRaising SIGUSR1; its handler logs a warning...");
        let action = SigAction::new(SigHandler::Handler(on_sigusr1), SaFlags::empty(), SigSet::empty());
        // Safety: the handler only logs through the reporter, which masks
        // signals around its critical section and does not allocate.
        let prev = unsafe { signal::sigaction(Signal::SIGUSR1, &action) }.map_err(|e| e.to_string())?;
        signal::raise(Signal::SIGUSR1).map_err(|e| e.to_string())?;
        // The hook registered earlier fires from the handler too
        let fired = HOOK_FIRED.wait(Some(Duration::from_secs(5)));
        unsafe { signal::sigaction(Signal::SIGUSR1, &prev) }.map_err(|e| e.to_string())?;

        let last = errlog::last_error().map_err(|e| e.to_string())?;
        expect_eq("value", last.value, 0x515)?;
        if !fired {
            return Err("hook did not fire from the handler".into());
        }
        println!(" successful");
        Ok(())
    }
}

fn log_error() -> ! {
    println!("\nReporting an error. Note that this will cause the system to halt");
    std::thread::sleep(Duration::from_millis(10));
    fatal!(
        Status::system(Module::DRIVER_I2C, ErrorCode::OPERATION_PROHIBITED),
        "I2C driver error",
        0xDEADDEADu32
    )
}
