//! Tolerance for rasters without georeferencing
//!
//! Scientific subdatasets are often plain numeric grids with no
//! geotransform or CRS. GDAL reports that as a warning, which in a batch
//! run is indistinguishable from a real problem. A [`GeoreferenceGuard`]
//! swallows exactly those diagnostics for as long as it lives.
//!
//! The guard pushes a handler on GDAL's per-thread handler stack, so it
//! only sees messages emitted on the thread that created it. Other threads
//! and any process-wide handler the caller installed are left alone, and
//! the handler is popped again when the last guard on the thread drops.

use std::borrow::Cow;
use std::cell::Cell;
use std::ffi::CStr;
use std::marker::PhantomData;
use std::os::raw::c_char;
use std::sync::atomic::{AtomicBool, Ordering};

use gdal::errors::CplErrType;
use gdal_sys::{CPLErr, CPLErrorNum};
use lazy_static::lazy_static;
use log::{debug, error, trace, warn};
use regex::Regex;

lazy_static! {
    static ref NOT_GEOREFERENCED: Regex = Regex::new(
        r"(?i)(not\s+georeferenced|no\s+georeferenc|no\s+geotransform|identity\s+matrix\s+will\s+be)"
    )
    .expect("not-georeferenced pattern is valid");
}

static ROUTE_TO_LOG: AtomicBool = AtomicBool::new(false);

thread_local! {
    static DEPTH: Cell<usize> = Cell::new(0);
}

/// Scope in which "not georeferenced" diagnostics are discarded
///
/// Released on drop, including during unwinding. Not `Send`: the handler
/// lives on the creating thread's stack and must be popped there.
#[must_use = "diagnostics are only ignored while the guard is alive"]
pub struct GeoreferenceGuard {
    _not_send: PhantomData<*const ()>,
}

/// Start ignoring "not georeferenced" diagnostics on this thread
pub fn ignore_not_georeferenced() -> GeoreferenceGuard {
    let depth = DEPTH.with(|d| d.get());
    if depth == 0 {
        unsafe { gdal_sys::CPLPushErrorHandler(Some(scoped_handler)) };
        debug!("Ignoring not-georeferenced diagnostics");
    }
    DEPTH.with(|d| d.set(depth + 1));

    GeoreferenceGuard { _not_send: PhantomData }
}

impl Drop for GeoreferenceGuard {
    fn drop(&mut self) {
        let remaining = DEPTH.with(|d| {
            let n = d.get().saturating_sub(1);
            d.set(n);
            n
        });

        if remaining == 0 {
            unsafe { gdal_sys::CPLPopErrorHandler() };
            debug!("Restored toolkit diagnostics");
        }
    }
}

/// Run `f` with "not georeferenced" diagnostics ignored
pub fn with_not_georeferenced_ignored<T>(f: impl FnOnce() -> T) -> T {
    let _guard = ignore_not_georeferenced();
    f()
}

/// Whether the current thread holds a guard
pub fn is_ignoring_not_georeferenced() -> bool {
    DEPTH.with(|d| d.get() > 0)
}

/// Whether a toolkit message reports missing georeferencing
pub fn is_not_georeferenced_message(message: &str) -> bool {
    NOT_GEOREFERENCED.is_match(message)
}

/// Whether a guard drops this message
///
/// Only diagnostics are dropped; failures pass even when they mention
/// georeferencing.
pub fn should_discard(class: CplErrType, message: &str) -> bool {
    matches!(class, CplErrType::None | CplErrType::Debug | CplErrType::Warning)
        && is_not_georeferenced_message(message)
}

/// Send toolkit diagnostics to the `log` facade instead of stderr
///
/// Installs the process-wide handler. Messages that pass a guard are
/// forwarded to `log` as well.
pub fn route_toolkit_diagnostics_to_log() {
    ROUTE_TO_LOG.store(true, Ordering::SeqCst);
    gdal::config::set_error_handler(forward_to_log);
}

fn class_from_raw(class: CPLErr::Type) -> CplErrType {
    match class {
        CPLErr::CE_Debug => CplErrType::Debug,
        CPLErr::CE_Warning => CplErrType::Warning,
        CPLErr::CE_Failure => CplErrType::Failure,
        CPLErr::CE_Fatal => CplErrType::Fatal,
        _ => CplErrType::None,
    }
}

unsafe extern "C" fn scoped_handler(class: CPLErr::Type, number: CPLErrorNum, message: *const c_char) {
    let text = if message.is_null() {
        Cow::Borrowed("")
    } else {
        CStr::from_ptr(message).to_string_lossy()
    };

    let kind = class_from_raw(class);
    if should_discard(kind, &text) {
        trace!(target: "gdal", "Ignored: {}", text);
    } else if ROUTE_TO_LOG.load(Ordering::SeqCst) {
        forward_to_log(kind, number, &text);
    } else {
        gdal_sys::CPLDefaultErrorHandler(class, number, message);
    }
}

fn forward_to_log(class: CplErrType, number: i32, message: &str) {
    match class {
        CplErrType::None => {}
        CplErrType::Debug => debug!(target: "gdal", "{}", message),
        CplErrType::Warning => warn!(target: "gdal", "Warning {}: {}", number, message),
        _ => error!(target: "gdal", "ERROR {}: {}", number, message),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::ffi::CString;
    use std::panic;
    use std::sync::{Arc, Mutex};
    use std::thread;

    const MISSING: &str = "Dataset has no geotransform, gcps, or rpcs. The identity matrix will be returned.";

    fn emit(class: CPLErr::Type, message: &str) {
        let format = CString::new("%s").unwrap();
        let text = CString::new(message).unwrap();
        unsafe { gdal_sys::CPLError(class, 1, format.as_ptr(), text.as_ptr()) };
    }

    #[test]
    fn test_recognizes_toolkit_messages() {
        assert!(is_not_georeferenced_message(MISSING));
        assert!(is_not_georeferenced_message("Dataset is not georeferenced"));
        assert!(is_not_georeferenced_message("Input file has no georeferencing information"));
        assert!(!is_not_georeferenced_message("Illegal value for COMPRESS option"));
        assert!(!is_not_georeferenced_message("TIFFReadDirectory: Sum of Photometric type"));
    }

    #[test]
    fn test_only_matching_diagnostics_are_discarded() {
        let other = "Illegal value for COMPRESS option";

        for class in [CplErrType::None, CplErrType::Debug, CplErrType::Warning] {
            assert!(should_discard(class, MISSING), "{:?}", class);
            assert!(!should_discard(class, other), "{:?}", class);
        }
        for class in [CplErrType::Failure, CplErrType::Fatal] {
            assert!(!should_discard(class, MISSING), "{:?}", class);
            assert!(!should_discard(class, other), "{:?}", class);
        }
    }

    #[test]
    fn test_raw_classes_map_to_error_types() {
        assert_eq!(class_from_raw(CPLErr::CE_None), CplErrType::None);
        assert_eq!(class_from_raw(CPLErr::CE_Debug), CplErrType::Debug);
        assert_eq!(class_from_raw(CPLErr::CE_Warning), CplErrType::Warning);
        assert_eq!(class_from_raw(CPLErr::CE_Failure), CplErrType::Failure);
        assert_eq!(class_from_raw(CPLErr::CE_Fatal), CplErrType::Fatal);
    }

    #[test]
    fn test_guard_is_scoped() {
        assert!(!is_ignoring_not_georeferenced());
        {
            let _guard = ignore_not_georeferenced();
            assert!(is_ignoring_not_georeferenced());
        }
        assert!(!is_ignoring_not_georeferenced());
    }

    #[test]
    fn test_guards_nest_on_one_thread() {
        let outer = ignore_not_georeferenced();
        let inner = ignore_not_georeferenced();
        drop(outer);
        assert!(is_ignoring_not_georeferenced());
        drop(inner);
        assert!(!is_ignoring_not_georeferenced());
    }

    #[test]
    fn test_released_after_panic() {
        let result = panic::catch_unwind(|| {
            with_not_georeferenced_ignored(|| {
                assert!(is_ignoring_not_georeferenced());
                panic!("conversion blew up");
            })
        });
        assert!(result.is_err());
        assert!(!is_ignoring_not_georeferenced());
    }

    #[test]
    fn test_guard_does_not_leak_to_other_threads() {
        let _guard = ignore_not_georeferenced();

        let other = thread::spawn(is_ignoring_not_georeferenced).join().unwrap();
        assert!(!other);
        assert!(is_ignoring_not_georeferenced());
    }

    #[test]
    fn test_worker_guard_while_caller_holds_one() {
        let _guard = ignore_not_georeferenced();

        let worker = thread::spawn(|| {
            let _inner = ignore_not_georeferenced();
            is_ignoring_not_georeferenced()
        });
        assert!(worker.join().unwrap());
    }

    // Single test for the process-wide handler so parallel tests do not
    // swap it under each other.
    #[test]
    fn test_handler_stack_filters_and_restores() {
        let seen = Arc::new(Mutex::new(Vec::<String>::new()));
        {
            let seen = Arc::clone(&seen);
            gdal::config::set_error_handler(move |_, _, message| {
                seen.lock().unwrap().push(message.to_string());
            });
        }

        {
            let _guard = ignore_not_georeferenced();
            emit(CPLErr::CE_Warning, "guarded: no geotransform found");

            // A thread without a guard still reaches the process handler
            thread::spawn(|| emit(CPLErr::CE_Warning, "unguarded: no geotransform found"))
                .join()
                .unwrap();
        }
        emit(CPLErr::CE_Warning, "released: no geotransform found");

        gdal::config::remove_error_handler();

        let seen = seen.lock().unwrap();
        assert!(!seen.iter().any(|m| m.starts_with("guarded")));
        assert!(seen.iter().any(|m| m.starts_with("unguarded")));
        assert!(seen.iter().any(|m| m.starts_with("released")));
    }

    #[test]
    fn test_closure_value_is_returned() {
        assert_eq!(with_not_georeferenced_ignored(|| 7), 7);
    }
}
