//! Test fixtures for the marshal workspace.
//!
//! Owned matrices that hand out both memory layouts, wide-precision
//! reference sums, a per-thread counting allocator for leak checks, and
//! tracing setup and capture for tests.

#![deny(unsafe_code)]
#![allow(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]

mod alloc;

use std::io;
use std::sync::{Arc, Mutex};

use tracing_subscriber::fmt::MakeWriter;

pub use alloc::{outstanding_bytes, CountingAllocator};

/// Exact sum of `values` in `i128`, for checking wrapping sums against.
///
/// Casting the result to the narrow width gives what a two's-complement
/// wrapping sum must produce.
pub fn wide_sum<T: Copy + Into<i128>>(values: &[T]) -> i128 {
    values.iter().map(|&v| v.into()).sum()
}

/// A `rows x cols` matrix stored row-major in one buffer.
///
/// [`as_ptr`](OwnedMatrix::as_ptr) gives the contiguous layout and
/// [`row_pointers`](OwnedMatrix::row_pointers) the array-of-row-pointers
/// layout over the same elements, so both entry point families can be fed
/// identical data.
#[derive(Clone, Debug, PartialEq)]
pub struct OwnedMatrix<T> {
    rows: usize,
    cols: usize,
    data: Vec<T>,
}

impl<T> OwnedMatrix<T> {
    /// Fill element `(r, c)` with `f(r, c)`, visiting in row-major order.
    pub fn from_fn(rows: usize, cols: usize, mut f: impl FnMut(usize, usize) -> T) -> Self {
        let mut data = Vec::with_capacity(rows * cols);
        for r in 0..rows {
            for c in 0..cols {
                data.push(f(r, c));
            }
        }
        Self { rows, cols, data }
    }

    pub fn as_ptr(&self) -> *const T {
        self.data.as_ptr()
    }

    pub fn as_slice(&self) -> &[T] {
        &self.data
    }

    /// `(rows, cols)` as the C `int` dimensions the entry points take.
    ///
    /// # Panics
    ///
    /// If either dimension exceeds `i32::MAX`.
    pub fn dims(&self) -> (i32, i32) {
        let narrow = |n: usize| i32::try_from(n).expect("matrix dimension exceeds i32");
        (narrow(self.rows), narrow(self.cols))
    }

    /// One pointer per row into the backing buffer. The pointers borrow
    /// `self` and are valid for as long as it is neither moved nor dropped.
    pub fn row_pointers(&self) -> Vec<*const T> {
        if self.cols == 0 {
            return vec![self.data.as_ptr(); self.rows];
        }
        self.data.chunks(self.cols).map(<[T]>::as_ptr).collect()
    }
}

/// Install a fmt subscriber that writes through the test harness and
/// honours `RUST_LOG`. Safe to call from every test; only the first call
/// installs anything.
pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}

#[derive(Clone, Default)]
struct CapturedOutput(Arc<Mutex<Vec<u8>>>);

impl io::Write for CapturedOutput {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        let mut out = self
            .0
            .lock()
            .map_err(|_| io::Error::other("capture buffer poisoned"))?;
        out.extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

impl<'a> MakeWriter<'a> for CapturedOutput {
    type Writer = CapturedOutput;

    fn make_writer(&'a self) -> Self::Writer {
        self.clone()
    }
}

/// Run `f` with a thread-local subscriber that records every event down to
/// `TRACE`, and return its result together with the formatted log text.
pub fn capture_trace<R>(f: impl FnOnce() -> R) -> (R, String) {
    let sink = CapturedOutput::default();
    let subscriber = tracing_subscriber::fmt()
        .with_writer(sink.clone())
        .with_max_level(tracing::Level::TRACE)
        .with_ansi(false)
        .finish();
    let result = tracing::subscriber::with_default(subscriber, f);
    let text = sink
        .0
        .lock()
        .map(|bytes| String::from_utf8_lossy(&bytes).into_owned())
        .unwrap_or_default();
    (result, text)
}
