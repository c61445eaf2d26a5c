mod progress_trace;

pub use progress_trace::{ProgressTrace, TraceFormat, TracePoint};
