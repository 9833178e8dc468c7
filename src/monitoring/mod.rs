/*!
 * Monitoring
 * Tracing setup and spans
 */

mod tracer;

pub use tracer::{init_tracing, CompileSpan, LaunchSpan, TRACE_JSON_ENV};
