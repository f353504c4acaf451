mod bootstrap;
mod log_sink;
mod loop_runner;
mod script;

pub(crate) use bootstrap::{build_app, init_tracing};
pub(crate) use loop_runner::run;
