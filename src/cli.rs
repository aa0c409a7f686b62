//! CLI domain: parse, route, output, and presentation only.
//! Workflow behaviour lives in the session; the route table just drives it.

mod output;
mod parse;
mod presentation;
mod route;

pub use output::map_error;
pub use parse::{Cli, Commands};
pub use presentation::{
    format_list, format_lookup, format_preview, format_wraps, OutputFormat,
};
pub use route::RunContext;
