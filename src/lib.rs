#![forbid(unsafe_code)]

pub mod cli;
pub mod convert;
pub mod fetch;
pub mod formats;
pub mod logging;
pub mod marker_store;
pub mod output;
pub mod sync;
