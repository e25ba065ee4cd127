// Library interface for lazyctx
// Exposes the navigator core and its adapters to the binary and to tests

pub mod cmd;
pub mod config;
pub mod cursor;
pub mod entry;
pub mod error;
pub mod event;
pub mod friendly;
pub mod handlers;
pub mod logging;
pub mod navigator;
pub mod normalize;
pub mod present;
pub mod query;
pub mod store;
pub mod tui;
pub mod window;

#[cfg(test)]
mod test_utils;
