pub(crate) mod commands;
mod demo;
mod event_loop;
mod init;
mod state;
mod window;

pub use state::App;
