//! Operations on [`App`](crate::app::App), one module per tab.

mod notes;
mod tasks;
mod topics;
