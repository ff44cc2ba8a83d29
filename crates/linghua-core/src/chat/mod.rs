//! Chat panel: escaping, persisted history, canned replies, the view port,
//! and the controller tying them together.

pub mod controller;
pub mod escape;
pub mod history;
pub mod html;
pub mod reply;
pub mod view;
