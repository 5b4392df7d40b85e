pub mod background;
pub mod input;
pub mod runtime;

pub use runtime::run_tui;

use crate::api::Backend;
use crate::session::Outcome;
use std::sync::mpsc;
use std::sync::Arc;

/// What input handlers and the message drain need to issue requests
pub struct RuntimeContext<'a> {
    pub backend: &'a Arc<dyn Backend>,
    pub tx: &'a mpsc::Sender<Outcome>,
}
