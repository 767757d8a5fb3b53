use log::info;

mod analytics;
mod attribution;
mod clock;
mod config;
mod error;
mod session;
mod waitlist;
mod tracking {
    pub mod cta;
    pub mod modal;

    pub use cta::{BindingRegistry, CtaTracker};
    pub use modal::ModalTracker;
}
mod dom {
    pub mod bootstrap;
    pub mod effects;
    pub mod element;
    pub mod form;
    pub mod listen;
    pub mod page;
}

#[cfg(test)]
mod testing;

fn main() {
    // Initialize console error panic hook for better error messages
    console_error_panic_hook::set_once();

    console_log::init_with_level(config::get_log_level()).expect("error initializing log");

    info!("Starting site scripts");
    dom::page::start();
}
