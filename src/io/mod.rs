pub mod file_io;
pub mod headless;
pub mod stdin;

pub use file_io::{
    load_network, parse_network, process_pending_load_system, save_export, LayoutExport,
    NetworkSnapshot, PendingLoad,
};
