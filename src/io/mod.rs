pub mod checklist_io;
pub mod config_io;
pub mod recovery;
pub mod session;
pub mod storage;
