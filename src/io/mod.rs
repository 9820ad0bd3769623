pub mod config_io;
pub mod file_storage;
pub mod lock;
pub mod storage;
