pub mod directory;
pub mod notify;
pub mod publisher;
pub mod storage;
