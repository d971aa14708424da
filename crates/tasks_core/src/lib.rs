pub mod config;
pub mod error;
pub mod model;
pub mod render;
pub mod storage;
pub mod task_list;
