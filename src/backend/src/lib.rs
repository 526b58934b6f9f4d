pub mod api;
pub mod config;
pub mod controller;
pub mod device;
pub mod hardware;
pub mod http_client;
pub mod remote;
pub mod status;
pub mod storage;
pub mod wifi;
