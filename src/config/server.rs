use std::thread;

/// Server configuration for HTTP server
#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    pub workers: usize,
}

impl ServerConfig {
    pub fn new(host: String, port: u16) -> Self {
        let cores = thread::available_parallelism().map_or(1, |n| n.get());
        Self {
            host,
            port,
            workers: cores * 2, // gateway calls are I/O-bound
        }
    }

    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}
