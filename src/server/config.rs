use super::RequestsLoggingLevel;

#[derive(Clone)]
pub struct ServerConfig {
    pub requests_logging_level: RequestsLoggingLevel,
    pub port: u16,
    /// Rows returned by the ranked endpoints; also caps the collaborative
    /// candidate walk.
    pub top_n: usize,
    /// Peers consulted by the collaborative and hybrid paths.
    pub peer_count: usize,
    pub content_weight: f32,
    pub collab_weight: f32,
}

impl Default for ServerConfig {
    fn default() -> Self {
        ServerConfig {
            requests_logging_level: RequestsLoggingLevel::Path,
            port: 3001,
            top_n: 10,
            peer_count: 2,
            content_weight: 0.8,
            collab_weight: 0.2,
        }
    }
}
