mod block;
mod config;
mod escape;
mod html;
mod parser;
pub mod reply;
pub mod request;
pub mod session;

pub use block::Block;
pub use config::{CodeConfig, Config, TableConfig};
pub use escape::{escape_html, push_escaped};
pub use html::comment_prefix;

/// Parse reply text into a vector of blocks.
pub fn parse(reply: &str) -> Vec<Block> {
    parse_with_config(reply, &Config::compiled_default())
}

/// Parse reply text into a vector of blocks with custom config.
pub fn parse_with_config(reply: &str, config: &Config) -> Vec<Block> {
    parser::parse(reply, config)
}

/// Convert reply text to a safe HTML fragment using default config.
pub fn reply_to_html(reply: &str) -> String {
    reply_to_html_with_config(reply, &Config::compiled_default())
}

/// Convert reply text to a safe HTML fragment with custom config.
pub fn reply_to_html_with_config(reply: &str, config: &Config) -> String {
    let blocks = parse_with_config(reply, config);
    tracing::debug!(blocks = blocks.len(), "formatted reply");
    html::blocks_to_html(&blocks, config)
}
