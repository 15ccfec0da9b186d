mod headers;
mod parser;

pub use headers::HeaderSource;
pub use parser::{
    PRIMARY_OVER_SECONDARY_LIMIT_PERCENT, PRIMARY_RESET_AFTER_SECONDS, PRIMARY_USED_PERCENT,
    PRIMARY_WINDOW_MINUTES, SECONDARY_RESET_AFTER_SECONDS, SECONDARY_USED_PERCENT,
    SECONDARY_WINDOW_MINUTES, USAGE_HEADERS, extract_usage_at, extract_usage_from_headers,
};
