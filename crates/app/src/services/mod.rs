mod tokens;
mod usage;

use crate::app::Stores;

pub use tokens::TokensService;
pub use usage::UsageService;

/// Service registry for app-level operations.
#[derive(Clone)]
pub struct AppServices {
    pub usage: UsageService,
    pub tokens: TokensService,
}

impl AppServices {
    pub fn new(stores: &Stores) -> Self {
        Self {
            usage: UsageService::new(stores.clone()),
            tokens: TokensService::new(stores.clone()),
        }
    }
}
