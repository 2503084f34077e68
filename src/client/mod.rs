mod http;
mod traits;

pub use http::HttpHistoryClient;
pub use traits::*;
