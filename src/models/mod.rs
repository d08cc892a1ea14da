mod execution;
mod faq;
mod lead;
mod metrics;
mod model_pricing;
mod user;

pub use execution::*;
pub use faq::*;
pub use lead::*;
pub use metrics::*;
pub use model_pricing::*;
pub use user::*;
