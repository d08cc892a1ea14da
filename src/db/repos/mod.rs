mod executions;
mod faqs;
mod leads;
mod maintenance;
mod model_pricing;
mod users;

pub use executions::ExecutionRepo;
pub use faqs::FaqRepo;
pub use leads::LeadRepo;
pub use maintenance::{MaintenanceRepo, ResetCounts};
pub use model_pricing::ModelPricingRepo;
pub use users::UserRepo;
