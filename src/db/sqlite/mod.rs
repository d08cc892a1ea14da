mod common;
mod executions;
mod faqs;
mod leads;
mod maintenance;
mod model_pricing;
mod users;

pub use executions::SqliteExecutionRepo;
pub use faqs::SqliteFaqRepo;
pub use leads::SqliteLeadRepo;
pub use maintenance::SqliteMaintenanceRepo;
pub use model_pricing::SqliteModelPricingRepo;
pub use users::SqliteUserRepo;
