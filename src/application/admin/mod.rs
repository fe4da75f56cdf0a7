//! Application services for the administrative surface.

pub mod categories;
pub mod dashboard;
pub mod posts;

pub use categories::AdminCategoryService;
pub use dashboard::AdminDashboardService;
pub use posts::AdminPostService;
