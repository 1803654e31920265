pub mod account_service;
pub mod feedback_service;
pub mod prediction_service;
pub mod report_service;
pub mod session_service;

pub use account_service::*;
pub use feedback_service::*;
pub use prediction_service::*;
pub use report_service::*;
pub use session_service::*;
