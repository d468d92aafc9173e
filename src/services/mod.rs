pub mod farm_service;
pub mod generative;
pub mod inspection_service;
pub mod insights;
pub mod report_service;
pub mod report_worker;
pub mod scoring;
pub mod user_service;
pub mod weather;
