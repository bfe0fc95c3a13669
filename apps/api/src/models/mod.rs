pub mod application;
pub mod filter;
pub mod jd;
pub mod job;
pub mod keyword;
pub mod resume;
