//! Records exchanged with callers.
//!
//! Every record serializes with camelCase names, and every input body rejects
//! unknown fields at deserialization time.

pub mod company;
pub mod job;
pub mod user;

pub use company::{COMPANY_FIELDS, Company, CompanyDetail, CompanyUpdate, NewCompany};
pub use job::{JOB_FIELDS, Job, JobDetail, JobUpdate, NewJob};
pub use user::{NewUser, USER_FIELDS, User, UserDetail, UserUpdate};
