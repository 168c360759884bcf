pub mod email;
pub mod page;
pub mod payment;
pub mod setting;
pub mod user;
