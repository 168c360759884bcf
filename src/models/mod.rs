pub mod ebook;
pub mod page;
pub mod setting;
pub mod site;
pub mod user;
