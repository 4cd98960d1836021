//! Data models
//!
//! Profile payloads, the person-info form and the local cache rows.

mod person_form;
mod person_info;
mod user;

pub use person_form::{FormSnapshot, PersonInfoForm};
pub use person_info::PersonInfo;
pub use user::{UserInputModel, UserModel};
