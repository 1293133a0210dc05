pub mod certification;
pub mod contact;
pub mod lab;
pub mod personal;
pub mod project;
pub mod skill;

pub use certification::Certification;
pub use contact::ContactSubmission;
pub use lab::Lab;
pub use personal::{PersonalInfo, PersonalInfoInput, PERSONAL_FILE};
pub use project::Project;
pub use skill::Skill;
