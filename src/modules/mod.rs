pub mod auth;
pub mod groups;
pub mod profile;
pub mod student_profiles;
pub mod system;
pub mod teacher_profiles;
pub mod users;
