pub mod compare;
pub mod grade;
pub mod import;
pub mod init;
pub mod validate;
