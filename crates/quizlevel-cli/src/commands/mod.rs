pub mod assess;
pub mod init;
pub mod validate;
