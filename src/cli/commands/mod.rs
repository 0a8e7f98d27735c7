pub mod init;
pub mod report;
pub mod status;
pub mod track;
