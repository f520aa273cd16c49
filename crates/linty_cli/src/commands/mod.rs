pub mod checksum;
pub mod init;
pub mod lint;
