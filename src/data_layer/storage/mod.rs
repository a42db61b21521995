pub mod s3_client;
pub mod s3_storage;
pub mod s3_types;
