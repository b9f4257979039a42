pub mod retention_digest;
