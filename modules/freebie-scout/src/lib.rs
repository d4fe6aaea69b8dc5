pub mod merge;
pub mod notify;
pub mod scout;
pub mod seen;
pub mod sources;
pub mod types;

#[cfg(any(test, feature = "test-support"))]
pub mod testing;
