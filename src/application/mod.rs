// Application layer - use cases over the indicator catalog
pub mod history_repository;
pub mod indicator_service;
pub mod streaming_service;

#[cfg(test)]
pub(crate) mod test_support;
