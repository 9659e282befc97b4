pub mod compare_service;
pub mod snapshot_service;
pub mod youtube_client;

#[cfg(test)]
pub mod test_support;
