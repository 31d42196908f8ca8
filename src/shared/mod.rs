pub mod cache;
pub mod constants;
pub mod geo;
pub mod templates;
pub mod types;

#[cfg(test)]
pub mod test_helpers;
