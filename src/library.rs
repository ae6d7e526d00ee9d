pub mod logger;
#[cfg(test)]
pub mod test_support;
