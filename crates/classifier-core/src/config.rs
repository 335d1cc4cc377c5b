mod constants;
mod defaults;
mod env;
mod file;
mod load;
mod paths;
mod types;
mod util;

pub use types::ServiceConfig;

#[cfg(test)]
mod tests;
