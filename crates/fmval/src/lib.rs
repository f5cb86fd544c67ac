pub mod args;
pub mod value;
#[cfg(test)]
mod tests;

pub use args::ArgumentRecord;
pub use value::Value;
