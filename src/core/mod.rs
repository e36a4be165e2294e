pub mod components;
pub mod errors;
pub mod event;
pub mod event_sink;
pub mod execution;
pub mod types;

#[cfg(test)]
mod tests;
