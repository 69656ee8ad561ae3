pub mod cli;
pub mod error;
pub mod net;
pub mod realize;
pub mod topo;

pub use error::TopoError;

#[cfg(test)]
mod test;
