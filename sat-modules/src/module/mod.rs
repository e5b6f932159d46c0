pub mod gpredict;
pub mod sat;
