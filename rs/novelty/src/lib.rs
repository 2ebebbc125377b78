pub mod algorithm;
pub mod demud;
pub mod error;
pub mod model;
pub mod model_builder;
pub mod random;
pub mod result;
pub mod scorer;
