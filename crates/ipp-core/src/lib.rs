pub mod buffer;
pub mod color;
pub mod consts;
pub mod error;
pub mod io;
pub mod kernel;
pub mod observer;
pub mod pipeline;
pub mod strategy;
