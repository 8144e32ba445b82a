pub mod dense;

pub use dense::LayerTrace;
