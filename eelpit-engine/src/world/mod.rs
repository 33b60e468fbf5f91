// world/ - Viewport and spatial queries
//
// No entity state lives here, just geometry over the pools in `sim`.

mod query;
mod viewport;

pub use query::*;
pub use viewport::Viewport;
