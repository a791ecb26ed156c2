pub mod api;
pub mod cart;
pub mod message;
pub mod product;

pub use api::*;
pub use cart::*;
pub use message::*;
pub use product::*;
