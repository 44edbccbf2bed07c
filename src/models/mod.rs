pub mod address;
pub mod exhibition;
pub mod order;
pub mod product;
pub mod rating;
pub mod ticket;
pub mod user;

pub use address::*;
pub use exhibition::*;
pub use order::*;
pub use product::*;
pub use rating::*;
pub use ticket::*;
pub use user::*;
