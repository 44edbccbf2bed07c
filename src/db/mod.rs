pub mod addresses;
pub mod admin;
pub mod cart;
pub mod exhibitions;
pub mod orders;
pub mod products;
pub mod ratings;
pub mod tickets;
pub mod users;

pub use addresses::AddressRepo;
pub use cart::CartRepo;
pub use exhibitions::ExhibitionRepo;
pub use orders::OrderRepo;
pub use products::ProductRepo;
pub use ratings::RatingRepo;
pub use tickets::TicketRepo;
pub use users::UserRepo;

/// True when `err` is a violation of the named unique constraint.
pub(crate) fn is_unique_violation(err: &sqlx::Error, constraint: &str) -> bool {
    matches!(err, sqlx::Error::Database(db) if db.constraint() == Some(constraint))
}
