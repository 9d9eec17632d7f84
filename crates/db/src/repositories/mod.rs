//! Repository abstractions for data access.
//!
//! Repositories provide a clean interface for database operations,
//! hiding the `SeaORM` implementation details from the rest of the
//! application. Sales-entry writes also run the core pipeline here so a
//! rejected entry never reaches the database.

pub mod sales_entry;
pub mod truck;
pub mod user;

pub use sales_entry::{
    BranchStockTotals, NetworkStockTotals, SalesEntryError, SalesEntryRepository, StockSummaryRow,
};
pub use truck::{CreateTruckInput, TruckError, TruckRepository};
pub use user::{CreateUserInput, UpdateUserInput, UserError, UserRepository};
