mod account;
mod category;
mod ledger;
mod money;
mod transaction;

pub use account::*;
pub use category::*;
pub use ledger::*;
pub use money::*;
pub use transaction::*;
