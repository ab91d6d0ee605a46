pub mod scenario;
pub mod store;
pub mod util;

pub use util::{parse_date, split_csv};
