mod menu;
mod payment;
mod results;
mod stats;
mod user;

pub use menu::*;
pub use payment::*;
pub use results::*;
pub use stats::*;
pub use user::*;
