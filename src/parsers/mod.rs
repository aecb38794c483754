pub mod csv;
pub mod quick;
pub mod sms;
pub mod statement;
pub mod traits;

pub mod prelude {
    pub use super::csv::prelude::*;
    pub use super::quick::prelude::*;
    pub use super::sms::prelude::*;
    pub use super::statement::prelude::*;
    pub use super::traits::Parser;
}
