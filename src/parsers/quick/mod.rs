mod parser;

pub use parser::{parse_quick_entry, QuickEntry};

pub mod prelude {
    pub use super::parser::{parse_quick_entry, QuickEntry};
}
