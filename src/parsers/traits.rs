use crate::errors::ExtractError;

pub trait Parser {
    type Output;

    fn parse(content: &str) -> Result<Vec<Self::Output>, ExtractError>;

    fn is_supported(filename: Option<&str>, content: &str) -> bool;
}
