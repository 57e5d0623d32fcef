use log::error;
use pest::{iterators::Pairs, Parser};

#[derive(Parser)]
#[grammar = "q.pest"]
pub struct QParser;

impl QParser {
    /// Parse a whole program, exiting the process on syntax errors.
    pub fn parse_program(source: &str) -> Pairs<Rule> {
        match Self::try_parse_program(source) {
            Ok(pairs) => pairs,
            Err(parse_error) => {
                error!("Failed to parse file ({parse_error})");
                std::process::exit(-1);
            }
        }
    }

    /// Fallible variant of [`QParser::parse_program`] for library use.
    pub fn try_parse_program(source: &str) -> Result<Pairs<Rule>, Box<pest::error::Error<Rule>>> {
        let mut pairs = Self::parse(Rule::program, source)?;
        Ok(pairs.next().expect("grammar yields a program pair").into_inner())
    }
}
