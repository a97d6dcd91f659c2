#![doc = include_str!("../README.md")]

mod compile;
mod convert;
mod error;
mod parser;
mod registry;
mod template;
mod value;

pub use convert::{ConvertError, Converter, WithPattern, with_pattern};
pub use error::CompileError;
pub use parser::{Matches, Parser};
pub use registry::{TypeDict, TypeRegistry};
pub use value::Value;
