pub mod token_dictionary;

pub use token_dictionary::{
    ensure_dictionary,
    load_dictionary,
    DictType,
};
