//! One module per subcommand.

pub mod age;
pub mod completions;
pub mod inspect;
pub mod seal;
pub mod unseal;
