//! Join command - build a name from raw components.
//!
//! # Examples
//!
//! ```bash
//! # Delimiter occurrences inside a component are masked
//! nomen join oss cs.fau de
//! ```

use anyhow::Result;
use clap::Args as ClapArgs;
use tracing::instrument;

use nomen_core::{ArrayName, Name, escape};

#[derive(ClapArgs)]
pub struct Args {
    /// Raw components; delimiter occurrences are masked automatically
    pub components: Vec<String>,

    /// Delimiter character
    #[arg(short, long, default_value_t = '.')]
    pub delimiter: char,
}

#[instrument(level = "info", name = "cmd::join", skip_all, fields(count = args.components.len()))]
pub fn execute(args: &Args) -> Result<()> {
    let masked = args
        .components
        .iter()
        .map(|c| escape::mask(c, args.delimiter));
    let name = ArrayName::with_delimiter(masked, args.delimiter)?;
    println!("{}", name.as_data_string());
    Ok(())
}
