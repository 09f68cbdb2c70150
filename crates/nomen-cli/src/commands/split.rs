//! Split command - break a delimited name into its components.
//!
//! # Examples
//!
//! ```bash
//! # One unmasked component per line
//! nomen split oss.cs.fau.de
//!
//! # Escaped delimiters stay inside their component
//! nomen split 'oss\.cs.fau'
//! ```

use anyhow::Result;
use clap::Args as ClapArgs;
use tracing::instrument;

use nomen_core::{Name, StringName, escape};

#[derive(ClapArgs)]
pub struct Args {
    /// The delimited name to split
    pub name: String,

    /// Delimiter character
    #[arg(short, long, default_value_t = '.')]
    pub delimiter: char,
}

#[instrument(level = "info", name = "cmd::split", skip_all, fields(name = %args.name))]
pub fn execute(args: &Args) -> Result<()> {
    let name = StringName::with_delimiter(args.name.as_str(), args.delimiter)?;
    for i in 0..name.component_count() {
        println!("{}", escape::unmask(name.component(i)?, args.delimiter));
    }
    Ok(())
}
