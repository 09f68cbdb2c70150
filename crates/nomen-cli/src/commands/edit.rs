//! Edit command - apply one mutation to a delimited name.
//!
//! # Examples
//!
//! ```bash
//! nomen edit oss.fau.de insert 1 cs
//! nomen edit oss.cs.fau.de remove 2
//! nomen edit oss.cs.fau.de set 3 com
//! nomen edit oss.cs append fau
//! ```

use anyhow::Result;
use clap::{Args as ClapArgs, Subcommand};
use tracing::instrument;

use nomen_core::{Name, StringName};

#[derive(ClapArgs)]
pub struct Args {
    /// The delimited name to edit
    pub name: String,

    /// Delimiter character
    #[arg(short, long, default_value_t = '.')]
    pub delimiter: char,

    #[command(subcommand)]
    pub operation: Operation,
}

#[derive(Subcommand)]
pub enum Operation {
    /// Insert a masked component before the given position
    Insert { index: usize, component: String },

    /// Replace the component at the given position
    Set { index: usize, component: String },

    /// Remove the component at the given position
    Remove { index: usize },

    /// Append a masked component
    Append { component: String },
}

#[instrument(level = "info", name = "cmd::edit", skip_all, fields(name = %args.name))]
pub fn execute(args: &Args) -> Result<()> {
    let name = StringName::with_delimiter(args.name.as_str(), args.delimiter)?;
    let edited = match &args.operation {
        Operation::Insert { index, component } => name.insert(*index, component)?,
        Operation::Set { index, component } => name.with_component(*index, component)?,
        Operation::Remove { index } => name.remove(*index)?,
        Operation::Append { component } => name.append(component)?,
    };
    println!("{}", edited.as_data_string());
    Ok(())
}
