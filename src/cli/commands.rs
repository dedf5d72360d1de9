use clap::{Parser, Subcommand};

#[derive(Parser)]
#[command(name = "toolchat")]
#[command(author, version, about = "Answer questions with an LLM that can call local tools", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Run the HTTP endpoint
    Serve {
        /// Overrides server.port
        #[arg(short, long)]
        port: Option<u16>,
    },

    /// Ask a single question in the terminal
    Ask { question: String },

    /// List the tool catalog
    Tools,
}
