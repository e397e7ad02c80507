use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "pdfpick")]
#[command(about = "Trim, split, or rasterize selected PDF pages, with MCP server support")]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Path to config TOML. If omitted, uses ./pdfpick.toml if present.
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// Override log level (trace/debug/info/warn/error)
    #[arg(long, global = true)]
    pub log_level: Option<String>,

    /// Overwrite existing output without asking
    #[arg(short, long, global = true)]
    pub yes: bool,

    /// Print results as JSON
    #[arg(long, global = true)]
    pub json: bool,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Run as MCP server
    Mcp,

    /// Display page count and PDF metadata
    Info {
        /// PDF file to inspect
        path: PathBuf,
    },

    /// List the available processing modes
    Modes,

    /// Keep only the selected pages in a new PDF
    #[command(alias = "select")]
    Trim {
        /// PDF file to read
        path: PathBuf,

        /// Page ranges (e.g., "1-3,5,6-9,11")
        pages: String,

        /// Output file [default: <name>_trimmed.pdf]
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Split a PDF into files of a fixed number of pages
    Split {
        /// PDF file to split
        path: PathBuf,

        /// Pages per output file
        chunk_size: String,

        /// Output file name template [default: <name>_split.pdf]
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Render the selected pages to PNG images
    #[command(alias = "images")]
    Rasterize {
        /// PDF file to render
        path: PathBuf,

        /// Page ranges (e.g., "1-3,5")
        pages: String,

        /// Output directory [default: <name>_images]
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Run any mode by name
    Run {
        /// Mode name (see `pdfpick modes`)
        mode: String,

        /// PDF file to read
        path: PathBuf,

        /// Page ranges or chunk size, depending on the mode
        input: String,

        /// Output path [default: derived from the input name]
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
}
