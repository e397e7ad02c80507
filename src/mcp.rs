use anyhow::Result;
use rmcp::{
    ServerHandler, ServiceExt,
    handler::server::{router::tool::ToolRouter, wrapper::Parameters},
    model::{ServerCapabilities, ServerInfo},
    schemars, tool, tool_router,
};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use tracing::info;

use crate::commands::modes::describe;
use crate::config::Config;
use crate::dispatch::{Confirmation, Dispatcher, Outcome, Request};
use crate::mode::Mode;
use crate::naming;
use crate::pdf::PdfDocument;

// Request structs for tools

#[derive(Debug, Deserialize, schemars::JsonSchema)]
pub struct PathRequest {
    #[schemars(description = "Path to the PDF file")]
    pub path: String,
}

#[derive(Debug, Deserialize, schemars::JsonSchema)]
pub struct PdfPagesRequest {
    #[schemars(description = "Path to the source PDF file")]
    pub path: String,
    #[schemars(description = "Page ranges (e.g., '1-3,5,6-9,11')")]
    pub pages: String,
    #[schemars(description = "Output path (default: derived from the input file name)")]
    #[serde(default)]
    pub output: Option<String>,
    #[schemars(description = "Replace existing output files (default: false)")]
    #[serde(default)]
    pub overwrite: bool,
}

#[derive(Debug, Deserialize, schemars::JsonSchema)]
pub struct PdfSplitRequest {
    #[schemars(description = "Path to the source PDF file")]
    pub path: String,
    #[schemars(description = "Number of pages per output file")]
    pub chunk_size: i64,
    #[schemars(description = "Output file name template (default: <name>_split.pdf)")]
    #[serde(default)]
    pub output: Option<String>,
    #[schemars(description = "Replace existing output files (default: false)")]
    #[serde(default)]
    pub overwrite: bool,
}

#[derive(Debug, Clone)]
pub struct PdfServer {
    config: Config,
    #[allow(dead_code)]
    tool_router: ToolRouter<Self>,
}

impl PdfServer {
    pub fn new(config: Config) -> Self {
        Self {
            config,
            tool_router: Self::tool_router(),
        }
    }

    /// Run `mode` without any interactive channel: existing output is only
    /// replaced when the caller said so up front.
    fn process(
        &self,
        mode: Mode,
        path: String,
        raw_input: String,
        output: Option<String>,
        overwrite: bool,
    ) -> String {
        let dispatcher = Dispatcher::from_config(&self.config);
        let input = PathBuf::from(path);
        let output = output
            .map(PathBuf::from)
            .unwrap_or_else(|| naming::default_output_path(&input, mode));
        let request = Request::new(mode.name(), input, raw_input).with_output(output);

        let job = match dispatcher.prepare(&request) {
            Ok(job) => job,
            Err(e) => return format!("Error: {}", e),
        };
        info!(mode = %job.mode(), input = %job.parsed(), "mcp request");

        if job.requires_confirmation() && !overwrite {
            return format!(
                "Error: output already exists at {}; pass overwrite=true to replace it",
                job.output().display()
            );
        }

        match job.run(Confirmation::Overwrite) {
            Ok(Outcome::Completed(result)) => {
                serde_json::to_string_pretty(&result).unwrap_or_else(|e| format!("Error: {}", e))
            }
            Ok(Outcome::Aborted) => "Error: aborted".to_string(),
            Err(e) => format!("Error: {}", e),
        }
    }
}

#[tool_router]
impl PdfServer {
    #[tool(description = "Get the page count and basic metadata (title, author, creator, producer) of a PDF")]
    fn pdf_info(&self, Parameters(PathRequest { path }): Parameters<PathRequest>) -> String {
        match PdfDocument::open(&path) {
            Ok(doc) => {
                let info = doc.get_info();
                let result = PdfInfoResult {
                    path,
                    page_count: info.page_count,
                    title: info.title,
                    author: info.author,
                    creator: info.creator,
                    producer: info.producer,
                };
                serde_json::to_string_pretty(&result).unwrap_or_else(|e| format!("Error: {}", e))
            }
            Err(e) => format!("Error: {}", e),
        }
    }

    #[tool(description = "List the processing modes with their input format and output naming")]
    fn pdf_modes(&self) -> String {
        let dispatcher = Dispatcher::from_config(&self.config);
        serde_json::to_string_pretty(&describe(dispatcher.registry()))
            .unwrap_or_else(|e| format!("Error: {}", e))
    }

    #[tool(description = "Create a new PDF containing only the selected pages. Pages outside the document are skipped and reported.")]
    fn pdf_trim(&self, Parameters(req): Parameters<PdfPagesRequest>) -> String {
        self.process(Mode::Selection, req.path, req.pages, req.output, req.overwrite)
    }

    #[tool(description = "Split a PDF into consecutive files of chunk_size pages each, named <base>_part<N>.pdf")]
    fn pdf_split(&self, Parameters(req): Parameters<PdfSplitRequest>) -> String {
        self.process(Mode::Split, req.path, req.chunk_size.to_string(), req.output, req.overwrite)
    }

    #[tool(description = "Render the selected pages to PNG images at 2x scale, named <name>_page<N>.png in the output directory")]
    fn pdf_rasterize(&self, Parameters(req): Parameters<PdfPagesRequest>) -> String {
        self.process(Mode::Rasterize, req.path, req.pages, req.output, req.overwrite)
    }
}

// Result types for MCP tools

#[derive(Debug, Serialize, Deserialize, schemars::JsonSchema)]
pub struct PdfInfoResult {
    pub path: String,
    pub page_count: u32,
    pub title: Option<String>,
    pub author: Option<String>,
    pub creator: Option<String>,
    pub producer: Option<String>,
}

impl ServerHandler for PdfServer {
    fn get_info(&self) -> ServerInfo {
        ServerInfo {
            instructions: Some(
                "PDF page selection tools. Use pdf_info to get the page count, pdf_modes to list \
                 processing modes, pdf_trim to keep selected pages, pdf_split to cut a PDF into \
                 fixed-size parts, and pdf_rasterize to export pages as PNG images."
                    .to_string(),
            ),
            capabilities: ServerCapabilities::builder().enable_tools().build(),
            ..Default::default()
        }
    }
}

pub async fn run_server(config: Config) -> Result<()> {
    let server = PdfServer::new(config);

    // Serve using stdin/stdout as a tuple
    let service = server.serve((tokio::io::stdin(), tokio::io::stdout())).await?;

    service.waiting().await?;

    Ok(())
}
